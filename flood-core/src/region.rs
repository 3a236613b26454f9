use crate::error::FloodError;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use flood_utils::dates::parse_feed_timestamp;
use flood_utils::names::same_region;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Embedded sample of the reservoir feed, used by the CLI when no feed file
/// is given and by tests.
pub static SAMPLE_RESERVOIR_CSV: &str = include_str!("../../fixtures/reservoirs.csv");

/// Number of columns in a reservoir feed row.
pub const RESERVOIR_ROW_LENGTH: usize = 11;

/// Geographic position of a reservoir in decimal degrees.
#[derive(Debug, Default, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One reservoir reading, attributed to the district it drains into.
///
/// A fetch cycle produces a fresh `Vec<RegionObservation>`; readings are
/// never edited in place.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RegionObservation {
    /// Region key; the district name.
    pub region_id: String,
    pub reservoir_name: String,
    pub state: String,
    pub district: String,
    pub coordinates: Coordinates,
    /// Stored volume as a share of capacity, 0-100.
    pub reservoir_fill_percent: f64,
    /// Stored volume in million cubic metres.
    pub current_level_mcm: f64,
    /// Capacity in million cubic metres.
    pub capacity_mcm: f64,
    /// Inflow in cusecs.
    pub inflow_rate: f64,
    /// Outflow in cusecs.
    pub outflow_rate: f64,
    pub river_level: Option<f64>,
    pub last_updated: Option<NaiveDate>,
}

fn parse_number(ess: &str) -> f64 {
    parse_optional_number(ess).unwrap_or_default()
}

fn parse_optional_number(ess: &str) -> Option<f64> {
    let ess_lowered = ess.trim().to_lowercase();
    match ess_lowered.as_str() {
        "null" | "" | "n/a" | "na" | "-" => None,
        s => s.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

/// Clamp a fill percentage into [0, 100]; NaN reads as 0.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

impl RegionObservation {
    /// Parse the reservoir feed.
    ///
    /// Expected CSV columns (with headers): reservoir_name, state, district,
    /// current_level_mcm, capacity_mcm, percentage_full, inflow_cusecs,
    /// outflow_cusecs, lat, long, last_updated
    ///
    /// Unreadable numbers become 0. Rows without a district are skipped.
    pub fn parse_feed_csv(csv_object: &str) -> Result<Vec<RegionObservation>, FloodError> {
        let mut observations: Vec<RegionObservation> = Vec::new();
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_object.as_bytes());
        let mut skipped = 0u32;
        for row in rdr.records() {
            let rho = row.map_err(|e| FloodError::feed_parse("reservoir", e))?;
            match RegionObservation::try_from(&rho) {
                Ok(observation) => observations.push(observation),
                Err(reason) => {
                    warn!("skipping reservoir row {:?}: {}", rho.position(), reason);
                    skipped += 1;
                }
            }
        }
        info!(
            "parsed {} reservoir observations, skipped {}",
            observations.len(),
            skipped
        );
        Ok(observations)
    }

    /// Parse the embedded sample feed.
    pub fn sample() -> Result<Vec<RegionObservation>, FloodError> {
        RegionObservation::parse_feed_csv(SAMPLE_RESERVOIR_CSV)
    }

    /// True when this reading belongs to `region`, compared the way region
    /// names are matched everywhere: trimmed and case-insensitive.
    pub fn is_in_region(&self, region: &str) -> bool {
        same_region(&self.region_id, region)
    }
}

impl TryFrom<&StringRecord> for RegionObservation {
    type Error = &'static str;

    fn try_from(value: &StringRecord) -> Result<Self, Self::Error> {
        let field = |idx: usize| value.get(idx).unwrap_or("").trim();
        let district = field(2);
        if district.is_empty() {
            return Err("missing district");
        }
        let current_level_mcm = parse_number(field(3));
        let capacity_mcm = parse_number(field(4));
        let reservoir_fill_percent = match parse_optional_number(field(5)) {
            Some(pct) => pct,
            None if capacity_mcm > 0.0 => current_level_mcm / capacity_mcm * 100.0,
            None => 0.0,
        };
        Ok(RegionObservation {
            region_id: district.to_string(),
            reservoir_name: field(0).to_string(),
            state: field(1).to_string(),
            district: district.to_string(),
            coordinates: Coordinates {
                lat: parse_number(field(8)),
                lon: parse_number(field(9)),
            },
            reservoir_fill_percent: clamp_percent(reservoir_fill_percent),
            current_level_mcm,
            capacity_mcm,
            inflow_rate: parse_number(field(6)).max(0.0),
            outflow_rate: parse_number(field(7)).max(0.0),
            river_level: value.get(RESERVOIR_ROW_LENGTH).and_then(parse_optional_number),
            last_updated: parse_feed_timestamp(field(10)),
        })
    }
}
