//! Monthly rainfall patterns from historical records.
//!
//! A pattern is resolved through a fixed sequence of tiers and the first
//! tier with data wins:
//! 1. the region's records for the requested year
//! 2. the region's records averaged per calendar month over all years
//! 3. other regions of the same state (exact year first, then averaged)
//! 4. [`CANONICAL_MONSOON_CURVE_MM`]

use flood_core::rainfall::HistoricalRainfallRecord;
use flood_core::region::RegionObservation;
use flood_utils::names::{region_key, same_region};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Monsoon-shaped monthly rainfall (mm, January first) used when no
/// historical data can be found. Dry winter, peak in July and August.
pub const CANONICAL_MONSOON_CURVE_MM: [f64; 12] = [
    20.0, 25.0, 30.0, 45.0, 80.0, 180.0, 320.0, 290.0, 200.0, 110.0, 45.0, 25.0,
];

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct MonthlyRainfall {
    pub month: u32,
    pub rainfall_mm: f64,
}

/// Which tier produced a pattern.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "tier")]
pub enum PatternSource {
    ExactYear,
    RegionAverage,
    StateNeighbor { region: String, exact_year: bool },
    Canonical,
}

/// Twelve months of rainfall for a region, January first.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct HistoricalPattern {
    pub region: String,
    pub year: i32,
    pub source: PatternSource,
    pub months: [MonthlyRainfall; 12],
}

impl HistoricalPattern {
    fn from_values(region: &str, year: i32, source: PatternSource, values: [f64; 12]) -> Self {
        let mut month = 0u32;
        let months = values.map(|rainfall_mm| {
            month += 1;
            MonthlyRainfall { month, rainfall_mm }
        });
        HistoricalPattern {
            region: region.to_string(),
            year,
            source,
            months,
        }
    }

    /// The canonical monsoon curve, attributed to `region`.
    pub fn canonical(region: &str, year: i32) -> Self {
        HistoricalPattern::from_values(
            region,
            year,
            PatternSource::Canonical,
            CANONICAL_MONSOON_CURVE_MM,
        )
    }

    /// Rainfall for a calendar month (1-12); 0 outside that range.
    pub fn rainfall_for_month(&self, month: u32) -> f64 {
        month_index(month)
            .map(|idx| self.months[idx].rainfall_mm)
            .unwrap_or_default()
    }

    pub fn values(&self) -> [f64; 12] {
        self.months.map(|m| m.rainfall_mm)
    }

    pub fn is_canonical(&self) -> bool {
        self.source == PatternSource::Canonical
    }
}

/// Record count and mean monthly total for one region.
#[derive(Debug, Default, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct RainfallStatistics {
    pub record_count: usize,
    pub average_rainfall_mm: Option<f64>,
}

#[derive(Debug, Clone)]
struct RegionEntry {
    name: String,
    state: String,
}

fn month_index(month: u32) -> Option<usize> {
    month.checked_sub(1).map(|m| m as usize).filter(|idx| *idx < 12)
}

/// Historical rainfall records plus the region-to-state mapping needed to
/// find neighbouring regions.
#[derive(Debug, Default, Clone)]
pub struct RainfallArchive {
    records: Vec<HistoricalRainfallRecord>,
    regions: BTreeMap<String, RegionEntry>,
}

impl RainfallArchive {
    pub fn new(records: Vec<HistoricalRainfallRecord>) -> Self {
        RainfallArchive {
            records,
            regions: BTreeMap::new(),
        }
    }

    /// Learn region states from a region feed snapshot. The first state seen
    /// for a region is kept.
    pub fn with_regions(mut self, observations: &[RegionObservation]) -> Self {
        for obs in observations {
            self.assign_state(&obs.region_id, &obs.state);
        }
        self
    }

    pub fn assign_state(&mut self, region: &str, state: &str) {
        self.regions
            .entry(region_key(region))
            .or_insert_with(|| RegionEntry {
                name: region.trim().to_string(),
                state: state.trim().to_string(),
            });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn records_for<'a>(
        &'a self,
        key: &'a str,
    ) -> impl Iterator<Item = &'a HistoricalRainfallRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| region_key(&r.region) == key)
    }

    pub fn statistics(&self, region: &str) -> RainfallStatistics {
        let key = region_key(region);
        let (count, sum) = self
            .records_for(&key)
            .fold((0usize, 0.0), |(n, s), r| (n + 1, s + r.total_rainfall_mm));
        RainfallStatistics {
            record_count: count,
            average_rainfall_mm: (count > 0).then(|| sum / count as f64),
        }
    }

    fn exact_year(&self, key: &str, year: i32) -> Option<[f64; 12]> {
        let mut values = [0.0; 12];
        let mut seen = [false; 12];
        for record in self.records_for(key).filter(|r| r.year == year) {
            let Some(idx) = month_index(record.month) else {
                continue;
            };
            if !seen[idx] {
                seen[idx] = true;
                values[idx] = record.total_rainfall_mm;
            }
        }
        seen.iter().any(|s| *s).then_some(values)
    }

    fn region_average(&self, key: &str) -> Option<[f64; 12]> {
        let mut by_year_month: BTreeMap<(i32, u32), f64> = BTreeMap::new();
        for record in self.records_for(key) {
            by_year_month
                .entry((record.year, record.month))
                .or_insert(record.total_rainfall_mm);
        }
        if by_year_month.is_empty() {
            return None;
        }
        let mut sums = [0.0; 12];
        let mut counts = [0u32; 12];
        for ((_, month), rainfall) in by_year_month {
            if let Some(idx) = month_index(month) {
                sums[idx] += rainfall;
                counts[idx] += 1;
            }
        }
        let mut values = [0.0; 12];
        for idx in 0..12 {
            if counts[idx] > 0 {
                values[idx] = sums[idx] / f64::from(counts[idx]);
            }
        }
        Some(values)
    }

    fn state_neighbours(&self, key: &str) -> Vec<&RegionEntry> {
        let Some(state) = self.regions.get(key).map(|e| e.state.as_str()) else {
            return Vec::new();
        };
        self.regions
            .iter()
            .filter(|(k, e)| k.as_str() != key && same_region(&e.state, state))
            .map(|(_, e)| e)
            .collect()
    }

    /// Resolve the monthly rainfall pattern of `region` for `year`.
    ///
    /// Always yields twelve months. Deterministic for a given archive.
    pub fn historical_pattern(&self, region: &str, year: i32) -> HistoricalPattern {
        let key = region_key(region);

        if let Some(values) = self.exact_year(&key, year) {
            debug!("pattern for {region}/{year}: exact year");
            return HistoricalPattern::from_values(region, year, PatternSource::ExactYear, values);
        }
        if let Some(values) = self.region_average(&key) {
            debug!("pattern for {region}/{year}: region average");
            return HistoricalPattern::from_values(
                region,
                year,
                PatternSource::RegionAverage,
                values,
            );
        }

        let neighbours = self.state_neighbours(&key);
        let exact = neighbours.iter().find_map(|n| {
            self.exact_year(&region_key(&n.name), year)
                .map(|values| (n, true, values))
        });
        let resolved = exact.or_else(|| {
            neighbours.iter().find_map(|n| {
                self.region_average(&region_key(&n.name))
                    .map(|values| (n, false, values))
            })
        });
        if let Some((neighbour, exact_year, values)) = resolved {
            debug!(
                "pattern for {region}/{year}: borrowed from {} (exact year: {exact_year})",
                neighbour.name
            );
            return HistoricalPattern::from_values(
                region,
                year,
                PatternSource::StateNeighbor {
                    region: neighbour.name.clone(),
                    exact_year,
                },
                values,
            );
        }

        debug!("pattern for {region}/{year}: canonical monsoon curve");
        HistoricalPattern::canonical(region, year)
    }
}
