use crate::error::FloodError;
use csv::{ReaderBuilder, StringRecord};
use flood_utils::names::same_region;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Embedded sample of the historical rainfall feed.
pub static SAMPLE_RAINFALL_CSV: &str = include_str!("../../fixtures/rainfall.csv");

/// Total rainfall observed in one region over one calendar month.
///
/// Records are not unique across sources; consumers that key by
/// `(region, year, month)` keep the first record they find.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct HistoricalRainfallRecord {
    pub region: String,
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    pub total_rainfall_mm: f64,
}

impl HistoricalRainfallRecord {
    /// Parse the rainfall feed.
    ///
    /// Expected CSV columns (with headers): location, year, month,
    /// total_rainfall_mm; further columns are ignored. Rows with an
    /// unreadable year, a month outside 1-12 or a non-numeric total are
    /// skipped. Negative totals read as 0.
    pub fn parse_feed_csv(csv_object: &str) -> Result<Vec<HistoricalRainfallRecord>, FloodError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_object.as_bytes());
        let mut records = Vec::new();
        let mut skipped = 0u32;
        for row in rdr.records() {
            let row = row.map_err(|e| FloodError::feed_parse("rainfall", e))?;
            match HistoricalRainfallRecord::try_from(&row) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    warn!("skipping rainfall row {:?}: {}", row.position(), reason);
                    skipped += 1;
                }
            }
        }
        info!(
            "parsed {} rainfall records, skipped {}",
            records.len(),
            skipped
        );
        Ok(records)
    }

    /// Parse the embedded sample feed.
    pub fn sample() -> Result<Vec<HistoricalRainfallRecord>, FloodError> {
        HistoricalRainfallRecord::parse_feed_csv(SAMPLE_RAINFALL_CSV)
    }

    /// True when this record belongs to `region` (trimmed, case-insensitive).
    pub fn is_in_region(&self, region: &str) -> bool {
        same_region(&self.region, region)
    }
}

impl TryFrom<&StringRecord> for HistoricalRainfallRecord {
    type Error = &'static str;

    fn try_from(value: &StringRecord) -> Result<Self, Self::Error> {
        let region = value.get(0).map(str::trim).unwrap_or("");
        if region.is_empty() {
            return Err("missing location");
        }
        let year = value
            .get(1)
            .and_then(|s| s.trim().parse::<i32>().ok())
            .ok_or("unreadable year")?;
        let month = value
            .get(2)
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|m| (1..=12).contains(m))
            .ok_or("month outside 1-12")?;
        let total_rainfall_mm = value
            .get(3)
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .ok_or("unreadable rainfall total")?;
        Ok(HistoricalRainfallRecord {
            region: region.to_string(),
            year,
            month,
            total_rainfall_mm: total_rainfall_mm.max(0.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::HistoricalRainfallRecord;

    const FEED: &str = "\
location,year,month,total_rainfall_mm,rainy_days
Idukki,2023,7,820,28
Idukki,2023,13,10,1
Idukki,20x3,8,560,20
Satara,2023,6,---,0
Satara,2023,6,-5,0
";

    #[test]
    fn test_parse_feed_csv() {
        let records = HistoricalRainfallRecord::parse_feed_csv(FEED).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].region, "Idukki");
        assert_eq!(records[0].year, 2023);
        assert_eq!(records[0].month, 7);
        assert_eq!(records[0].total_rainfall_mm, 820.0);
        assert_eq!(records[1].total_rainfall_mm, 0.0);
    }

    #[test]
    fn test_sample_feed_parses() {
        let records = HistoricalRainfallRecord::sample().unwrap();
        assert_eq!(records.len(), 40);
        assert!(records.iter().all(|r| (1..=12).contains(&r.month)));
        assert!(records[0].is_in_region("IDUKKI"));
    }
}
