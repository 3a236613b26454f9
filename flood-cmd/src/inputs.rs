//! Reading of the feed files named on the command line.
//!
//! When no reservoir or rainfall file is given, the samples embedded in
//! `flood-core` are used.

use anyhow::Result;
use flood_core::enrichment::{RiverGauge, WeatherSnapshot};
use flood_core::rainfall::{HistoricalRainfallRecord, SAMPLE_RAINFALL_CSV};
use flood_core::region::{RegionObservation, SAMPLE_RESERVOIR_CSV};
use log::info;

/// Contents of `path`, or the embedded `sample` when no path is given.
pub fn read_or_sample(path: Option<&str>, sample: &'static str) -> Result<String> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            info!("No feed file given, using the embedded sample");
            Ok(sample.to_string())
        }
    }
}

pub fn read_reservoirs(path: Option<&str>) -> Result<Vec<RegionObservation>> {
    let csv = read_or_sample(path, SAMPLE_RESERVOIR_CSV)?;
    Ok(RegionObservation::parse_feed_csv(&csv)?)
}

pub fn read_rainfall(path: Option<&str>) -> Result<Vec<HistoricalRainfallRecord>> {
    let csv = read_or_sample(path, SAMPLE_RAINFALL_CSV)?;
    Ok(HistoricalRainfallRecord::parse_feed_csv(&csv)?)
}

pub fn read_weather(path: Option<&str>) -> Result<Option<WeatherSnapshot>> {
    path.map(|path| -> Result<WeatherSnapshot> {
        let json = std::fs::read_to_string(path)?;
        Ok(WeatherSnapshot::parse_json(&json)?)
    })
    .transpose()
}

pub fn read_river(path: Option<&str>) -> Result<Option<RiverGauge>> {
    path.map(|path| -> Result<RiverGauge> {
        let json = std::fs::read_to_string(path)?;
        Ok(RiverGauge::parse_json(&json)?)
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_used_without_paths() {
        assert_eq!(read_reservoirs(None).unwrap().len(), 8);
        assert_eq!(read_rainfall(None).unwrap().len(), 40);
        assert!(read_weather(None).unwrap().is_none());
        assert!(read_river(None).unwrap().is_none());
    }

    #[test]
    fn missing_files_are_errors() {
        assert!(read_reservoirs(Some("/nonexistent/reservoirs.csv")).is_err());
        assert!(read_weather(Some("/nonexistent/weather.json")).is_err());
    }
}
