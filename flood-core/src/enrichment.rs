//! Optional weather and river enrichment.
//!
//! Both documents come from a simulation or a live API and may be absent;
//! consumers take them as `Option<&T>` and fall back when they are missing.

use crate::error::FloodError;
use serde::{Deserialize, Serialize};

/// Current conditions and a short rainfall outlook for a region.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSnapshot {
    /// Rainfall over the last 24 hours, mm.
    pub rainfall: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// Air temperature, degrees Celsius.
    pub temperature: f64,
    /// Expected daily rainfall for the coming days, mm.
    pub forecast: Vec<f64>,
}

impl WeatherSnapshot {
    pub fn parse_json(json: &str) -> Result<WeatherSnapshot, FloodError> {
        serde_json::from_str(json).map_err(|e| FloodError::feed_parse("weather", e))
    }

    /// Mean of the current reading and the outlook, ignoring non-finite values.
    pub fn mean_rainfall(&self) -> f64 {
        let readings: Vec<f64> = std::iter::once(self.rainfall)
            .chain(self.forecast.iter().copied())
            .filter(|v| v.is_finite())
            .collect();
        if readings.is_empty() {
            0.0
        } else {
            readings.iter().sum::<f64>() / readings.len() as f64
        }
    }
}

/// Direction a river gauge is moving.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiverTrend {
    Rising,
    Falling,
    #[default]
    Steady,
}

/// Reading from a river gauge with its warning and danger marks, in metres.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiverGauge {
    pub river_name: String,
    pub current_level: f64,
    pub danger_level: f64,
    pub warning_level: f64,
    #[serde(default)]
    pub trend: RiverTrend,
}

impl RiverGauge {
    pub fn parse_json(json: &str) -> Result<RiverGauge, FloodError> {
        serde_json::from_str(json).map_err(|e| FloodError::feed_parse("river", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weather_with_missing_fields() {
        let weather = WeatherSnapshot::parse_json(r#"{"rainfall": 42.0, "forecast": [10.0, 20.0]}"#)
            .unwrap();
        assert_eq!(weather.rainfall, 42.0);
        assert_eq!(weather.humidity, 0.0);
        assert_eq!(weather.forecast, vec![10.0, 20.0]);
        assert_eq!(weather.mean_rainfall(), 24.0);
    }

    #[test]
    fn test_parse_river_gauge() {
        let gauge = RiverGauge::parse_json(
            r#"{"riverName":"Periyar","currentLevel":9.0,"dangerLevel":12.0,"warningLevel":8.5,"trend":"rising"}"#,
        )
        .unwrap();
        assert_eq!(gauge.river_name, "Periyar");
        assert_eq!(gauge.trend, RiverTrend::Rising);
        assert_eq!(gauge.danger_level, 12.0);
        assert_eq!(gauge.warning_level, 8.5);
    }

    #[test]
    fn test_bad_json_is_a_feed_error() {
        let err = RiverGauge::parse_json("{").unwrap_err();
        assert!(matches!(err, FloodError::FeedParse { feed: "river", .. }));
    }
}
