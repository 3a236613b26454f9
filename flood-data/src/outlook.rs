//! Region flood outlook: risk, history, forecast and summary in one pass.

use crate::analysis::analyze;
use crate::forecast::{
    ForecastGenerator, ForecastHistory, ForecastRequest, RAINFALL_CAP, RESERVOIR_CAP,
};
use crate::historical::{HistoricalPattern, RainfallArchive};
use crate::noise::NoiseSource;
use crate::risk::{region_risk, river_risk, RiskThresholds};
use chrono::{Datelike, NaiveDate};
use flood_core::enrichment::{RiverGauge, WeatherSnapshot};
use flood_core::forecast::{Forecast, ForecastSummary};
use flood_core::region::RegionObservation;
use flood_core::{FloodError, RiskLevel};
use log::info;
use serde::Serialize;

/// Rainfall points per mm of mean weather rainfall.
pub const RAINFALL_POINTS_PER_MM: f64 = 0.5;
/// Rainfall points assumed without a weather snapshot.
pub const RAINFALL_FALLBACK_POINTS: f64 = 10.0;

/// Everything known about a region for one assessment.
pub struct OutlookInputs<'a> {
    pub region: &'a str,
    pub observations: &'a [RegionObservation],
    pub archive: &'a RainfallArchive,
    pub weather: Option<&'a WeatherSnapshot>,
    pub river: Option<&'a RiverGauge>,
    pub start_date: NaiveDate,
    pub days: i64,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct FloodOutlook {
    pub region: String,
    pub risk_level: RiskLevel,
    pub pattern: HistoricalPattern,
    pub forecast: Forecast,
    pub summary: ForecastSummary,
}

/// Reservoir points for a region: the fullest reservoir scaled to the cap.
/// `None` when the snapshot has no reading for the region.
pub fn reservoir_factor(observations: &[RegionObservation], region: &str) -> Option<f64> {
    observations
        .iter()
        .filter(|obs| obs.is_in_region(region))
        .map(|obs| obs.reservoir_fill_percent)
        .fold(None, |max: Option<f64>, fill| {
            Some(max.map_or(fill, |m| m.max(fill)))
        })
        .map(|fill| fill / 100.0 * RESERVOIR_CAP)
}

/// Rainfall points from a weather snapshot, or the fallback without one.
pub fn rainfall_factor(weather: Option<&WeatherSnapshot>) -> f64 {
    match weather {
        Some(snapshot) => {
            (snapshot.mean_rainfall() * RAINFALL_POINTS_PER_MM).clamp(0.0, RAINFALL_CAP)
        }
        None => RAINFALL_FALLBACK_POINTS,
    }
}

/// Assess a region. Fails only on an invalid day count.
pub fn assess<N: NoiseSource>(
    inputs: &OutlookInputs<'_>,
    thresholds: &RiskThresholds,
    generator: &ForecastGenerator<N>,
) -> Result<FloodOutlook, FloodError> {
    let reservoir_risk = region_risk(thresholds, inputs.observations, inputs.region);
    let risk_level = match inputs.river {
        Some(gauge) => reservoir_risk.max(river_risk(gauge)),
        None => reservoir_risk,
    };

    let history =
        ForecastHistory::from_archive(inputs.archive, inputs.region, inputs.start_date.year());
    let request = ForecastRequest {
        region: inputs.region.to_string(),
        start_date: inputs.start_date,
        risk_level,
        reservoir_factor: reservoir_factor(inputs.observations, inputs.region),
        rainfall_factor: rainfall_factor(inputs.weather),
        days: inputs.days,
    };
    let forecast = generator.generate(&request, &history)?;
    let summary = analyze(&forecast.days);
    info!(
        "outlook for {}: {} risk, peak {:?}, sustained high risk: {}",
        inputs.region,
        risk_level,
        summary.peak_day.as_ref().map(|d| d.date),
        summary.sustained_high_risk
    );

    Ok(FloodOutlook {
        region: inputs.region.to_string(),
        risk_level,
        pattern: history.pattern,
        forecast,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::RESERVOIR_FALLBACK_POINTS;
    use crate::historical::PatternSource;
    use flood_core::enrichment::RiverTrend;
    use flood_core::rainfall::HistoricalRainfallRecord;

    fn sample_inputs() -> (Vec<RegionObservation>, RainfallArchive) {
        let observations = RegionObservation::sample().unwrap();
        let archive = RainfallArchive::new(HistoricalRainfallRecord::sample().unwrap())
            .with_regions(&observations);
        (observations, archive)
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 8, 1).unwrap()
    }

    #[test]
    fn test_reservoir_factor_uses_fullest_reservoir() {
        let (observations, _) = sample_inputs();
        let factor = reservoir_factor(&observations, "Idukki").unwrap();
        assert!((factor - 94.6 / 100.0 * RESERVOIR_CAP).abs() < 1e-9);
        assert_eq!(reservoir_factor(&observations, "Atlantis"), None);
    }

    #[test]
    fn test_rainfall_factor() {
        assert_eq!(rainfall_factor(None), RAINFALL_FALLBACK_POINTS);
        let weather = WeatherSnapshot {
            rainfall: 40.0,
            forecast: vec![20.0],
            ..WeatherSnapshot::default()
        };
        assert_eq!(rainfall_factor(Some(&weather)), 15.0);
        let deluge = WeatherSnapshot {
            rainfall: 400.0,
            ..WeatherSnapshot::default()
        };
        assert_eq!(rainfall_factor(Some(&deluge)), RAINFALL_CAP);
    }

    #[test]
    fn test_assess_known_region() {
        let (observations, archive) = sample_inputs();
        let inputs = OutlookInputs {
            region: "Idukki",
            observations: &observations,
            archive: &archive,
            weather: None,
            river: None,
            start_date: start(),
            days: 10,
        };
        let outlook = assess(&inputs, &RiskThresholds::default(), &ForecastGenerator::new()).unwrap();
        assert_eq!(outlook.risk_level, RiskLevel::Severe);
        assert_eq!(outlook.pattern.source, PatternSource::ExactYear);
        assert_eq!(outlook.forecast.len(), 10);
        assert!(outlook.summary.peak_day.is_some());
        // 24 Idukki records and a reservoir reading: no deductions on day 0.
        assert_eq!(outlook.forecast.days[0].confidence, 95.0);
    }

    #[test]
    fn test_assess_unknown_region_degrades() {
        let (observations, archive) = sample_inputs();
        let inputs = OutlookInputs {
            region: "Atlantis",
            observations: &observations,
            archive: &archive,
            weather: None,
            river: None,
            start_date: start(),
            days: 5,
        };
        let outlook = assess(&inputs, &RiskThresholds::default(), &ForecastGenerator::new()).unwrap();
        assert_eq!(outlook.risk_level, RiskLevel::Low);
        assert!(outlook.pattern.is_canonical());
        assert_eq!(outlook.forecast.days[0].factors.reservoir, RESERVOIR_FALLBACK_POINTS);
        assert_eq!(outlook.forecast.days[0].confidence, 80.0);
    }

    #[test]
    fn test_river_gauge_raises_outlook_risk() {
        let (observations, archive) = sample_inputs();
        let gauge = RiverGauge {
            river_name: "Bhima".to_string(),
            current_level: 14.0,
            danger_level: 12.0,
            warning_level: 10.0,
            trend: RiverTrend::Rising,
        };
        let inputs = OutlookInputs {
            region: "Solapur",
            observations: &observations,
            archive: &archive,
            weather: None,
            river: Some(&gauge),
            start_date: start(),
            days: 3,
        };
        let outlook = assess(&inputs, &RiskThresholds::default(), &ForecastGenerator::new()).unwrap();
        assert_eq!(outlook.risk_level, RiskLevel::Severe);
    }

    #[test]
    fn test_assess_rejects_bad_day_count() {
        let (observations, archive) = sample_inputs();
        let inputs = OutlookInputs {
            region: "Idukki",
            observations: &observations,
            archive: &archive,
            weather: None,
            river: None,
            start_date: start(),
            days: 0,
        };
        let err = assess(&inputs, &RiskThresholds::default(), &ForecastGenerator::new()).unwrap_err();
        assert_eq!(err, FloodError::InvalidDayCount(0));
    }
}
