//! N-day flood probability forecasts.
//!
//! Each day's probability is a weighted sum of five capped factors, shifted
//! by a trend that depends only on the region's risk level and the day
//! index, plus optional noise from an injected [`NoiseSource`].

use crate::historical::{HistoricalPattern, RainfallArchive, RainfallStatistics};
use crate::noise::{NoNoise, NoiseSource};
use chrono::{Datelike, NaiveDate};
use flood_core::date_range::DateRange;
use flood_core::forecast::{FactorBreakdown, Forecast, ForecastDay, MAX_FORECAST_DAYS};
use flood_core::{FloodError, RiskLevel};
use flood_utils::numbers::{finite_or_zero, round_tenth};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_3;

pub const RAINFALL_CAP: f64 = 40.0;
pub const RESERVOIR_CAP: f64 = 35.0;
pub const SATURATION_CAP: f64 = 25.0;
pub const HISTORICAL_CAP: f64 = 20.0;
pub const SEASONAL_CAP: f64 = 15.0;

pub const RAINFALL_WEIGHT: f64 = 0.35;
pub const RESERVOIR_WEIGHT: f64 = 0.30;
pub const SATURATION_WEIGHT: f64 = 0.15;
pub const HISTORICAL_WEIGHT: f64 = 0.15;
pub const SEASONAL_WEIGHT: f64 = 0.05;

/// Reservoir points assumed when no reservoir reading is available.
pub const RESERVOIR_FALLBACK_POINTS: f64 = 12.0;
/// Monthly rainfall (mm) that earns the full historical factor.
pub const HISTORICAL_REFERENCE_MM: f64 = 300.0;
/// Expected rainfall (mm) reported when there is no rainfall history.
pub const FALLBACK_EXPECTED_RAINFALL_MM: f64 = 15.0;
/// Scale applied to the historical average when estimating rainfall.
pub const EXPECTED_RAINFALL_SCALE: f64 = 1.3;

pub const MIN_PROBABILITY: f64 = 5.0;
pub const MAX_PROBABILITY: f64 = 95.0;
pub const MIN_CONFIDENCE: f64 = 25.0;
pub const MAX_CONFIDENCE: f64 = 95.0;
/// Confidence lost per day of lead time.
pub const CONFIDENCE_DECAY_PER_DAY: f64 = 6.0;
/// Fewer historical records than this costs confidence.
pub const SPARSE_HISTORY_RECORDS: usize = 10;
pub const SPARSE_HISTORY_PENALTY: f64 = 10.0;
pub const MISSING_RESERVOIR_PENALTY: f64 = 5.0;

/// Generator settings that are read from configuration.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    /// Days forecast when the caller does not say.
    pub default_days: u32,
    /// Largest probability shift, in points, that noise may add or remove.
    pub noise_amplitude: f64,
    /// Seed for [`crate::noise::SeededNoise`]; no noise when unset.
    pub seed: Option<u64>,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        ForecastSettings {
            default_days: 10,
            noise_amplitude: 3.0,
            seed: None,
        }
    }
}

/// What to forecast.
#[derive(Debug, PartialEq, Clone)]
pub struct ForecastRequest {
    pub region: String,
    pub start_date: NaiveDate,
    pub risk_level: RiskLevel,
    /// Reservoir points (0-35); `None` when no reservoir data exists.
    pub reservoir_factor: Option<f64>,
    /// Rainfall points (0-40).
    pub rainfall_factor: f64,
    pub days: i64,
}

/// Rainfall history available to the generator for one region.
#[derive(Debug, PartialEq, Clone)]
pub struct ForecastHistory {
    pub statistics: RainfallStatistics,
    pub pattern: HistoricalPattern,
}

impl ForecastHistory {
    pub fn from_archive(archive: &RainfallArchive, region: &str, year: i32) -> Self {
        ForecastHistory {
            statistics: archive.statistics(region),
            pattern: archive.historical_pattern(region, year),
        }
    }

    /// History for a region whose rainfall data could not be loaded.
    pub fn unavailable(region: &str, year: i32) -> Self {
        ForecastHistory {
            statistics: RainfallStatistics::default(),
            pattern: HistoricalPattern::canonical(region, year),
        }
    }
}

/// Probability shift for `day_index` at a given risk level.
///
/// Severe regions start high and ease off, high regions peak around day 4,
/// medium regions oscillate and low regions stay flat.
pub fn trend_adjustment(risk_level: RiskLevel, day_index: u32) -> f64 {
    let day = f64::from(day_index);
    match risk_level {
        RiskLevel::Severe => (20.0 - 2.5 * day).max(-10.0),
        RiskLevel::High => (12.0 - 3.0 * (day - 4.0).abs()).max(-8.0),
        RiskLevel::Medium => 6.0 * (day * FRAC_PI_3).sin(),
        RiskLevel::Low => -6.0,
    }
}

/// Seasonal points for a calendar month: monsoon months score highest.
pub fn seasonal_points(month: u32) -> f64 {
    match month {
        6..=9 => SEASONAL_CAP,
        5 | 10 => 9.0,
        _ => 4.0,
    }
}

/// Weighted probability (0-100) of a factor breakdown.
pub fn base_probability(factors: &FactorBreakdown) -> f64 {
    let share = |points: f64, cap: f64| (points / cap).clamp(0.0, 1.0);
    100.0
        * (RAINFALL_WEIGHT * share(factors.rainfall, RAINFALL_CAP)
            + RESERVOIR_WEIGHT * share(factors.reservoir, RESERVOIR_CAP)
            + SATURATION_WEIGHT * share(factors.ground_saturation, SATURATION_CAP)
            + HISTORICAL_WEIGHT * share(factors.historical, HISTORICAL_CAP)
            + SEASONAL_WEIGHT * share(factors.seasonal, SEASONAL_CAP))
}

/// Confidence for `day_index` given how much supporting data exists.
pub fn confidence_for_day(day_index: u32, record_count: usize, reservoir_present: bool) -> f64 {
    let mut confidence = MAX_CONFIDENCE - CONFIDENCE_DECAY_PER_DAY * f64::from(day_index);
    if record_count < SPARSE_HISTORY_RECORDS {
        confidence -= SPARSE_HISTORY_PENALTY;
    }
    if !reservoir_present {
        confidence -= MISSING_RESERVOIR_PENALTY;
    }
    confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Expected rainfall for a day with the given probability.
pub fn expected_rainfall(probability: f64, average_rainfall_mm: Option<f64>) -> f64 {
    match average_rainfall_mm {
        Some(avg) if avg.is_finite() && avg > 0.0 => {
            round_tenth(probability / 100.0 * (avg * EXPECTED_RAINFALL_SCALE))
        }
        _ => FALLBACK_EXPECTED_RAINFALL_MM,
    }
}

pub struct ForecastGenerator<N: NoiseSource = NoNoise> {
    noise: N,
    noise_amplitude: f64,
}

impl Default for ForecastGenerator<NoNoise> {
    fn default() -> Self {
        ForecastGenerator::new()
    }
}

impl ForecastGenerator<NoNoise> {
    /// A generator without noise.
    pub fn new() -> Self {
        ForecastGenerator {
            noise: NoNoise,
            noise_amplitude: 0.0,
        }
    }
}

impl<N: NoiseSource> ForecastGenerator<N> {
    /// A generator adding `noise.sample(day) * amplitude` to each day.
    /// A negative or non-finite amplitude disables noise.
    pub fn with_noise(noise: N, amplitude: f64) -> Self {
        let noise_amplitude = if amplitude.is_finite() {
            amplitude.max(0.0)
        } else {
            0.0
        };
        ForecastGenerator {
            noise,
            noise_amplitude,
        }
    }

    fn factors_for(
        &self,
        rainfall: f64,
        reservoir: f64,
        day_index: u32,
        date: &NaiveDate,
        pattern: &HistoricalPattern,
    ) -> FactorBreakdown {
        let day = f64::from(day_index);
        let month = date.month();
        FactorBreakdown {
            rainfall,
            reservoir,
            ground_saturation: (rainfall * (0.4 + 0.03 * day) + reservoir * 0.15)
                .clamp(0.0, SATURATION_CAP),
            historical: (pattern.rainfall_for_month(month) / HISTORICAL_REFERENCE_MM
                * HISTORICAL_CAP)
                .clamp(0.0, HISTORICAL_CAP),
            seasonal: seasonal_points(month),
        }
    }

    /// Generate `request.days` forecast days.
    ///
    /// Missing reservoir or rainfall data lowers confidence and switches to
    /// fallback constants but never fails; only an out-of-range day count
    /// or a window running past the last representable date is rejected.
    pub fn generate(
        &self,
        request: &ForecastRequest,
        history: &ForecastHistory,
    ) -> Result<Forecast, FloodError> {
        if request.days <= 0 || request.days > MAX_FORECAST_DAYS {
            return Err(FloodError::InvalidDayCount(request.days));
        }
        let days = u32::try_from(request.days)
            .map_err(|_| FloodError::InvalidDayCount(request.days))?;

        let rainfall = finite_or_zero(Some(request.rainfall_factor)).clamp(0.0, RAINFALL_CAP);
        let reservoir_present = request.reservoir_factor.is_some_and(f64::is_finite);
        let reservoir = match request.reservoir_factor {
            Some(points) if points.is_finite() => points.clamp(0.0, RESERVOIR_CAP),
            _ => RESERVOIR_FALLBACK_POINTS,
        };
        let statistics = &history.statistics;

        let window = DateRange::window(request.start_date, days).ok_or(
            FloodError::DateOutOfRange {
                start: request.start_date,
                days: request.days,
            },
        )?;

        let mut forecast_days = Vec::with_capacity(days as usize);
        for (day_index, date) in (0..days).zip(window) {
            let factors = self.factors_for(rainfall, reservoir, day_index, &date, &history.pattern);
            let noise = finite_or_zero(Some(self.noise.sample(day_index))) * self.noise_amplitude;
            let base = base_probability(&factors);
            let raw = base + trend_adjustment(request.risk_level, day_index) + noise;
            let probability = round_tenth(raw.clamp(MIN_PROBABILITY, MAX_PROBABILITY));
            let confidence =
                confidence_for_day(day_index, statistics.record_count, reservoir_present);
            debug!(
                "{} day {}: base {:.1} raw {:.1} -> p {} c {}",
                request.region,
                day_index,
                base,
                raw,
                probability,
                confidence
            );
            forecast_days.push(ForecastDay {
                day_index,
                date,
                probability,
                confidence,
                expected_rainfall_mm: expected_rainfall(
                    probability,
                    statistics.average_rainfall_mm,
                ),
                risk_level: RiskLevel::from_probability(probability),
                factors,
            });
        }

        info!(
            "generated {}-day forecast for {} ({} risk, reservoir data: {}, history records: {})",
            forecast_days.len(),
            request.region,
            request.risk_level,
            reservoir_present,
            statistics.record_count
        );
        Ok(Forecast {
            region: request.region.clone(),
            start_date: request.start_date,
            days: forecast_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::historical::CANONICAL_MONSOON_CURVE_MM;
    use crate::noise::SeededNoise;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    fn request(risk_level: RiskLevel, days: i64) -> ForecastRequest {
        ForecastRequest {
            region: "Idukki".to_string(),
            start_date: start(),
            risk_level,
            reservoir_factor: Some(30.0),
            rainfall_factor: 30.0,
            days,
        }
    }

    fn rich_history() -> ForecastHistory {
        ForecastHistory {
            statistics: RainfallStatistics {
                record_count: 24,
                average_rainfall_mm: Some(100.0),
            },
            pattern: HistoricalPattern::canonical("Idukki", 2024),
        }
    }

    #[test]
    fn test_rejects_non_positive_days() {
        let generator = ForecastGenerator::new();
        for days in [0, -1, -30] {
            let err = generator
                .generate(&request(RiskLevel::High, days), &rich_history())
                .unwrap_err();
            assert_eq!(err, FloodError::InvalidDayCount(days));
        }
        assert!(generator
            .generate(&request(RiskLevel::High, MAX_FORECAST_DAYS + 1), &rich_history())
            .is_err());
    }

    #[test]
    fn test_length_and_bounds() {
        let generator = ForecastGenerator::with_noise(SeededNoise::from_seed_u64(3), 25.0);
        for risk in RiskLevel::ALL {
            for days in [1, 5, 10, 30, 366] {
                let forecast = generator
                    .generate(&request(risk, days), &rich_history())
                    .unwrap();
                assert_eq!(forecast.len(), days as usize);
                for (idx, day) in forecast.days.iter().enumerate() {
                    assert_eq!(day.day_index, idx as u32);
                    assert!((5.0..=95.0).contains(&day.probability));
                    assert!((25.0..=95.0).contains(&day.confidence));
                }
            }
        }
    }

    #[test]
    fn test_dates_follow_start() {
        let forecast = ForecastGenerator::new()
            .generate(&request(RiskLevel::Low, 3), &rich_history())
            .unwrap();
        let dates: Vec<NaiveDate> = forecast.days.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![
                start(),
                NaiveDate::from_ymd_opt(2024, 7, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 7, 3).unwrap()
            ]
        );
    }

    #[test]
    fn test_trend_shapes() {
        assert!(trend_adjustment(RiskLevel::Severe, 0) > trend_adjustment(RiskLevel::Severe, 5));
        assert_eq!(trend_adjustment(RiskLevel::Severe, 100), -10.0);
        let high: Vec<f64> = (0..10).map(|d| trend_adjustment(RiskLevel::High, d)).collect();
        let peak = high.iter().cloned().fold(f64::MIN, f64::max);
        assert_eq!(high[4], peak);
        assert!(high[0] < high[4] && high[9] < high[4]);
        assert!(trend_adjustment(RiskLevel::Medium, 1) > 0.0);
        assert!(trend_adjustment(RiskLevel::Medium, 4) < 0.0);
        assert!((0..30).all(|d| trend_adjustment(RiskLevel::Low, d) == -6.0));
        for risk in RiskLevel::ALL {
            for day in 0..30 {
                assert_eq!(trend_adjustment(risk, day), trend_adjustment(risk, day));
            }
        }
    }

    #[test]
    fn test_base_probability_weights() {
        let full = FactorBreakdown {
            rainfall: RAINFALL_CAP,
            reservoir: RESERVOIR_CAP,
            ground_saturation: SATURATION_CAP,
            historical: HISTORICAL_CAP,
            seasonal: SEASONAL_CAP,
        };
        assert!((base_probability(&full) - 100.0).abs() < 1e-9);
        assert_eq!(base_probability(&FactorBreakdown::default()), 0.0);
        let rain_only = FactorBreakdown {
            rainfall: 20.0,
            ..FactorBreakdown::default()
        };
        assert!((base_probability(&rain_only) - 17.5).abs() < 1e-9);
    }

    #[test]
    fn test_factors_are_capped() {
        let mut req = request(RiskLevel::Medium, 20);
        req.rainfall_factor = 500.0;
        req.reservoir_factor = Some(500.0);
        let forecast = ForecastGenerator::new().generate(&req, &rich_history()).unwrap();
        for day in &forecast.days {
            assert_eq!(day.factors.rainfall, RAINFALL_CAP);
            assert_eq!(day.factors.reservoir, RESERVOIR_CAP);
            assert!(day.factors.ground_saturation <= SATURATION_CAP);
            assert!(day.factors.historical <= HISTORICAL_CAP);
            assert!(day.factors.seasonal <= SEASONAL_CAP);
        }
        // July in the canonical curve exceeds the reference month.
        assert!(CANONICAL_MONSOON_CURVE_MM[6] > HISTORICAL_REFERENCE_MM);
        assert_eq!(forecast.days[0].factors.historical, HISTORICAL_CAP);
    }

    #[test]
    fn test_confidence_decay_and_deductions() {
        assert_eq!(confidence_for_day(0, 24, true), 95.0);
        assert_eq!(confidence_for_day(1, 24, true), 89.0);
        assert_eq!(confidence_for_day(0, 9, true), 85.0);
        assert_eq!(confidence_for_day(0, 24, false), 90.0);
        assert_eq!(confidence_for_day(0, 0, false), 80.0);
        assert_eq!(confidence_for_day(12, 24, true), 25.0);
        assert_eq!(confidence_for_day(30, 0, false), 25.0);
    }

    #[test]
    fn test_expected_rainfall() {
        assert_eq!(expected_rainfall(50.0, Some(100.0)), 65.0);
        assert_eq!(expected_rainfall(50.0, None), FALLBACK_EXPECTED_RAINFALL_MM);
        assert_eq!(expected_rainfall(50.0, Some(0.0)), FALLBACK_EXPECTED_RAINFALL_MM);
    }

    #[test]
    fn test_missing_upstream_data_still_forecasts() {
        let mut req = request(RiskLevel::Severe, 10);
        req.reservoir_factor = None;
        let history = ForecastHistory::unavailable("Idukki", 2024);
        let forecast = ForecastGenerator::new().generate(&req, &history).unwrap();
        assert_eq!(forecast.len(), 10);
        for day in &forecast.days {
            assert_eq!(day.factors.reservoir, RESERVOIR_FALLBACK_POINTS);
            assert_eq!(day.expected_rainfall_mm, FALLBACK_EXPECTED_RAINFALL_MM);
        }
        assert_eq!(forecast.days[0].confidence, 80.0);
    }

    #[test]
    fn test_deterministic_without_and_with_seeded_noise() {
        let req = request(RiskLevel::High, 10);
        let plain = ForecastGenerator::new();
        assert_eq!(
            plain.generate(&req, &rich_history()).unwrap(),
            plain.generate(&req, &rich_history()).unwrap()
        );
        let a = ForecastGenerator::with_noise(SeededNoise::from_seed_u64(11), 3.0);
        let b = ForecastGenerator::with_noise(SeededNoise::from_seed_u64(11), 3.0);
        assert_eq!(
            a.generate(&req, &rich_history()).unwrap(),
            b.generate(&req, &rich_history()).unwrap()
        );
    }

    #[test]
    fn test_risk_level_shifts_probability() {
        let generator = ForecastGenerator::new();
        let mean = |risk| {
            let forecast = generator.generate(&request(risk, 5), &rich_history()).unwrap();
            forecast.days.iter().map(|d| d.probability).sum::<f64>() / 5.0
        };
        assert!(mean(RiskLevel::Severe) > mean(RiskLevel::Low));
        assert!(mean(RiskLevel::High) > mean(RiskLevel::Low));
    }

    #[test]
    fn test_day_risk_follows_probability() {
        let forecast = ForecastGenerator::new()
            .generate(&request(RiskLevel::Severe, 10), &rich_history())
            .unwrap();
        for day in &forecast.days {
            assert_eq!(day.risk_level, RiskLevel::from_probability(day.probability));
        }
    }

    #[test]
    fn test_window_past_calendar_end_is_an_error() {
        let generator = ForecastGenerator::new();
        let mut late = request(RiskLevel::Severe, 10);
        late.start_date = NaiveDate::MAX - chrono::Days::new(2);
        let err = generator.generate(&late, &rich_history()).unwrap_err();
        assert_eq!(
            err,
            FloodError::DateOutOfRange {
                start: late.start_date,
                days: 10,
            }
        );

        late.days = 3;
        let forecast = generator.generate(&late, &rich_history()).unwrap();
        assert_eq!(forecast.len(), 3);
        assert_eq!(forecast.days[2].date, NaiveDate::MAX);
    }
}
