//! Summary statistics over a forecast.

use flood_core::forecast::{ForecastDay, ForecastSummary, InitialTrend};
use flood_utils::numbers::round_tenth;

/// Probability above which a day counts towards sustained high risk.
pub const HIGH_RISK_PROBABILITY: f64 = 70.0;
/// Days above [`HIGH_RISK_PROBABILITY`] needed for sustained high risk.
pub const SUSTAINED_HIGH_RISK_DAYS: usize = 3;

/// Summarise a forecast. Works on any slice, including an empty one.
pub fn analyze(forecast: &[ForecastDay]) -> ForecastSummary {
    if forecast.is_empty() {
        return ForecastSummary::default();
    }

    let mut peak = &forecast[0];
    for day in &forecast[1..] {
        if day.probability > peak.probability
            || (day.probability == peak.probability && day.date < peak.date)
        {
            peak = day;
        }
    }

    let total: f64 = forecast.iter().map(|d| d.probability).sum();
    let average_probability = round_tenth(total / forecast.len() as f64);

    let initial_trend = match (forecast.first(), forecast.get(2)) {
        (Some(first), Some(third)) if third.probability > first.probability => {
            InitialTrend::Rising
        }
        (Some(_), Some(_)) => InitialTrend::Falling,
        _ => InitialTrend::Stable,
    };

    let high_days = forecast
        .iter()
        .filter(|d| d.probability > HIGH_RISK_PROBABILITY)
        .count();

    ForecastSummary {
        peak_day: Some(peak.clone()),
        average_probability,
        initial_trend,
        sustained_high_risk: high_days >= SUSTAINED_HIGH_RISK_DAYS,
    }
}
