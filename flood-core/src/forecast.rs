use crate::risk_level::RiskLevel;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Longest forecast the generator will produce.
pub const MAX_FORECAST_DAYS: i64 = 366;

/// Points contributed by each factor before weighting, each within its cap.
#[derive(Debug, Default, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub rainfall: f64,
    pub reservoir: f64,
    pub ground_saturation: f64,
    pub historical: f64,
    pub seasonal: f64,
}

/// One day of a flood forecast.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Offset from the forecast start date.
    pub day_index: u32,
    pub date: NaiveDate,
    /// Flood probability, percent, within [5, 95].
    pub probability: f64,
    /// Confidence in the probability, percent, within [25, 95].
    pub confidence: f64,
    pub expected_rainfall_mm: f64,
    pub risk_level: RiskLevel,
    pub factors: FactorBreakdown,
}

/// A full forecast for one region. Always regenerated as a whole.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub region: String,
    pub start_date: NaiveDate,
    pub days: Vec<ForecastDay>,
}

impl Forecast {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Direction of the first days of a forecast.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialTrend {
    Rising,
    Falling,
    #[default]
    Stable,
}

/// Summary statistics derived from a forecast on demand.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub peak_day: Option<ForecastDay>,
    pub average_probability: f64,
    pub initial_trend: InitialTrend,
    pub sustained_high_risk: bool,
}
