use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordinal flood risk classification.
///
/// The derive order is the risk order: `Low < Medium < High < Severe`.
/// Signals are combined by taking the maximum.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Severe,
}

/// Probability at or above which a forecast day is classed severe.
pub const SEVERE_PROBABILITY: f64 = 80.0;
/// Probability at or above which a forecast day is classed high.
pub const HIGH_PROBABILITY: f64 = 60.0;
/// Probability at or above which a forecast day is classed medium.
pub const MEDIUM_PROBABILITY: f64 = 35.0;

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Severe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Severe => "severe",
        }
    }

    /// Combine any number of signals; the result is the highest level seen,
    /// or `Low` when there are none.
    pub fn combine<I>(levels: I) -> RiskLevel
    where
        I: IntoIterator<Item = RiskLevel>,
    {
        levels.into_iter().max().unwrap_or_default()
    }

    /// Risk level implied by a daily flood probability (0-100).
    pub fn from_probability(probability: f64) -> RiskLevel {
        if probability >= SEVERE_PROBABILITY {
            RiskLevel::Severe
        } else if probability >= HIGH_PROBABILITY {
            RiskLevel::High
        } else if probability >= MEDIUM_PROBABILITY {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            "severe" => Ok(RiskLevel::Severe),
            other => Err(format!("unknown risk level: {other}")),
        }
    }
}
