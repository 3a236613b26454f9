//! Risk classification from reservoir fill, inflow and river gauges.

use flood_core::enrichment::RiverGauge;
use flood_core::region::{clamp_percent, RegionObservation};
use flood_core::RiskLevel;
use flood_utils::numbers::finite_or_zero;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tunable thresholds for [`RiskThresholds::classify`].
///
/// Fill thresholds are percentages of capacity; inflow thresholds are cusecs.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub fill_severe: f64,
    pub fill_high: f64,
    pub fill_medium: f64,
    pub inflow_high: f64,
    pub inflow_medium: f64,
    pub inflow_low: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        RiskThresholds {
            fill_severe: 90.0,
            fill_high: 75.0,
            fill_medium: 50.0,
            inflow_high: 50_000.0,
            inflow_medium: 25_000.0,
            inflow_low: 10_000.0,
        }
    }
}

impl RiskThresholds {
    /// Classify a reservoir signal. Missing or NaN inputs read as 0, fill is
    /// clamped to [0, 100] and negative inflow reads as 0.
    pub fn classify(&self, fill_percent: Option<f64>, inflow: Option<f64>) -> RiskLevel {
        let fill = clamp_percent(finite_or_zero(fill_percent));
        let inflow = finite_or_zero(inflow).max(0.0);
        if fill >= self.fill_severe || inflow >= self.inflow_high {
            RiskLevel::Severe
        } else if fill >= self.fill_high || inflow >= self.inflow_medium {
            RiskLevel::High
        } else if fill >= self.fill_medium || inflow >= self.inflow_low {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Classify one observation from its fill and inflow.
    pub fn classify_observation(&self, observation: &RegionObservation) -> RiskLevel {
        self.classify(
            Some(observation.reservoir_fill_percent),
            Some(observation.inflow_rate),
        )
    }
}

/// Risk implied by a river gauge alone.
pub fn river_risk(gauge: &RiverGauge) -> RiskLevel {
    let level = gauge.current_level;
    if !level.is_finite() {
        return RiskLevel::Low;
    }
    if gauge.danger_level > 0.0 && level >= gauge.danger_level {
        RiskLevel::Severe
    } else if gauge.warning_level > 0.0 && level >= gauge.warning_level {
        RiskLevel::High
    } else {
        RiskLevel::Low
    }
}

/// Classify with the default thresholds, combining in the river gauge when
/// one is available.
pub fn classify_risk(fill_percent: f64, inflow: f64, river: Option<&RiverGauge>) -> RiskLevel {
    let reservoir = RiskThresholds::default().classify(Some(fill_percent), Some(inflow));
    match river {
        Some(gauge) => reservoir.max(river_risk(gauge)),
        None => reservoir,
    }
}

/// Risk of a region: the maximum over every observation attributed to it.
/// A region with no observations is `Low`.
pub fn region_risk(
    thresholds: &RiskThresholds,
    observations: &[RegionObservation],
    region: &str,
) -> RiskLevel {
    RiskLevel::combine(
        observations
            .iter()
            .filter(|obs| obs.is_in_region(region))
            .map(|obs| thresholds.classify_observation(obs)),
    )
}

/// Risk of every region present in the snapshot, keyed by region id.
pub fn aggregate_region_risks(
    thresholds: &RiskThresholds,
    observations: &[RegionObservation],
) -> BTreeMap<String, RiskLevel> {
    let mut risks: BTreeMap<String, RiskLevel> = BTreeMap::new();
    for obs in observations {
        let level = thresholds.classify_observation(obs);
        let entry = risks.entry(obs.region_id.clone()).or_default();
        *entry = (*entry).max(level);
    }
    risks
}
