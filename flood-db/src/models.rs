//! Aggregate query result structs.
//!
//! Row-level queries return the `flood-core` types directly; the structs
//! here only exist for `GROUP BY` results.

use serde::Serialize;

/// Reservoir totals for one state in the current snapshot.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StateSummary {
    pub state: String,
    /// Distinct districts with at least one reservoir.
    pub region_count: i64,
    pub reservoir_count: i64,
    /// Mean fill across the state's reservoirs, percent.
    pub average_fill_percent: f64,
    /// Largest single inflow, cusecs.
    pub max_inflow_cusecs: f64,
}

/// How much rainfall history exists for a location.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RainfallCoverage {
    pub location: String,
    pub first_year: i32,
    pub last_year: i32,
    pub record_count: i64,
}
