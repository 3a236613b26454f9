//! Core types and feed parsing for regional flood risk data.
//!
//! The types here are the inputs and outputs of the scoring pipeline in
//! `flood-data`: region observations and historical rainfall parsed from the
//! tabular feeds, optional weather and river enrichment, risk levels and the
//! per-day forecast records.

pub mod date_range;
pub mod enrichment;
pub mod error;
#[cfg(feature = "api")]
pub mod feed;
pub mod forecast;
pub mod rainfall;
pub mod region;
pub mod risk_level;

pub use error::FloodError;
pub use risk_level::RiskLevel;
