//! Flood risk scoring, historical aggregation and forecast generation.
//!
//! The pipeline is synchronous and pure over its inputs:
//! - [`risk`] classifies reservoir and river signals into a [`RiskLevel`]
//! - [`historical`] resolves a twelve-month rainfall pattern with fallbacks
//! - [`forecast`] produces an N-day probability forecast
//! - [`analysis`] summarises a forecast
//! - [`outlook`] runs the four for one region
//!
//! [`cache`] holds the region dataset between refreshes.
//!
//! [`RiskLevel`]: flood_core::RiskLevel

pub mod analysis;
pub mod cache;
pub mod forecast;
pub mod historical;
pub mod noise;
pub mod outlook;
pub mod risk;
