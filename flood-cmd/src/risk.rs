//! `risk`: current risk per region and reservoir totals per state.

use crate::config::FloodConfig;
use crate::inputs::read_reservoirs;
use anyhow::Result;
use flood_core::region::RegionObservation;
use flood_data::risk::aggregate_region_risks;
use flood_db::Database;
use std::fmt::Write;

/// Render the risk report for a reservoir snapshot.
pub fn risk_report(config: &FloodConfig, observations: &[RegionObservation]) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{:<20} {}", "REGION", "RISK")?;
    for (region, level) in aggregate_region_risks(&config.risk, observations) {
        writeln!(out, "{:<20} {}", region, level)?;
    }

    let db = Database::new()?;
    db.replace_observations(observations)?;
    writeln!(out)?;
    writeln!(
        out,
        "{:<20} {:>8} {:>10} {:>9} {:>12}",
        "STATE", "REGIONS", "RESERVOIRS", "AVG FILL", "MAX INFLOW"
    )?;
    for summary in db.query_state_summaries()? {
        writeln!(
            out,
            "{:<20} {:>8} {:>10} {:>8.1}% {:>12.0}",
            summary.state,
            summary.region_count,
            summary.reservoir_count,
            summary.average_fill_percent,
            summary.max_inflow_cusecs
        )?;
    }
    Ok(out)
}

pub fn run_risk(reservoirs_csv: Option<&str>, config: &FloodConfig) -> Result<()> {
    let observations = read_reservoirs(reservoirs_csv)?;
    print!("{}", risk_report(config, &observations)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_regions_and_states() {
        let observations = RegionObservation::sample().unwrap();
        let report = risk_report(&FloodConfig::default(), &observations).unwrap();
        let idukki = report.lines().find(|l| l.starts_with("Idukki")).unwrap();
        assert!(idukki.ends_with("severe"));
        let solapur = report.lines().find(|l| l.starts_with("Solapur")).unwrap();
        assert!(solapur.ends_with("low"));
        assert!(report.lines().any(|l| l.starts_with("Kerala")));
    }

    #[test]
    fn thresholds_come_from_config() {
        let observations = RegionObservation::sample().unwrap();
        let mut config = FloodConfig::default();
        config.risk.fill_severe = 99.0;
        config.risk.inflow_high = 1_000_000.0;
        let report = risk_report(&config, &observations).unwrap();
        let idukki = report.lines().find(|l| l.starts_with("Idukki")).unwrap();
        assert!(idukki.ends_with("high"));
    }
}
