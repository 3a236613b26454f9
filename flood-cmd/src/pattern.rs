//! `pattern`: the 12-month rainfall pattern used for a region and year.
//!
//! Both feeds are loaded into the in-memory database first, so duplicate
//! rainfall rows collapse the same way for every consumer.

use crate::inputs::read_or_sample;
use anyhow::Result;
use flood_core::rainfall::SAMPLE_RAINFALL_CSV;
use flood_core::region::SAMPLE_RESERVOIR_CSV;
use flood_data::historical::{PatternSource, RainfallArchive};
use flood_db::Database;
use flood_utils::dates::month_abbrev;
use log::warn;
use std::fmt::Write;

fn describe_source(source: &PatternSource) -> String {
    match source {
        PatternSource::ExactYear => "recorded rainfall for the year".to_string(),
        PatternSource::RegionAverage => "average of the region's recorded years".to_string(),
        PatternSource::StateNeighbor { region, exact_year } => {
            if *exact_year {
                format!("same-state neighbour {} for the year", region)
            } else {
                format!("average of same-state neighbour {}", region)
            }
        }
        PatternSource::Canonical => "canonical monsoon curve".to_string(),
    }
}

pub fn pattern_report(db: &Database, region: &str, year: i32) -> Result<String> {
    let observations = db.query_region_observations()?;
    let archive = RainfallArchive::new(db.query_rainfall()?).with_regions(&observations);
    let pattern = archive.historical_pattern(region, year);

    let mut out = String::new();
    writeln!(out, "{} {}: {}", region, year, describe_source(&pattern.source))?;

    let region_records = db.query_rainfall_for_region(region)?;
    match (region_records.first(), region_records.last()) {
        (Some(first), Some(last)) => writeln!(
            out,
            "records for region: {} ({}-{})",
            region_records.len(),
            first.year,
            last.year
        )?,
        _ => writeln!(out, "records for region: 0")?,
    }

    let reservoirs = db.query_observations_for_region(region)?;
    if let Some(state) = reservoirs.first().map(|obs| obs.state.clone()) {
        let regions = db.query_regions_in_state(&state)?;
        writeln!(
            out,
            "reservoirs: {}, state {} ({} regions)",
            reservoirs.len(),
            state,
            regions.len()
        )?;
    }

    for month in pattern.months.iter() {
        writeln!(out, "{} {:>8.1} mm", month_abbrev(month.month), month.rainfall_mm)?;
    }
    Ok(out)
}

/// Per-location rainfall history held by the database.
pub fn coverage_report(db: &Database) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{:<20} {:>6} {:>6} {:>8}", "LOCATION", "FROM", "TO", "RECORDS")?;
    for coverage in db.query_rainfall_coverage()? {
        writeln!(
            out,
            "{:<20} {:>6} {:>6} {:>8}",
            coverage.location, coverage.first_year, coverage.last_year, coverage.record_count
        )?;
    }
    Ok(out)
}

pub fn run_pattern(
    reservoirs_csv: Option<&str>,
    rainfall_csv: Option<&str>,
    region: &str,
    year: i32,
    coverage: bool,
) -> Result<()> {
    let db = Database::new()?;
    db.load_rainfall(&read_or_sample(rainfall_csv, SAMPLE_RAINFALL_CSV)?)?;
    // States come from the reservoir feed; without it only the region's own
    // history and the canonical curve are available.
    let loaded = read_or_sample(reservoirs_csv, SAMPLE_RESERVOIR_CSV)
        .and_then(|csv| db.load_reservoirs(&csv));
    if let Err(e) = loaded {
        warn!("Reservoir feed unavailable ({}), neighbour lookup disabled", e);
    }

    print!("{}", pattern_report(&db, region, year)?);
    if coverage {
        println!();
        print!("{}", coverage_report(&db)?);
    }
    Ok(())
}
