//! Typed query methods over the loaded feeds.
//!
//! Row queries return `flood-core` types so their results can be passed to
//! the scoring code unchanged. Region and state arguments match
//! case-insensitively.

use crate::models::{RainfallCoverage, StateSummary};
use crate::Database;
use flood_core::rainfall::HistoricalRainfallRecord;
use flood_core::region::{Coordinates, RegionObservation};
use flood_utils::dates::parse_date;
use rusqlite::{params, Row};

const OBSERVATION_COLUMNS: &str = "reservoir_name, state, district, current_level_mcm,
    capacity_mcm, percentage_full, inflow_cusecs, outflow_cusecs, lat, lon, river_level,
    last_updated";

fn observation_from_row(row: &Row<'_>) -> rusqlite::Result<RegionObservation> {
    let district: String = row.get(2)?;
    let last_updated: Option<String> = row.get(11)?;
    Ok(RegionObservation {
        region_id: district.clone(),
        reservoir_name: row.get(0)?,
        state: row.get(1)?,
        district,
        coordinates: Coordinates {
            lat: row.get::<_, Option<f64>>(8)?.unwrap_or_default(),
            lon: row.get::<_, Option<f64>>(9)?.unwrap_or_default(),
        },
        reservoir_fill_percent: row.get(5)?,
        current_level_mcm: row.get(3)?,
        capacity_mcm: row.get(4)?,
        inflow_rate: row.get(6)?,
        outflow_rate: row.get(7)?,
        river_level: row.get(10)?,
        last_updated: last_updated.and_then(|s| parse_date(&s).ok()),
    })
}

fn rainfall_from_row(row: &Row<'_>) -> rusqlite::Result<HistoricalRainfallRecord> {
    Ok(HistoricalRainfallRecord {
        region: row.get(0)?,
        year: row.get(1)?,
        month: row.get(2)?,
        total_rainfall_mm: row.get(3)?,
    })
}

impl Database {
    // ───────────────────── Reservoir Queries ─────────────────────

    /// Every observation in the current snapshot, ordered by state,
    /// district and reservoir.
    pub fn query_region_observations(&self) -> anyhow::Result<Vec<RegionObservation>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!(
            "SELECT {OBSERVATION_COLUMNS} FROM reservoirs
             ORDER BY state, district, reservoir_name"
        ))?;
        let rows = stmt
            .query_map([], observation_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("query: query_region_observations returned {} records", rows.len());
        Ok(rows)
    }

    /// Observations attributed to one region (district).
    pub fn query_observations_for_region(
        &self,
        region: &str,
    ) -> anyhow::Result<Vec<RegionObservation>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!(
            "SELECT {OBSERVATION_COLUMNS} FROM reservoirs
             WHERE district = ?1
             ORDER BY reservoir_name"
        ))?;
        let rows = stmt
            .query_map(params![region.trim()], observation_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "query: query_observations_for_region({}) returned {} records",
            region,
            rows.len()
        );
        Ok(rows)
    }

    /// Distinct districts of a state, sorted.
    pub fn query_regions_in_state(&self, state: &str) -> anyhow::Result<Vec<String>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT district FROM reservoirs
             WHERE state = ?1
             ORDER BY district",
        )?;
        let rows = stmt
            .query_map(params![state.trim()], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(rows)
    }

    /// Per-state reservoir summary, ordered by state.
    pub fn query_state_summaries(&self) -> anyhow::Result<Vec<StateSummary>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT state,
                    COUNT(DISTINCT district),
                    COUNT(*),
                    AVG(percentage_full),
                    MAX(inflow_cusecs)
             FROM reservoirs
             GROUP BY state
             ORDER BY state",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StateSummary {
                    state: row.get(0)?,
                    region_count: row.get(1)?,
                    reservoir_count: row.get(2)?,
                    average_fill_percent: row.get(3)?,
                    max_inflow_cusecs: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("query: query_state_summaries returned {} records", rows.len());
        Ok(rows)
    }

    // ───────────────────── Rainfall Queries ─────────────────────

    /// All rainfall records ordered by location, year and month.
    pub fn query_rainfall(&self) -> anyhow::Result<Vec<HistoricalRainfallRecord>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT location, year, month, total_rainfall_mm FROM rainfall
             ORDER BY location, year, month",
        )?;
        let rows = stmt
            .query_map([], rainfall_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("query: query_rainfall returned {} records", rows.len());
        Ok(rows)
    }

    /// Rainfall records for one location.
    pub fn query_rainfall_for_region(
        &self,
        region: &str,
    ) -> anyhow::Result<Vec<HistoricalRainfallRecord>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT location, year, month, total_rainfall_mm FROM rainfall
             WHERE location = ?1
             ORDER BY year, month",
        )?;
        let rows = stmt
            .query_map(params![region.trim()], rainfall_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Years covered and record counts per location.
    pub fn query_rainfall_coverage(&self) -> anyhow::Result<Vec<RainfallCoverage>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT location, MIN(year), MAX(year), COUNT(*)
             FROM rainfall
             GROUP BY location
             ORDER BY location",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(RainfallCoverage {
                    location: row.get(0)?,
                    first_year: row.get(1)?,
                    last_year: row.get(2)?,
                    record_count: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
