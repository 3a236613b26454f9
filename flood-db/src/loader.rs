//! Loading of the reservoir and rainfall feeds into the database.
//!
//! CSV parsing is done by `flood-core`, so the database sees exactly the
//! rows the scoring code would see.
//!
//! # CSV Formats
//!
//! - **Reservoirs** (has headers): `reservoir_name,state,district,current_level_mcm,capacity_mcm,percentage_full,inflow_cusecs,outflow_cusecs,lat,long,last_updated`
//! - **Rainfall** (has headers): `location,year,month,total_rainfall_mm[,...]`

use crate::Database;
use flood_core::rainfall::HistoricalRainfallRecord;
use flood_core::region::RegionObservation;
use flood_utils::dates::format_date;
use rusqlite::params;

impl Database {
    /// Replace the reservoir snapshot with the rows of a reservoir feed.
    pub fn load_reservoirs(&self, csv_data: &str) -> anyhow::Result<usize> {
        let observations = RegionObservation::parse_feed_csv(csv_data)?;
        self.replace_observations(&observations)
    }

    /// Replace the reservoir snapshot with already-parsed observations.
    ///
    /// The previous snapshot is removed in the same transaction, so a
    /// reader never sees a mix of two fetch cycles. A reservoir listed twice
    /// for the same district keeps its first row. Returns the number of rows
    /// stored.
    pub fn replace_observations(&self, observations: &[RegionObservation]) -> anyhow::Result<usize> {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM reservoirs", [])?;
        let mut stored = 0usize;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO reservoirs
                 (reservoir_name, state, district, current_level_mcm, capacity_mcm,
                  percentage_full, inflow_cusecs, outflow_cusecs, lat, lon, river_level, last_updated)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for obs in observations {
                stored += stmt.execute(params![
                    obs.reservoir_name,
                    obs.state,
                    obs.district,
                    obs.current_level_mcm,
                    obs.capacity_mcm,
                    obs.reservoir_fill_percent,
                    obs.inflow_rate,
                    obs.outflow_rate,
                    obs.coordinates.lat,
                    obs.coordinates.lon,
                    obs.river_level,
                    obs.last_updated.as_ref().map(format_date),
                ])?;
            }
        }
        tx.commit()?;
        log::info!(
            "loader: Loaded {} reservoir observations, ignored {} duplicates",
            stored,
            observations.len() - stored
        );
        Ok(stored)
    }

    /// Load rainfall records from a rainfall feed.
    ///
    /// Rows for a `(location, year, month)` already present are ignored, so
    /// the first source loaded wins. Returns the number of rows stored.
    pub fn load_rainfall(&self, csv_data: &str) -> anyhow::Result<usize> {
        let records = HistoricalRainfallRecord::parse_feed_csv(csv_data)?;
        self.insert_rainfall(&records)
    }

    /// Insert already-parsed rainfall records; the first record per
    /// `(location, year, month)` wins.
    pub fn insert_rainfall(&self, records: &[HistoricalRainfallRecord]) -> anyhow::Result<usize> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "INSERT OR IGNORE INTO rainfall (location, year, month, total_rainfall_mm)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        let mut stored = 0usize;
        for record in records {
            stored += stmt.execute(params![
                record.region,
                record.year,
                record.month,
                record.total_rainfall_mm,
            ])?;
        }
        log::info!(
            "loader: Loaded {} rainfall records, ignored {} duplicates",
            stored,
            records.len() - stored
        );
        Ok(stored)
    }
}
