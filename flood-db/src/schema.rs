//! SQL schema definitions for the in-memory SQLite database.
//!
//! The schema is applied as a single batch when the database is initialized.

/// Returns the full SQL schema as a single batch string.
///
/// This creates the following tables:
///
/// - `reservoirs` - One row per reservoir reading in the current region snapshot
/// - `rainfall` - Monthly rainfall totals per location. The primary key keeps
///   the first row loaded for a `(location, year, month)`.
///
/// Text keys use `COLLATE NOCASE` so region lookups match the
/// case-insensitive comparison used by the scoring code.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS reservoirs (
        reservoir_name TEXT NOT NULL COLLATE NOCASE,
        state TEXT NOT NULL COLLATE NOCASE,
        district TEXT NOT NULL COLLATE NOCASE,
        current_level_mcm REAL NOT NULL,
        capacity_mcm REAL NOT NULL,
        percentage_full REAL NOT NULL,
        inflow_cusecs REAL NOT NULL,
        outflow_cusecs REAL NOT NULL,
        lat REAL,
        lon REAL,
        river_level REAL,
        last_updated TEXT,
        PRIMARY KEY (reservoir_name, district)
    );
    CREATE INDEX IF NOT EXISTS idx_res_district ON reservoirs(district);
    CREATE INDEX IF NOT EXISTS idx_res_state ON reservoirs(state);

    CREATE TABLE IF NOT EXISTS rainfall (
        location TEXT NOT NULL COLLATE NOCASE,
        year INTEGER NOT NULL,
        month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
        total_rainfall_mm REAL NOT NULL,
        PRIMARY KEY (location, year, month)
    );
    CREATE INDEX IF NOT EXISTS idx_rain_location ON rainfall(location);
    "#
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn count_of(conn: &Connection, kind: &str, name: &str) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = ?1 AND name = ?2",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn schema_creates_tables_and_indexes() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema())
            .expect("Schema SQL should be valid");

        for table in ["reservoirs", "rainfall"] {
            assert_eq!(count_of(&conn, "table", table), 1, "Table '{}' should exist", table);
        }
        for idx in ["idx_res_district", "idx_res_state", "idx_rain_location"] {
            assert_eq!(count_of(&conn, "index", idx), 1, "Index '{}' should exist", idx);
        }
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();
        conn.execute_batch(create_schema())
            .expect("Applying schema twice should succeed due to IF NOT EXISTS");
    }

    #[test]
    fn rainfall_month_is_checked() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();
        let result = conn.execute(
            "INSERT INTO rainfall (location, year, month, total_rainfall_mm) VALUES ('X', 2024, 13, 1.0)",
            [],
        );
        assert!(result.is_err());
    }
}
