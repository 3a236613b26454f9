//! In-memory SQLite layer over the reservoir and rainfall feeds.
//!
//! The scoring code in `flood-data` works on plain slices; this crate is for
//! ad-hoc inspection of a feed: per-state summaries, rainfall coverage, and
//! region lookups that match the scoring code's case-insensitive rules.
//!
//! # Usage
//!
//! ```rust
//! use flood_db::Database;
//! use flood_core::region::SAMPLE_RESERVOIR_CSV;
//!
//! let db = Database::new().unwrap();
//! db.load_reservoirs(SAMPLE_RESERVOIR_CSV).unwrap();
//! let kerala = db.query_regions_in_state("Kerala").unwrap();
//! assert_eq!(kerala, vec!["Idukki", "Wayanad"]);
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.
//!
//! - `reservoirs` - The current reservoir snapshot, replaced on every load
//! - `rainfall` - Monthly rainfall history, first row per month wins

pub mod schema;
mod loader;
mod queries;
pub mod models;

use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;

/// In-memory SQLite database holding one reservoir snapshot and the
/// rainfall history.
///
/// Cloning is cheap and clones share the same connection.
#[derive(Clone)]
pub struct Database {
    conn: Rc<RefCell<Connection>>,
}

impl Database {
    /// Create a new in-memory database with the full schema applied.
    pub fn new() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Rc::new(RefCell::new(conn)),
        })
    }
}
