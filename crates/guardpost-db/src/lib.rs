//! SQLite-backed store for the security workforce data model.
//!
//! Holds the domain query library: named, read-only lookup operations over
//! clients, sites, posts, employees, shifts, attendance, and incidents.
//! Lookups that take a human-typed name use case-insensitive substring
//! matching and resolve to the first matching record.

mod clients;
mod dashboard;
mod employees;
mod incidents;
mod posts;
mod schema;
mod search;
mod seed;
mod shifts;
mod sites;
mod sql;

pub use clients::{ClientDetails, ClientHierarchy, ClientStats, ClientSummary};
pub use dashboard::DashboardStats;
pub use employees::{Designation, EmployeeDetails, EmployeeSummary};
pub use incidents::{IncidentDetails, IncidentSummary};
pub use posts::{PostDetails, PostLookup, PostSummary};
pub use search::{SearchHit, SearchResults};
pub use shifts::{AttendanceRecord, ShiftDetails, ShiftSummary};
pub use sites::{SiteDetails, SiteEmployee, SiteSummary};

use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;
use tracing::info;

/// Errors from store operations.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to open database: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only query access to the workforce database.
///
/// The connection is shared behind a mutex; queries are short and the
/// dispatcher fan-out serializes on it without holding it across awaits.
pub struct WorkforceStore {
    conn: Mutex<Connection>,
}

impl WorkforceStore {
    /// Opens (or creates) the database at `path` and ensures the schema exists.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        if let Some(parent) = Path::new(path).parent() {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        schema::init_schema(&conn)?;
        info!("Database initialized at {}", path);
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Opens an in-memory database with the schema applied.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        schema::init_schema(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Populates demo data if the database is empty.
    pub fn seed_if_empty(&self) -> Result<(), StoreError> {
        seed::seed_if_empty(&self.conn())
    }

    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        // A poisoned lock only means a panic mid-query; the connection
        // itself is still usable.
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Builds a `LIKE` pattern for case-insensitive substring matching.
pub(crate) fn like_pattern(term: &str) -> String {
    format!("%{}%", term)
}

#[cfg(test)]
pub(crate) fn test_store() -> WorkforceStore {
    let store = WorkforceStore::open_in_memory().unwrap();
    store.seed_if_empty().unwrap();
    store
}
