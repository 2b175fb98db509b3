#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Persistent trip history storage backed by `SQLite`.
//!
//! Every planned trip (origin/destination pair, optional mode) is recorded
//! here so the suggestion pipeline can surface routes the user has searched
//! before. Uses `switchy_database` for all database operations, following
//! the same patterns as the rest of the system.

use std::path::Path;

use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};
use switchy_database_connection::init_sqlite_rusqlite;
use thiserror::Error;

/// Default path for the trips database.
pub const DEFAULT_DB_PATH: &str = "data/trips.db";

/// Errors from trip storage operations.
#[derive(Debug, Error)]
pub enum TripError {
    /// A database query or command failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A persisted trip search.
#[derive(Debug, Clone)]
pub struct TripRecord {
    /// Row ID.
    pub id: i64,
    /// Origin place name as entered.
    pub origin: String,
    /// Destination place name as entered.
    pub destination: String,
    /// Travel mode, when one was chosen.
    pub mode: Option<String>,
    /// When the trip was recorded (RFC 3339).
    pub created_at: String,
}

/// A trip about to be recorded.
#[derive(Debug, Clone)]
pub struct NewTrip {
    /// Origin place name.
    pub origin: String,
    /// Destination place name.
    pub destination: String,
    /// Travel mode, when one was chosen.
    pub mode: Option<String>,
}

/// Read/write access to the trip history.
///
/// The suggestion pipeline only ever consumes this trait, so tests can
/// substitute in-memory or failing implementations.
#[async_trait::async_trait]
pub trait TripStore: Send + Sync {
    /// Records a trip and returns its row ID.
    ///
    /// # Errors
    ///
    /// Returns [`TripError`] if the insert fails.
    async fn record(&self, trip: &NewTrip) -> Result<i64, TripError>;

    /// Returns up to `limit` trips whose origin or destination contains
    /// `substring` (case-insensitive), most recently recorded first.
    ///
    /// # Errors
    ///
    /// Returns [`TripError`] if the query fails.
    async fn find_matching(&self, substring: &str, limit: u32) -> Result<Vec<TripRecord>, TripError>;

    /// Returns the `limit` most recently recorded trips.
    ///
    /// # Errors
    ///
    /// Returns [`TripError`] if the query fails.
    async fn recent(&self, limit: u32) -> Result<Vec<TripRecord>, TripError>;
}

/// `SQLite`-backed [`TripStore`].
pub struct SqliteTripStore {
    db: Box<dyn Database>,
}

impl SqliteTripStore {
    /// Opens (or creates) the trips database at `path` and ensures the
    /// schema exists.
    ///
    /// # Errors
    ///
    /// Returns [`TripError`] if the database cannot be opened or schema
    /// creation fails.
    pub async fn open(path: &Path) -> Result<Self, TripError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db =
            init_sqlite_rusqlite(Some(path)).map_err(|e| TripError::Database(e.to_string()))?;

        ensure_schema(db.as_ref()).await?;

        Ok(Self { db })
    }

    /// Opens an in-memory trips database. Used by tests.
    ///
    /// # Errors
    ///
    /// Returns [`TripError`] if the database cannot be opened or schema
    /// creation fails.
    pub async fn open_in_memory() -> Result<Self, TripError> {
        let db = init_sqlite_rusqlite(None).map_err(|e| TripError::Database(e.to_string()))?;

        ensure_schema(db.as_ref()).await?;

        Ok(Self { db })
    }
}

/// Creates the trips table and indexes if they don't already exist.
async fn ensure_schema(db: &dyn Database) -> Result<(), TripError> {
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS trips (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            origin      TEXT NOT NULL,
            destination TEXT NOT NULL,
            mode        TEXT,
            created_at  TEXT NOT NULL
        )",
    )
    .await
    .map_err(|e| TripError::Database(e.to_string()))?;

    db.exec_raw(
        "CREATE INDEX IF NOT EXISTS idx_trips_created
         ON trips (created_at)",
    )
    .await
    .map_err(|e| TripError::Database(e.to_string()))?;

    Ok(())
}

#[async_trait::async_trait]
impl TripStore for SqliteTripStore {
    async fn record(&self, trip: &NewTrip) -> Result<i64, TripError> {
        let now = chrono::Utc::now().to_rfc3339();

        let rows = self
            .db
            .query_raw_params(
                "INSERT INTO trips (origin, destination, mode, created_at)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id",
                &[
                    DatabaseValue::String(trip.origin.trim().to_string()),
                    DatabaseValue::String(trip.destination.trim().to_string()),
                    trip.mode
                        .as_ref()
                        .map_or(DatabaseValue::Null, |m| DatabaseValue::String(m.clone())),
                    DatabaseValue::String(now),
                ],
            )
            .await
            .map_err(|e| TripError::Database(e.to_string()))?;

        let row = rows.first().ok_or_else(|| {
            TripError::Database("Failed to get trip id from insert".to_string())
        })?;

        let id: i64 = row
            .to_value("id")
            .map_err(|e| TripError::Database(format!("Failed to parse trip id: {e}")))?;

        Ok(id)
    }

    async fn find_matching(
        &self,
        substring: &str,
        limit: u32,
    ) -> Result<Vec<TripRecord>, TripError> {
        let needle = substring.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self
            .db
            .query_raw_params(
                "SELECT id, origin, destination, mode, created_at FROM trips
                 WHERE LOWER(origin) LIKE '%' || $1 || '%'
                    OR LOWER(destination) LIKE '%' || $1 || '%'
                 ORDER BY created_at DESC, id DESC
                 LIMIT $2",
                &[
                    DatabaseValue::String(needle),
                    DatabaseValue::Int64(i64::from(limit)),
                ],
            )
            .await
            .map_err(|e| TripError::Database(e.to_string()))?;

        Ok(rows.iter().map(to_trip_record).collect())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<TripRecord>, TripError> {
        let rows = self
            .db
            .query_raw_params(
                "SELECT id, origin, destination, mode, created_at FROM trips
                 ORDER BY created_at DESC, id DESC
                 LIMIT $1",
                &[DatabaseValue::Int64(i64::from(limit))],
            )
            .await
            .map_err(|e| TripError::Database(e.to_string()))?;

        Ok(rows.iter().map(to_trip_record).collect())
    }
}

/// Maps a database row to a [`TripRecord`].
fn to_trip_record(row: &switchy_database::Row) -> TripRecord {
    TripRecord {
        id: row.to_value("id").unwrap_or(0),
        origin: row.to_value("origin").unwrap_or_default(),
        destination: row.to_value("destination").unwrap_or_default(),
        mode: row.to_value("mode").unwrap_or(None),
        created_at: row.to_value("created_at").unwrap_or_default(),
    }
}
