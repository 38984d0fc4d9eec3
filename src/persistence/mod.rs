//! Persistence layer: SQLite schedule store and reservation ledger.
//!
//! Provides [`store::BookingStore`] for durable storage of days, time
//! slots, and bookings. The concrete implementation uses
//! `sqlx::SqlitePool` for async SQLite access; admission runs under
//! `BEGIN IMMEDIATE` so a capacity re-read and insert never interleave
//! with another writer.

pub mod store;

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use crate::config::GatewayConfig;
use crate::error::GatewayError;

/// Opens the SQLite connection pool described by the configuration.
///
/// Every connection runs with WAL journaling, foreign keys on, and the
/// configured busy timeout, matching the pragmas the admission path
/// relies on.
///
/// # Errors
///
/// Returns [`GatewayError::Store`] if the URL is malformed or the
/// database cannot be opened.
pub async fn connect(config: &GatewayConfig) -> Result<SqlitePool, GatewayError> {
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(GatewayError::store)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(config.database_busy_timeout_secs));

    SqlitePoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect_with(options)
        .await
        .map_err(GatewayError::store)
}
