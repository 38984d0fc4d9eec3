//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// SQLite connection string (e.g. `sqlite://excursions.db`).
    pub database_url: String,

    /// Maximum number of connections in the store pool.
    pub database_max_connections: u32,

    /// Per-connection busy timeout in seconds. A writer blocked behind
    /// a concurrent admission waits up to this long before the store
    /// reports a transient failure.
    pub database_busy_timeout_secs: u64,

    /// Seconds between reminder sweeps.
    pub reminder_interval_secs: u64,

    /// Start of the reminder window, in hours before the excursion.
    pub reminder_window_from_hours: i64,

    /// End of the reminder window, in hours before the excursion.
    pub reminder_window_to_hours: i64,

    /// Capacity of the notification broadcast channel.
    pub notification_bus_capacity: usize,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://excursions.db".to_string());

        let database_max_connections = parse_env("DATABASE_MAX_CONNECTIONS", 5);
        let database_busy_timeout_secs = parse_env("DATABASE_BUSY_TIMEOUT_SECS", 30);

        let reminder_interval_secs = parse_env("REMINDER_INTERVAL_SECS", 1800);
        let reminder_window_from_hours = parse_env("REMINDER_WINDOW_FROM_HOURS", 23);
        let reminder_window_to_hours = parse_env("REMINDER_WINDOW_TO_HOURS", 25);

        let notification_bus_capacity = parse_env("NOTIFICATION_BUS_CAPACITY", 1024);

        Ok(Self {
            listen_addr,
            database_url,
            database_max_connections,
            database_busy_timeout_secs,
            reminder_interval_secs,
            reminder_window_from_hours,
            reminder_window_to_hours,
            notification_bus_capacity,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
