//! Configuration loader for the `aquaflow` replay server.
//!
//! This module centralizes all runtime configuration values and their
//! defaults, loading from environment variables (with optional `.env` file
//! support provided by the caller). By consolidating configuration logic
//! here, we avoid scattering `env::var` calls throughout the codebase.

use std::env;

use anyhow::{anyhow, Result};

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u32 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($var_name:expr) => {
        env::var($var_name)
            .map_err(|_| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent
/// configuration snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Path of the CSV record source replayed to every client.
    pub data_path: String,

    /// Milliseconds between consecutive records on one connection.
    pub emit_interval_ms: u32,

    /// TCP port the WebSocket server listens on.
    pub listen_port: u32,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `TELEMETRY_DATA_PATH` – CSV record source path
///
/// Optional:
/// - `EMIT_INTERVAL_MS` – per-connection emission interval (default: 1000)
/// - `LISTEN_PORT` – server port (default: 8080)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let data_path = require_env!("TELEMETRY_DATA_PATH");
    let emit_interval_ms = parse_env_u32!("EMIT_INTERVAL_MS", 1000);
    let listen_port = parse_env_u32!("LISTEN_PORT", 8080);

    Ok(Config {
        data_path,
        emit_interval_ms,
        listen_port,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  TELEMETRY_DATA_PATH : {}", self.data_path);
        tracing::info!("  EMIT_INTERVAL_MS    : {}", self.emit_interval_ms);
        tracing::info!("  LISTEN_PORT         : {}", self.listen_port);
    }
}
