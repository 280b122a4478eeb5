//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the CareSlot API server.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `STORE_BACKEND`: `memory`, `json` or `postgres` (default: "json")
//! - `BOOKINGS_PATH`: Booking file for the `json` backend (default: "data/bookings.json")
//! - `DATABASE_URL`: PostgreSQL connection string (required for the `postgres` backend)
//! - `PROVIDERS_PATH`: Provider catalog file (default: "data/providers.json")
//! - `STORE_LOCK_TIMEOUT_MS`: Bound on waiting for the booking store (default: 2000)

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use eyre::{bail, Result, WrapErr};
use tracing::Level;

/// Where booking records live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    JsonFile { path: PathBuf },
    Postgres { database_url: String },
}

/// Configuration for the CareSlot API server
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Booking store selection
    pub store_backend: StoreBackend,

    /// Path of the provider catalog JSON file
    pub providers_path: PathBuf,

    /// How long a request may wait for the booking store's serialization point
    pub store_lock_timeout_ms: u64,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The API_PORT value cannot be parsed as a u16
    /// - STORE_BACKEND names an unknown backend
    /// - STORE_BACKEND is `postgres` and DATABASE_URL is not set
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Network settings
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("API_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Logging settings
        let log_level = match lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = lookup("API_CORS_ORIGINS").map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        // Performance settings
        let request_timeout = lookup("API_REQUEST_TIMEOUT_SECONDS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        let store_lock_timeout_ms = lookup("STORE_LOCK_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(2000);

        // Storage settings
        let store_backend = match lookup("STORE_BACKEND")
            .unwrap_or_else(|| "json".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "json" => StoreBackend::JsonFile {
                path: lookup("BOOKINGS_PATH")
                    .unwrap_or_else(|| "data/bookings.json".to_string())
                    .into(),
            },
            "postgres" => StoreBackend::Postgres {
                database_url: lookup("DATABASE_URL").ok_or_else(|| {
                    eyre::eyre!("DATABASE_URL environment variable must be set for the postgres backend")
                })?,
            },
            other => bail!("Unknown STORE_BACKEND '{}'", other),
        };

        let providers_path = lookup("PROVIDERS_PATH")
            .unwrap_or_else(|| "data/providers.json".to_string())
            .into();

        Ok(Self {
            host,
            port,
            log_level,
            cors_origins,
            request_timeout,
            store_backend,
            providers_path,
            store_lock_timeout_ms,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn store_lock_timeout(&self) -> Duration {
        Duration::from_millis(self.store_lock_timeout_ms)
    }
}
