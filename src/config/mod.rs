//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `BRANDREACH` prefix and nested values use `__` as separator.
//!
//! # Example
//!
//! ```no_run
//! use brandreach_gating::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! let addr = config.server.socket_addr().expect("invalid bind address");
//! println!("Server running on {addr}");
//! ```

mod auth;
mod database;
mod error;
mod gating;
mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use gating::GatingConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Auth sub-service configuration (GoTrue-compatible endpoint)
    pub auth: AuthConfig,

    /// Gating configuration (decision watchdog)
    #[serde(default)]
    pub gating: GatingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads a `.env` file if present (development), then reads variables
    /// with the `BRANDREACH` prefix, `__` separating nested values:
    ///
    /// - `BRANDREACH__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `BRANDREACH__DATABASE__URL=...` -> `database.url = ...`
    /// - `BRANDREACH__GATING__DECISION_TIMEOUT_MS=3000`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("BRANDREACH")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(self.server.is_production())?;
        self.gating.validate()?;
        Ok(())
    }
}
