//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `LUNCHBOX_DATABASE_URL` - SQLite connection string
//!   (default: `sqlite://lunchbox.db?mode=rwc`)
//! - `LUNCHBOX_HOST` - Bind address (default: 127.0.0.1)
//! - `LUNCHBOX_PORT` - Listen port (default: 3000)
//! - `LUNCHBOX_BASE_URL` - Public URL (default: http://localhost:3000);
//!   HTTPS here turns on the Secure cookie flag

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://lunchbox.db?mode=rwc";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Lunchbox application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection URL (may carry credentials in other deployments)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` when a variable is present but
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("LUNCHBOX_DATABASE_URL")
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned());

        let host_raw =
            std::env::var("LUNCHBOX_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_owned());
        let host: IpAddr = host_raw
            .parse()
            .map_err(|e| ConfigError::InvalidEnvVar("LUNCHBOX_HOST".to_owned(), format!("{e}")))?;

        let port = match std::env::var("LUNCHBOX_PORT") {
            Ok(raw) => raw.parse().map_err(|e| {
                ConfigError::InvalidEnvVar("LUNCHBOX_PORT".to_owned(), format!("{e}"))
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let base_url =
            std::env::var("LUNCHBOX_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());

        Ok(Self {
            database_url: SecretString::from(database_url),
            host,
            port,
            base_url,
        })
    }

    /// Socket address to bind to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the deployment is served over HTTPS (controls the Secure
    /// flag on the session cookie).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        // from_env reads the process environment; the defaults apply when
        // nothing is set, which is the common case in tests.
        let config = AppConfig::from_env().expect("default config loads");
        assert_eq!(config.socket_addr().port(), config.port);
        assert!(!config.is_secure() || config.base_url.starts_with("https://"));
    }
}
