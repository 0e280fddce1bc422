//! Configuration management for the trimming layer and demo server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Call `dotenvy::dotenv()` first if a `.env` file should be honoured.

use std::str::FromStr;
use thiserror::Error;

/// Default request body limit (50 MiB), matching the JSON body parser
/// limit the trimming middleware historically ran behind.
pub const DEFAULT_BODY_LIMIT: usize = 50 * 1024 * 1024;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue {
        /// Variable name
        var: String,
        /// Raw value found
        value: String,
    },

    /// Values parsed but do not make sense together.
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Trimming layer configuration
    pub trim: TrimConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string for binding.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Trimming layer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimConfig {
    /// Trim JSON and form-urlencoded request bodies
    pub body: bool,
    /// Trim query string parameters
    pub query: bool,
    /// Maximum number of body bytes buffered for trimming
    pub body_limit: usize,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            body: true,
            query: true,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl TrimConfig {
    /// Validate trimming configuration
    ///
    /// # Errors
    ///
    /// Returns error if the body limit is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.body_limit == 0 {
            return Err(ConfigError::Validation(
                "body_limit must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but unparsable, or if the
    /// resulting configuration fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            server: ServerConfig {
                host: lookup("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_var(&lookup, "SERVER_PORT", defaults.server.port)?,
                log_level: lookup("LOG_LEVEL").unwrap_or(defaults.server.log_level),
            },
            trim: TrimConfig {
                body: parse_flag(&lookup, "TRIM_BODY", defaults.trim.body)?,
                query: parse_flag(&lookup, "TRIM_QUERY", defaults.trim.query)?,
                body_limit: parse_var(&lookup, "TRIM_BODY_LIMIT", defaults.trim.body_limit)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the whole configuration
    ///
    /// # Errors
    ///
    /// Returns error if the port is zero or the trimming section is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be > 0".to_string()));
        }
        self.trim.validate()
    }
}

fn parse_var<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw,
        }),
    }
}

fn parse_flag<F>(lookup: &F, var: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                var: var.to_string(),
                value: raw,
            }),
        },
    }
}
