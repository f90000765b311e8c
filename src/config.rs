//! Process configuration
//!
//! Everything is read from environment variables. A `.env` file in the
//! working directory is merged in first by the CLI; variables already set in
//! the environment win.

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::http_server::HttpServerConfig;
use crate::store::{DatabaseConfig, UnknownDialect};

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error(transparent)]
    UnknownDialect(#[from] UnknownDialect),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidNumber { key: String, value: String },

    #[error("Invalid value for {key}: '{value}' (expected true or false)")]
    InvalidBool { key: String, value: String },
}

/// Resolved configuration for one process
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub http: HttpServerConfig,
}

impl AppConfig {
    /// Resolve from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            database: DatabaseConfig::from_lookup(&lookup)?,
            http: HttpServerConfig::from_lookup(&lookup)?,
        })
    }
}

/// Treat unset, empty and whitespace-only values alike
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

pub(crate) fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}
