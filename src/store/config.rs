//! Database Configuration
//!
//! Connection parameters for the note store, resolved from `DB_*`
//! environment variables. An unset or empty variable takes its default.

use serde::{Serialize, Serializer};

use crate::config::{non_empty, parse_number, ConfigError};

use super::dialect::Dialect;

/// Connection parameters for the note store
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseConfig {
    /// `DB_DRIVER` (default: pgsql)
    pub dialect: Dialect,
    /// `DB_HOST` (default: 127.0.0.1)
    pub host: String,
    /// `DB_PORT` (default: 5432 for pgsql, 3306 for mysql)
    pub port: u16,
    /// `DB_NAME` (default: php_ajax). For sqlite, a file path or `sqlite:` URL.
    pub name: String,
    /// `DB_USER` (default: postgres)
    pub user: String,
    /// `DB_PASS` (default: 1013)
    #[serde(serialize_with = "redact")]
    pub password: String,
    /// `DB_POOL_SIZE` (default: 5)
    pub pool_size: u32,
    /// `DB_ACQUIRE_TIMEOUT` in seconds (default: 5)
    pub acquire_timeout_secs: u64,
}

fn redact<S: Serializer>(password: &str, serializer: S) -> Result<S::Ok, S::Error> {
    if password.is_empty() {
        serializer.serialize_str("")
    } else {
        serializer.serialize_str("********")
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let dialect = Dialect::Postgres;
        Self {
            dialect,
            host: "127.0.0.1".to_string(),
            port: dialect.default_port(),
            name: "php_ajax".to_string(),
            user: "postgres".to_string(),
            password: "1013".to_string(),
            pool_size: 5,
            acquire_timeout_secs: 5,
        }
    }
}

impl DatabaseConfig {
    /// Resolve from a variable lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| non_empty(lookup(key));

        let dialect = match get("DB_DRIVER") {
            Some(raw) => raw.parse::<Dialect>()?,
            None => defaults.dialect,
        };

        let port = match get("DB_PORT") {
            Some(raw) => parse_number("DB_PORT", &raw)?,
            None => dialect.default_port(),
        };

        let pool_size = match get("DB_POOL_SIZE") {
            Some(raw) => parse_number("DB_POOL_SIZE", &raw)?,
            None => defaults.pool_size,
        };

        let acquire_timeout_secs = match get("DB_ACQUIRE_TIMEOUT") {
            Some(raw) => parse_number("DB_ACQUIRE_TIMEOUT", &raw)?,
            None => defaults.acquire_timeout_secs,
        };

        Ok(Self {
            dialect,
            host: get("DB_HOST").unwrap_or(defaults.host),
            port,
            name: get("DB_NAME").unwrap_or(defaults.name),
            user: get("DB_USER").unwrap_or(defaults.user),
            password: get("DB_PASS").unwrap_or(defaults.password),
            pool_size,
            acquire_timeout_secs,
        })
    }

    /// In-memory SQLite database, one connection
    pub fn sqlite_memory() -> Self {
        Self {
            dialect: Dialect::Sqlite,
            port: 0,
            name: "sqlite::memory:".to_string(),
            pool_size: 1,
            ..Self::default()
        }
    }

    /// Connection URL for the sqlx `Any` driver
    pub fn url(&self) -> String {
        match self.dialect {
            Dialect::Sqlite => {
                if self.name.starts_with("sqlite:") {
                    self.name.clone()
                } else {
                    format!("sqlite://{}?mode=rwc", self.name)
                }
            }
            Dialect::Postgres | Dialect::MySql => {
                let mut url = format!(
                    "{}://{}:{}@{}:{}/{}",
                    self.dialect.url_scheme(),
                    percent_encode(&self.user),
                    percent_encode(&self.password),
                    self.host,
                    self.port,
                    percent_encode(&self.name),
                );
                if self.dialect == Dialect::MySql {
                    url.push_str("?charset=utf8mb4");
                }
                url
            }
        }
    }
}

/// Percent-encode everything outside the URL unreserved set
fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}
