//! HTTP Server Configuration
//!
//! Listen address and response encoding for the notes endpoint.

use serde::{Deserialize, Serialize};

use crate::config::{non_empty, parse_bool, parse_number, ConfigError};

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// HTML-escape note text in responses (default: true)
    #[serde(default = "default_escape_html")]
    pub escape_html: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_escape_html() -> bool {
    true
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            escape_html: default_escape_html(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Resolve from `NOTES_HOST`, `NOTES_PORT` and `NOTES_ESCAPE_HTML`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(lookup(key));

        let port = match get("NOTES_PORT") {
            Some(raw) => parse_number("NOTES_PORT", &raw)?,
            None => default_port(),
        };
        let escape_html = match get("NOTES_ESCAPE_HTML") {
            Some(raw) => parse_bool("NOTES_ESCAPE_HTML", &raw)?,
            None => default_escape_html(),
        };

        Ok(Self {
            host: get("NOTES_HOST").unwrap_or_else(default_host),
            port,
            escape_html,
        })
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
