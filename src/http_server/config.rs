//! HTTP Server Configuration
//!
//! Bind address, CORS origins and the database connection settings used at
//! startup. Values come from defaults, then the environment, then CLI flags.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 5000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins (default: ["http://localhost:3000"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// PostgreSQL connection URL; absent means the volatile store is used
    #[serde(default)]
    pub database_url: Option<String>,

    /// Upper bound on the startup connection attempt
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn default_connect_timeout_ms() -> u64 {
    5000
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            database_url: None,
            connect_timeout_ms: default_connect_timeout_ms(),
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

    /// Defaults overlaid with the process environment
    pub fn from_env() -> Self {
        Self::default().merge_env(|key| std::env::var(key).ok())
    }

    /// Overlay values found through `lookup`.
    ///
    /// Reads `HOST`, `PORT`, `CORS_ORIGIN` (comma-separated), `DATABASE_URL`
    /// and `DB_CONNECT_TIMEOUT_MS`. Unparseable numbers are ignored.
    pub fn merge_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("HOST") {
            self.host = host;
        }
        if let Some(port) = get("PORT") {
            match port.trim().parse() {
                Ok(port) => self.port = port,
                Err(_) => warn!(value = %port, "ignoring invalid PORT"),
            }
        }
        if let Some(origins) = get("CORS_ORIGIN") {
            self.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(url) = get("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(ms) = get("DB_CONNECT_TIMEOUT_MS") {
            match ms.trim().parse() {
                Ok(ms) => self.connect_timeout_ms = ms,
                Err(_) => warn!(value = %ms, "ignoring invalid DB_CONNECT_TIMEOUT_MS"),
            }
        }

        self
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}
