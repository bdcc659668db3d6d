//! # Boot Configuration
//!
//! Defaults with environment overrides, loaded once by the binary and bound
//! into the root context as `"config"`.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Container configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootConfig {
    /// Interface the built-in HTTP server binds.
    pub http_host: String,
    /// HTTP port. `0` picks a free port.
    pub http_port: u16,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            http_host: "127.0.0.1".to_string(),
            http_port: 8080,
        }
    }
}

impl BootConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `NANOS_HTTP_HOST` | `127.0.0.1` |
    /// | `NANOS_HTTP_PORT` | `8080` |
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, ignoring unparsable values.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(host) = lookup("NANOS_HTTP_HOST") {
            self.http_host = host;
        }
        if let Some(port) = lookup("NANOS_HTTP_PORT") {
            match port.parse() {
                Ok(p) => self.http_port = p,
                Err(_) => warn!("NANOS_HTTP_PORT must be a port number, got {:?}", port),
            }
        }
        self
    }

    /// `host:port` for binding.
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}
