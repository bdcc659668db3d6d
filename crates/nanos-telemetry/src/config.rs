//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or an `EnvFilter` directive
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Include thread ids in log lines
    pub thread_ids: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "nanos".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            thread_ids: true,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OTEL_SERVICE_NAME`: Service name (default: nanos)
    /// - `NANOS_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `NANOS_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `NANOS_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `NANOS_THREAD_IDS`: Include thread ids (default: true)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "nanos".to_string()),

            log_level: env::var("NANOS_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("NANOS_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),

            json_logs: env::var("NANOS_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(is_container),

            thread_ids: env::var("NANOS_THREAD_IDS")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
        }
    }

    /// Quiet configuration for tests: warnings and above, no JSON.
    pub fn for_tests() -> Self {
        Self {
            log_level: "warn".to_string(),
            thread_ids: false,
            ..Self::default()
        }
    }
}

fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
