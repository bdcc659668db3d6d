//! # Nanos Telemetry
//!
//! Logging and metrics shared by every Nanos crate.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` with `EnvFilter`, pretty or JSON output
//! - **Metrics**: Prometheus counters and histograms for boot and activation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nanos_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // boot the container
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `nanos` | Service name in logs |
//! | `NANOS_LOG_LEVEL` | `info` | Log level filter |
//! | `NANOS_JSON_LOGS` | `false` | JSON log lines |
//! | `NANOS_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

mod config;
mod logging;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    gather_metrics, register_metrics, HistogramTimer, ACTIVATION_DURATION, BENCH_RUNS,
    SERVICES_REGISTERED, SERVICE_ACTIVATIONS,
};
pub use tracing_setup::{init_test_tracing, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracerInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and register metrics.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    // Metrics first so boot-time activations are counted
    register_metrics()?;
    init_tracing(config)
}

/// Convenience macro for creating a span with service context.
///
/// ```rust,ignore
/// let _span = nanos_telemetry::service_span!("activate", service = "http").entered();
/// ```
#[macro_export]
macro_rules! service_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
