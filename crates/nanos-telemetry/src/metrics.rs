//! Prometheus metrics for the service container.
//!
//! All metrics follow the naming convention: `nanos_<area>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // BOOT METRICS
    // =========================================================================

    /// Descriptors turned into factory bindings
    pub static ref SERVICES_REGISTERED: Counter = Counter::new(
        "nanos_boot_services_registered_total",
        "Total number of service factories installed into the root context"
    ).expect("metric creation failed");

    /// Activations by outcome
    pub static ref SERVICE_ACTIVATIONS: CounterVec = CounterVec::new(
        Opts::new("nanos_service_activations_total", "Service activations"),
        &["outcome"]  // outcome: started/resolution_failed/construction_failed
    ).expect("metric creation failed");

    /// Time from factory invocation to a started service
    pub static ref ACTIVATION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "nanos_service_activation_duration_seconds",
            "Time spent constructing and starting a service"
        ).buckets(exponential_buckets(0.0001, 2.0, 16).expect("valid bucket layout"))
    ).expect("metric creation failed");

    // =========================================================================
    // BENCHMARK METRICS
    // =========================================================================

    /// Completed benchmark runs
    pub static ref BENCH_RUNS: CounterVec = CounterVec::new(
        Opts::new("nanos_bench_runs_total", "Benchmark runs"),
        &["result"]  // result: completed/timed_out
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(SERVICES_REGISTERED.clone()),
        Box::new(SERVICE_ACTIVATIONS.clone()),
        Box::new(ACTIVATION_DURATION.clone()),
        Box::new(BENCH_RUNS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
