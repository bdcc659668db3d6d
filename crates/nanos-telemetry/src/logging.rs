//! Structured logging helpers.
//!
//! Every service-scoped event carries a `service` field so log aggregation
//! can group lines by the service that produced them.

/// Helper to create structured log entries with consistent formatting.
#[macro_export]
macro_rules! log_event {
    // Info level with service
    (info, $service:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            service = $service,
            $($($field)*,)?
            $msg
        )
    };

    // Warn level with service
    (warn, $service:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            service = $service,
            $($($field)*,)?
            $msg
        )
    };

    // Error level with service
    (error, $service:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            service = $service,
            $($($field)*,)?
            $msg
        )
    };

    // Debug level with service
    (debug, $service:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            service = $service,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log an activation outcome with standard fields.
#[macro_export]
macro_rules! log_activation {
    ($level:ident, $service:expr, $class:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            service = $service,
            service_class = $class,
            $($($field)*,)?
            $msg
        )
    };
}
