use tracing::{debug, error, info, warn};

use crate::service::{NanoService, ServiceError};

/// Service-scoped logger. Every line carries a `service` field naming the
/// catalog entry the logger was registered under.
#[derive(Debug, Clone)]
pub struct NanoLogger {
    scope: String,
}

impl NanoLogger {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn info(&self, message: &str) {
        info!(service = %self.scope, "{}", message);
    }

    pub fn warn(&self, message: &str) {
        warn!(service = %self.scope, "{}", message);
    }

    pub fn error(&self, message: &str) {
        error!(service = %self.scope, "{}", message);
    }

    pub fn debug(&self, message: &str) {
        debug!(service = %self.scope, "{}", message);
    }
}

impl NanoService for NanoLogger {
    fn start(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}
