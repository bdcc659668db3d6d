use std::sync::atomic::{AtomicU64, Ordering};

use crate::service::{NanoService, ServiceError};

/// Answers liveness checks.
#[derive(Debug, Default)]
pub struct PingService {
    pings: AtomicU64,
}

impl PingService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ping(&self) -> &'static str {
        self.pings.fetch_add(1, Ordering::Relaxed);
        "pong"
    }

    pub fn count(&self) -> u64 {
        self.pings.load(Ordering::Relaxed)
    }
}

impl NanoService for PingService {
    fn start(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}
