use std::sync::OnceLock;
use std::time::{Duration, Instant};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::service::{NanoService, ServiceError};

/// Reports how long the container has been up.
///
/// The clock starts when the service starts, which for the eager built-in
/// entry is during boot.
#[derive(Debug, Default)]
pub struct UptimeService {
    started: OnceLock<(DateTime<Utc>, Instant)>,
}

impl UptimeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started.get().map(|(at, _)| *at)
    }

    pub fn uptime(&self) -> Duration {
        self.started
            .get()
            .map(|(_, instant)| instant.elapsed())
            .unwrap_or_default()
    }

    /// Plain-text report served at `/uptime`.
    pub fn report(&self) -> String {
        match self.started_at() {
            Some(at) => format!(
                "up {}s since {}",
                self.uptime().as_secs(),
                at.to_rfc3339_opts(SecondsFormat::Secs, true)
            ),
            None => "not started".to_string(),
        }
    }
}

impl NanoService for UptimeService {
    fn start(&self) -> Result<(), ServiceError> {
        let _ = self.started.set((Utc::now(), Instant::now()));
        Ok(())
    }
}
