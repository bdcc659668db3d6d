//! Performance measurement services.
//!
//! `pmInfoDAO` aggregates timing samples per key; `pmLogger` records into it
//! through the context it was started with.

use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use nanos_context::{Context, ContextError};
use parking_lot::Mutex;
use serde::Serialize;

use super::PM_INFO_NAME;
use crate::service::{NanoService, ServiceError};

/// Aggregate of the samples recorded under one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PmInfo {
    pub count: u64,
    pub min: Duration,
    pub max: Duration,
    pub total: Duration,
}

impl PmInfo {
    fn first(sample: Duration) -> Self {
        Self {
            count: 1,
            min: sample,
            max: sample,
            total: sample,
        }
    }

    fn add(&mut self, sample: Duration) {
        self.count += 1;
        self.min = self.min.min(sample);
        self.max = self.max.max(sample);
        self.total += sample;
    }

    pub fn average(&self) -> Duration {
        match u32::try_from(self.count) {
            Ok(n) if n > 0 => self.total / n,
            _ => Duration::ZERO,
        }
    }
}

/// In-memory store of [`PmInfo`] keyed by measurement name.
#[derive(Debug, Default)]
pub struct PmInfoStore {
    entries: Mutex<BTreeMap<String, PmInfo>>,
}

impl PmInfoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, key: &str, sample: Duration) {
        let mut entries = self.entries.lock();
        match entries.get_mut(key) {
            Some(info) => info.add(sample),
            None => {
                entries.insert(key.to_string(), PmInfo::first(sample));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<PmInfo> {
        self.entries.lock().get(key).copied()
    }

    /// All entries, sorted by key.
    pub fn snapshot(&self) -> Vec<(String, PmInfo)> {
        self.entries
            .lock()
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl NanoService for PmInfoStore {
    fn start(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// Records timings into the `pmInfoDAO` service.
#[derive(Debug, Default)]
pub struct PmLogger {
    ctx: OnceLock<Context>,
}

impl PmLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sample under `key`.
    pub fn log(&self, key: &str, sample: Duration) -> Result<(), ContextError> {
        let ctx = self.ctx.get().ok_or_else(|| ContextError::NotFound {
            name: PM_INFO_NAME.to_string(),
        })?;
        ctx.get_as::<PmInfoStore>(PM_INFO_NAME)?.record(key, sample);
        Ok(())
    }

    /// Run `f`, recording its duration under `key`. Recording failures are
    /// ignored.
    pub fn measure<T>(&self, key: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        let _ = self.log(key, start.elapsed());
        out
    }
}

impl NanoService for PmLogger {
    fn set_context(&self, ctx: Context) {
        let _ = self.ctx.set(ctx);
    }

    fn start(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}
