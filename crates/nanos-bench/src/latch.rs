//! Countdown latch.

use std::time::Duration;

use parking_lot::{Condvar, Mutex};

pub(crate) struct CountDownLatch {
    remaining: Mutex<usize>,
    zero: Condvar,
}

impl CountDownLatch {
    pub(crate) fn new(count: usize) -> Self {
        Self {
            remaining: Mutex::new(count),
            zero: Condvar::new(),
        }
    }

    pub(crate) fn count_down(&self) {
        let mut remaining = self.remaining.lock();
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            self.zero.notify_all();
        }
    }

    /// Block until the count reaches zero.
    pub(crate) fn wait(&self) {
        let mut remaining = self.remaining.lock();
        while *remaining > 0 {
            self.zero.wait(&mut remaining);
        }
    }

    /// Block until the count reaches zero or `timeout` elapses.
    ///
    /// Returns `true` if the count reached zero.
    pub(crate) fn wait_for(&self, timeout: Duration) -> bool {
        let mut remaining = self.remaining.lock();
        let deadline = std::time::Instant::now() + timeout;
        while *remaining > 0 {
            if self.zero.wait_until(&mut remaining, deadline).timed_out() {
                return *remaining == 0;
            }
        }
        true
    }
}
