//! Benchmark runner and its builder.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use nanos_context::Context;
use nanos_telemetry::BENCH_RUNS;
use tracing::{info, warn};

use crate::latch::CountDownLatch;
use crate::BenchError;

/// A unit of work the runner invokes repeatedly.
pub trait Benchmark: Send + Sync + 'static {
    /// Called once before any worker starts.
    fn setup(&self, _ctx: &Context) {}

    /// One invocation. Errors are ignored by the runner.
    fn execute(&self, ctx: &Context) -> anyhow::Result<()>;
}

/// Outcome of one [`BenchmarkRunner::execute`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkReport {
    pub thread_count: usize,
    pub invocation_count: usize,
    pub elapsed: Duration,
    /// `false` if the timeout expired before every worker finished.
    pub completed: bool,
}

impl BenchmarkReport {
    pub fn elapsed_millis(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

/// Builder for [`BenchmarkRunner`].
pub struct BenchmarkRunnerBuilder {
    ctx: Context,
    thread_count: usize,
    invocation_count: usize,
    timeout_ms: u64,
    benchmark: Option<Arc<dyn Benchmark>>,
}

impl BenchmarkRunnerBuilder {
    pub fn thread_count(mut self, threads: usize) -> Self {
        self.thread_count = threads;
        self
    }

    pub fn invocation_count(mut self, invocations: usize) -> Self {
        self.invocation_count = invocations;
        self
    }

    /// Timeout in milliseconds. `0` waits for every worker.
    pub fn timeout(mut self, millis: u64) -> Self {
        self.timeout_ms = millis;
        self
    }

    pub fn benchmark<B: Benchmark>(mut self, benchmark: B) -> Self {
        self.benchmark = Some(Arc::new(benchmark));
        self
    }

    pub fn build(self) -> Result<BenchmarkRunner, BenchError> {
        let benchmark = self.benchmark.ok_or(BenchError::MissingBenchmark)?;
        if self.thread_count == 0 {
            return Err(BenchError::NoThreads);
        }
        Ok(BenchmarkRunner {
            ctx: self.ctx,
            thread_count: self.thread_count,
            invocation_count: self.invocation_count,
            timeout_ms: self.timeout_ms,
            benchmark,
        })
    }
}

/// Runs a [`Benchmark`] from several threads against a context.
pub struct BenchmarkRunner {
    ctx: Context,
    thread_count: usize,
    invocation_count: usize,
    timeout_ms: u64,
    benchmark: Arc<dyn Benchmark>,
}

/// Counts the latch down when a worker exits, even by panic.
struct WorkerDone(Arc<CountDownLatch>);

impl Drop for WorkerDone {
    fn drop(&mut self) {
        self.0.count_down();
    }
}

impl BenchmarkRunner {
    pub fn builder(ctx: Context) -> BenchmarkRunnerBuilder {
        BenchmarkRunnerBuilder {
            ctx,
            thread_count: num_cpus::get(),
            invocation_count: 0,
            timeout_ms: 0,
            benchmark: None,
        }
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    pub fn invocation_count(&self) -> usize {
        self.invocation_count
    }

    /// Timeout in milliseconds, `0` for none.
    pub fn timeout(&self) -> u64 {
        self.timeout_ms
    }

    /// Run the benchmark and block until it finishes or times out.
    ///
    /// Workers still running at the timeout are left to finish in the
    /// background.
    pub fn execute(&self) -> BenchmarkReport {
        let latch = Arc::new(CountDownLatch::new(self.thread_count));

        self.benchmark.setup(&self.ctx);
        let start = Instant::now();

        for worker in 0..self.thread_count {
            let done = WorkerDone(Arc::clone(&latch));
            let benchmark = Arc::clone(&self.benchmark);
            let ctx = self.ctx.clone();
            let invocations = self.invocation_count;

            let spawned = thread::Builder::new()
                .name(format!("bench-worker-{worker}"))
                .spawn(move || {
                    let _done = done;
                    for _ in 0..invocations {
                        let _ = benchmark.execute(&ctx);
                    }
                });
            if let Err(e) = spawned {
                // The closure (and its guard) is dropped, counting this worker down.
                warn!(worker, error = %e, "[Bench] Failed to spawn worker");
            }
        }

        let completed = if self.timeout_ms == 0 {
            latch.wait();
            true
        } else {
            latch.wait_for(Duration::from_millis(self.timeout_ms))
        };
        let elapsed = start.elapsed();

        let result = if completed { "completed" } else { "timed_out" };
        BENCH_RUNS.with_label_values(&[result]).inc();
        info!(
            "{} thread(s) executing {} time(s) took {} milliseconds",
            self.thread_count,
            self.invocation_count,
            elapsed.as_millis()
        );

        BenchmarkReport {
            thread_count: self.thread_count,
            invocation_count: self.invocation_count,
            elapsed,
            completed,
        }
    }
}
