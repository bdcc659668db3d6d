//! # Nanos Bench
//!
//! Calls into an already activated service `invocation_count` times from
//! each of `thread_count` worker threads and reports wall-clock time.
//!
//! Failures inside a single invocation are swallowed. The harness measures
//! throughput, it does not judge correctness.
//!
//! ```rust,ignore
//! let report = BenchmarkRunner::builder(ctx.clone())
//!     .thread_count(4)
//!     .invocation_count(10_000)
//!     .timeout(5_000)
//!     .benchmark(PingBenchmark)
//!     .build()?
//!     .execute();
//! ```

mod latch;
mod runner;

pub use runner::{Benchmark, BenchmarkReport, BenchmarkRunner, BenchmarkRunnerBuilder};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("no benchmark was configured")]
    MissingBenchmark,

    #[error("thread count must be at least 1")]
    NoThreads,
}
