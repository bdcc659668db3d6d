//! # Nanos Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Cross-crate container behavior
//!     ├── boot_flows.rs    # Eager activation, laziness, failure isolation
//!     ├── context_chain.rs # Singletons, closed roots, child contexts
//!     ├── collaborators.rs # Bench harness and blob against a booted container
//!     └── http_flows.rs    # Built-in catalog served over HTTP
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p nanos-tests
//!
//! # By area
//! cargo test -p nanos-tests integration::boot_flows::
//!
//! # Benchmarks
//! cargo bench -p nanos-tests
//! ```

pub mod integration;
