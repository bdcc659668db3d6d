//! # Nanos Context
//!
//! Hierarchical name → binding environment used as the container's
//! dependency-injection root.
//!
//! ## Phases
//!
//! ```text
//!   ContextBuilder (open)                Context (closed)
//!   ─────────────────────    close()     ─────────────────────
//!   bind / bind_value / get  ───────→    get / get_as / child
//!                                        bind → ContextError::Closed
//! ```
//!
//! Closing freezes the key set of a node. It does not freeze values: an
//! `Unresolved` binding installed before closing still transitions to
//! `Resolved` on its first lookup afterwards.
//!
//! ## Singleton guarantee
//!
//! Each binding owns its own slot lock. Concurrent lookups of the same
//! unresolved name run the factory once; every caller observes the same
//! instance. A failed factory leaves the binding unresolved so a later
//! lookup retries.
//!
//! ```rust
//! use std::sync::Arc;
//! use nanos_context::{ContextBuilder, ContextError, Instance};
//!
//! let mut root = ContextBuilder::new();
//! root.bind_fn("greeting", |_ctx| Ok(Arc::new(String::from("hello")) as Instance)).unwrap();
//! let ctx = root.close();
//!
//! let greeting = ctx.get_as::<String>("greeting").unwrap();
//! assert_eq!(greeting.as_str(), "hello");
//! assert!(matches!(
//!     ctx.bind_value("late", Arc::new(1u32)),
//!     Err(ContextError::Closed { .. })
//! ));
//! ```

mod binding;
pub mod context;
pub mod error;
pub mod factory;

pub use context::{Context, ContextBuilder};
pub use error::{ActivationError, ContextError};
pub use factory::{Factory, FnFactory, Instance};
