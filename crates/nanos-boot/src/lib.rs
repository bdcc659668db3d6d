//! # Nanos Boot
//!
//! The container runtime: turns a catalog of service descriptors into a
//! closed root context of lazily started singletons.
//!
//! ## Modular Structure
//!
//! - `service` - The [`NanoService`] lifecycle trait
//! - `registry` - Implementation registry keyed by service class
//! - `activation` - The per-descriptor singleton factory
//! - `boot` - The boot state machine and the ready container
//! - `services/` - Built-in services (`http`, `ping`, `uptime`, ...)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use nanos_boot::{boot, BootConfig};
//!
//! let nanos = boot(BootConfig::from_env())?;
//! let uptime = nanos.get_as::<nanos_boot::services::UptimeService>("uptime")?;
//! println!("{}", uptime.report());
//! nanos.shutdown();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod activation;
pub mod boot;
pub mod config;
pub mod registry;
pub mod service;
pub mod services;

pub use activation::{ServiceFactory, StartedServices};
pub use boot::{
    boot, ActivationFailure, Boot, BootError, BootPhase, BootReport, Nanos, CATALOG_NAME,
    CONFIG_NAME,
};
pub use config::BootConfig;
pub use registry::ServiceRegistry;
pub use service::{NanoService, ServiceError};
pub use services::BuiltinServices;
