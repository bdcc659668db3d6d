//! # Boot Orchestrator
//!
//! Drives the container from an empty catalog to a ready root context.
//!
//! ## Startup Sequence
//!
//! ```text
//! Idle ─▶ CatalogBuilding ─▶ FactoryInstallation ─▶ ContextClosing ─▶ EagerActivation ─▶ Ready
//!            │                     │                      │                  │
//!       load descriptors    one singleton factory   freeze root key     get() every
//!       (upsert by name)    per descriptor          set                 non-lazy entry
//! ```
//!
//! A service that fails to activate is logged and recorded in the
//! [`BootReport`]; boot continues with the next eager entry.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use nanos_catalog::{Catalog, DescriptorSource};
use nanos_context::{Context, ContextBuilder, ContextError, Instance};
use nanos_telemetry::SERVICES_REGISTERED;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::activation::{ServiceFactory, StartedServices};
use crate::config::BootConfig;
use crate::registry::ServiceRegistry;
use crate::services::BuiltinServices;

/// Names bound into the root context before any service factory.
pub const CONFIG_NAME: &str = "config";
pub const CATALOG_NAME: &str = "serviceCatalog";

/// Boot state machine. Phases only advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum BootPhase {
    Idle,
    CatalogBuilding,
    FactoryInstallation,
    ContextClosing,
    EagerActivation,
    Ready,
}

impl fmt::Display for BootPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::CatalogBuilding => "catalog-building",
            Self::FactoryInstallation => "factory-installation",
            Self::ContextClosing => "context-closing",
            Self::EagerActivation => "eager-activation",
            Self::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// Structural boot failures. Service activation failures never surface
/// here; they are isolated and reported in [`BootReport::failed`].
#[derive(Debug, Error)]
pub enum BootError {
    #[error("cannot bind root value: {0}")]
    Context(#[from] ContextError),
}

/// One eager service that did not come up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivationFailure {
    pub name: String,
    /// `resolution`, `construction`, `circular` or `lookup`.
    pub kind: String,
    pub message: String,
}

impl ActivationFailure {
    fn from_error(name: &str, e: &ContextError) -> Self {
        let kind = match e {
            ContextError::Activation(a) => a.kind(),
            ContextError::Circular { .. } => "circular",
            _ => "lookup",
        };
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            message: e.to_string(),
        }
    }
}

/// Summary of one boot.
#[derive(Debug, Clone, Serialize)]
pub struct BootReport {
    pub boot_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Factories installed from the catalog.
    pub registered: usize,
    /// Services started during boot, in start order. Includes lazy
    /// services pulled in by eager ones.
    pub activated: Vec<String>,
    pub failed: Vec<ActivationFailure>,
}

impl BootReport {
    pub fn is_healthy(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failure(&self, name: &str) -> Option<&ActivationFailure> {
        self.failed.iter().find(|f| f.name == name)
    }

    /// Print boot status.
    pub fn print_status(&self) {
        info!("===========================================");
        info!("  NANOS BOOT STATUS ({})", self.boot_id);
        info!("===========================================");
        for name in &self.activated {
            info!("  ✅ {:30} started", name);
        }
        for failure in &self.failed {
            info!("  ❌ {:30} {} failure", failure.name, failure.kind);
        }
        info!(
            "  {} registered, {} started, {} failed",
            self.registered,
            self.activated.len(),
            self.failed.len()
        );
        info!("===========================================");
    }
}

/// The boot orchestrator.
pub struct Boot {
    phase: BootPhase,
    config: Arc<BootConfig>,
    registry: Arc<ServiceRegistry>,
    catalog: Catalog,
    root: ContextBuilder,
    started: Arc<StartedServices>,
}

impl Boot {
    pub fn new(config: BootConfig, registry: ServiceRegistry) -> Self {
        Self {
            phase: BootPhase::Idle,
            config: Arc::new(config),
            registry: Arc::new(registry),
            catalog: Catalog::new(),
            root: ContextBuilder::new(),
            started: Arc::new(StartedServices::new()),
        }
    }

    pub fn phase(&self) -> BootPhase {
        self.phase
    }

    /// Seed an environment value into the root context.
    ///
    /// A catalog entry with the same name replaces it.
    pub fn bind_value(&mut self, name: impl Into<String>, instance: Instance) -> Result<(), BootError> {
        self.root.bind_value(name, instance)?;
        Ok(())
    }

    fn advance(&mut self, next: BootPhase) {
        debug!(from = %self.phase, to = %next, "[Boot] Phase change");
        self.phase = next;
    }

    /// Run every phase and return the ready container.
    pub fn run(mut self, source: &dyn DescriptorSource) -> Result<Nanos, BootError> {
        let started_at = Utc::now();
        info!("Starting Nanos Server");

        self.advance(BootPhase::CatalogBuilding);
        let loaded = self.catalog.load(source);
        debug!(
            loaded,
            distinct = self.catalog.len(),
            "[Boot] Catalog built"
        );
        let catalog = Arc::new(std::mem::take(&mut self.catalog));

        self.advance(BootPhase::FactoryInstallation);
        let config: Instance = self.config.clone();
        self.root.bind_value(CONFIG_NAME, config)?;
        let snapshot: Instance = catalog.clone();
        self.root.bind_value(CATALOG_NAME, snapshot)?;

        for descriptor in catalog.select_all() {
            info!("Registering: {}", descriptor.name());
            let factory = ServiceFactory::new(
                descriptor.clone(),
                Arc::clone(&self.registry),
                Arc::clone(&self.started),
            );
            self.root.bind(descriptor.name(), factory)?;
            SERVICES_REGISTERED.inc();
        }

        self.advance(BootPhase::ContextClosing);
        let context = std::mem::take(&mut self.root).close();

        self.advance(BootPhase::EagerActivation);
        let mut failed = Vec::new();
        for descriptor in catalog.select_eager() {
            let name = descriptor.name();
            if let Err(e) = context.get(name) {
                error!(service = name, error = %e, "Failed to start: {}", name);
                failed.push(ActivationFailure::from_error(name, &e));
            }
        }

        self.advance(BootPhase::Ready);
        let report = BootReport {
            boot_id: Uuid::new_v4(),
            started_at,
            registered: catalog.len(),
            activated: self.started.names(),
            failed,
        };
        report.print_status();

        Ok(Nanos {
            context,
            catalog,
            report,
            started: self.started,
        })
    }
}

impl fmt::Debug for Boot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Boot")
            .field("phase", &self.phase)
            .field("catalog", &self.catalog.names())
            .finish()
    }
}

/// A booted container in the `Ready` phase.
pub struct Nanos {
    context: Context,
    catalog: Arc<Catalog>,
    report: BootReport,
    started: Arc<StartedServices>,
}

impl Nanos {
    pub fn phase(&self) -> BootPhase {
        BootPhase::Ready
    }

    /// The closed root context.
    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn report(&self) -> &BootReport {
        &self.report
    }

    pub fn get(&self, name: &str) -> Result<Instance, ContextError> {
        self.context.get(name)
    }

    pub fn get_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, ContextError> {
        self.context.get_as(name)
    }

    /// Names of every service started so far, in start order.
    pub fn started(&self) -> Vec<String> {
        self.started.names()
    }

    /// Stop started services in reverse start order.
    pub fn shutdown(&self) -> usize {
        info!("Initiating graceful shutdown...");
        let stopped = self.started.stop_all();
        info!(stopped, "Shutdown complete");
        stopped
    }
}

impl fmt::Debug for Nanos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Nanos")
            .field("boot_id", &self.report.boot_id)
            .field("context", &self.context)
            .finish()
    }
}

/// Boot the built-in services with `config`.
pub fn boot(config: BootConfig) -> Result<Nanos, BootError> {
    Boot::new(config, ServiceRegistry::builtin()).run(&BuiltinServices)
}
