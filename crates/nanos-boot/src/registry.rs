//! # Implementation Registry
//!
//! Maps the implementation identifier carried by a descriptor
//! (`service_class`) to a typed constructor. Descriptors only name an
//! implementation; the registry is where a name becomes code.
//!
//! ```text
//! ServiceDescriptor { name: "ping", service_class: "nanos.http.PingService" }
//!                                               │
//!                                               ▼
//!                      ServiceRegistry ── ctor(&descriptor) ──▶ Arc<PingService>
//!                                                                  │
//!                                                set_context ─▶ start
//! ```

use std::collections::HashMap;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use nanos_catalog::ServiceDescriptor;
use nanos_context::{Context, Instance};
use tracing::debug;

use crate::service::{NanoService, ServiceError};
use crate::services;

/// A constructed and started service, in both erased forms the container
/// keeps: the lookup value and the lifecycle handle.
pub(crate) struct Started {
    pub instance: Instance,
    pub service: Arc<dyn NanoService>,
}

type Constructor =
    Box<dyn Fn(&ServiceDescriptor, &Context) -> Result<Started, ServiceError> + Send + Sync>;

/// Registry of service implementations keyed by class identifier.
#[derive(Default)]
pub struct ServiceRegistry {
    constructors: HashMap<String, Constructor>,
}

impl ServiceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in services.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        services::register_builtin(&mut registry);
        registry
    }

    /// Register a constructor for `class`. Replaces an earlier registration.
    pub fn register<S, F>(&mut self, class: impl Into<String>, ctor: F) -> &mut Self
    where
        S: NanoService,
        F: Fn(&ServiceDescriptor) -> Result<S, ServiceError> + Send + Sync + 'static,
    {
        let class = class.into();
        let erased = move |descriptor: &ServiceDescriptor, ctx: &Context| {
            let service = Arc::new(ctor(descriptor)?);
            service.set_context(ctx.clone());
            service.start()?;

            let instance: Instance = service.clone();
            Ok(Started { instance, service })
        };

        if self.constructors.insert(class.clone(), Box::new(erased)).is_some() {
            debug!(service_class = %class, "[Registry] Replaced implementation");
        }
        self
    }

    pub fn contains(&self, class: &str) -> bool {
        self.constructors.contains_key(class)
    }

    /// Registered class identifiers, sorted.
    pub fn classes(&self) -> Vec<&str> {
        let mut classes: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        classes.sort_unstable();
        classes
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Construct, wire and start the implementation named by `descriptor`.
    ///
    /// Returns `None` when the class is not registered. A panic in the
    /// constructor or in `start` comes back as [`ServiceError::Panicked`].
    pub(crate) fn activate(
        &self,
        descriptor: &ServiceDescriptor,
        ctx: &Context,
    ) -> Option<Result<Started, ServiceError>> {
        let ctor = self.constructors.get(descriptor.service_class())?;
        let result = panic::catch_unwind(AssertUnwindSafe(|| ctor(descriptor, ctx)))
            .unwrap_or_else(|payload| Err(ServiceError::Panicked(panic_message(&*payload))));
        Some(result)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("classes", &self.classes())
            .finish()
    }
}
