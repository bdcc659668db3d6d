//! Activation: the factory installed for every catalog entry.

use std::sync::Arc;

use nanos_catalog::ServiceDescriptor;
use nanos_context::{ActivationError, Context, Factory, Instance};
use nanos_telemetry::{
    log_activation, metric_inc, service_span, time_histogram, ACTIVATION_DURATION,
    SERVICE_ACTIVATIONS,
};
use parking_lot::Mutex;
use tracing::info;

use crate::registry::ServiceRegistry;
use crate::service::NanoService;

/// Services that have been started, in start order.
#[derive(Default)]
pub struct StartedServices {
    started: Mutex<Vec<(String, Arc<dyn NanoService>)>>,
}

impl StartedServices {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&self, name: &str, service: Arc<dyn NanoService>) {
        self.started.lock().push((name.to_string(), service));
    }

    /// Names in start order.
    pub fn names(&self) -> Vec<String> {
        self.started.lock().iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.started.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.started.lock().is_empty()
    }

    /// Stop every started service, most recently started first.
    ///
    /// Returns the number of services stopped. A second call is a no-op.
    pub fn stop_all(&self) -> usize {
        // Take the list first so a service's stop() may look others up.
        let started = std::mem::take(&mut *self.started.lock());
        let count = started.len();
        for (name, service) in started.into_iter().rev() {
            info!("Stopping: {}", name);
            service.stop();
        }
        count
    }
}

/// [`Factory`] for one descriptor: looks up the implementation, then
/// constructs, wires and starts it.
pub struct ServiceFactory {
    descriptor: ServiceDescriptor,
    registry: Arc<ServiceRegistry>,
    started: Arc<StartedServices>,
}

impl ServiceFactory {
    pub fn new(
        descriptor: ServiceDescriptor,
        registry: Arc<ServiceRegistry>,
        started: Arc<StartedServices>,
    ) -> Self {
        Self {
            descriptor,
            registry,
            started,
        }
    }

    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }
}

impl Factory for ServiceFactory {
    fn create(&self, ctx: &Context) -> Result<Instance, ActivationError> {
        let name = self.descriptor.name();
        let class = self.descriptor.service_class();

        let _span = service_span!("activate", service = name, service_class = class).entered();
        info!(service = name, service_class = class, "Starting: {}", name);
        let _timer = time_histogram!(ACTIVATION_DURATION);

        match self.registry.activate(&self.descriptor, ctx) {
            None => {
                metric_inc!(SERVICE_ACTIVATIONS, &["resolution_failed"]);
                log_activation!(warn, name, class, "Implementation not registered");
                Err(ActivationError::resolution(name, class))
            }
            Some(Err(e)) => {
                metric_inc!(SERVICE_ACTIVATIONS, &["construction_failed"]);
                log_activation!(warn, name, class, "Construction failed", error = %e);
                Err(ActivationError::construction(name, e))
            }
            Some(Ok(started)) => {
                metric_inc!(SERVICE_ACTIVATIONS, &["started"]);
                self.started.record(name, started.service);
                Ok(started.instance)
            }
        }
    }
}
