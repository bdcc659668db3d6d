//! # Boot Flow Tests
//!
//! End-to-end boots against custom registries:
//!
//! 1. **Eager completeness**: every non-lazy entry is started before `run` returns
//! 2. **Lazy deferral**: lazy entries start on first lookup only
//! 3. **Failure isolation**: one failing entry does not stop the others
//! 4. **Catalog ordering**: activation follows first-seen catalog position
//! 5. **Activation metrics**: outcome counters move with each activation

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use nanos_boot::{Boot, BootConfig, BootPhase, NanoService, ServiceError, ServiceRegistry};
    use nanos_catalog::{ServiceDescriptor, StaticSource};
    use nanos_context::Context;
    use nanos_telemetry::{init_test_tracing, SERVICE_ACTIVATIONS};
    use parking_lot::Mutex;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Plain;

    impl NanoService for Plain {
        fn start(&self) -> Result<(), ServiceError> {
            Ok(())
        }
    }

    /// Built by a constructor that fails on its first call.
    struct Flaky;

    impl NanoService for Flaky {
        fn start(&self) -> Result<(), ServiceError> {
            Ok(())
        }
    }

    /// Resolves `dep` from its context while starting.
    #[derive(Default)]
    struct Dependent {
        ctx: Mutex<Option<Context>>,
    }

    impl NanoService for Dependent {
        fn set_context(&self, ctx: Context) {
            *self.ctx.lock() = Some(ctx);
        }

        fn start(&self) -> Result<(), ServiceError> {
            let ctx = self
                .ctx
                .lock()
                .clone()
                .ok_or_else(|| ServiceError::MissingDependency("context".into()))?;
            ctx.get_as::<Plain>("dep")
                .map_err(|_| ServiceError::MissingDependency("dep".into()))?;
            Ok(())
        }
    }

    /// Registry whose constructors append the descriptor name to `log`.
    fn logging_registry(log: &Arc<Mutex<Vec<String>>>) -> ServiceRegistry {
        let mut registry = ServiceRegistry::new();
        let plain_log = Arc::clone(log);
        registry.register("test.Plain", move |d| {
            plain_log.lock().push(d.name().to_string());
            Ok(Plain)
        });
        registry.register::<Plain, _>("test.Broken", |d| {
            Err(ServiceError::failed(format!("{} refuses to start", d.name())))
        });
        registry.register("test.Dependent", |_| Ok(Dependent::default()));
        registry.register::<Plain, _>("test.Panics", |d| panic!("{} exploded", d.name()));
        registry
    }

    fn boot_with(source: &StaticSource, registry: ServiceRegistry) -> nanos_boot::Nanos {
        init_test_tracing();
        Boot::new(BootConfig::default(), registry)
            .run(source)
            .expect("boot")
    }

    // =============================================================================
    // EAGER / LAZY
    // =============================================================================

    #[test]
    fn test_every_eager_entry_is_resolved_after_boot() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let source = StaticSource::default()
            .with(ServiceDescriptor::new("one", "test.Plain").with_lazy(false))
            .with(ServiceDescriptor::new("two", "test.Plain"))
            .with(ServiceDescriptor::new("three", "test.Plain").with_lazy(false))
            .with(ServiceDescriptor::new("four", "test.Plain"));

        let nanos = boot_with(&source, logging_registry(&log));
        let ctx = nanos.context();

        assert!(ctx.is_resolved("one"));
        assert!(ctx.is_resolved("three"));
        assert!(!ctx.is_resolved("two"));
        assert!(!ctx.is_resolved("four"));
        assert_eq!(*log.lock(), vec!["one", "three"]);
    }

    #[test]
    fn test_lazy_entry_starts_on_first_lookup_only() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let source =
            StaticSource::default().with(ServiceDescriptor::new("later", "test.Plain"));

        let nanos = boot_with(&source, logging_registry(&log));
        assert!(log.lock().is_empty());

        let first = nanos.get_as::<Plain>("later").unwrap();
        let second = nanos.get_as::<Plain>("later").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*log.lock(), vec!["later"]);
    }

    #[test]
    fn test_eager_service_pulls_in_lazy_dependency() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let source = StaticSource::default()
            .with(ServiceDescriptor::new("front", "test.Dependent").with_lazy(false))
            .with(ServiceDescriptor::new("dep", "test.Plain"));

        let nanos = boot_with(&source, logging_registry(&log));

        assert!(nanos.report().is_healthy());
        assert!(nanos.context().is_resolved("dep"));
        // The dependency finishes starting before the service that needed it.
        assert_eq!(nanos.report().activated, vec!["dep", "front"]);
    }

    // =============================================================================
    // FAILURE ISOLATION
    // =============================================================================

    #[test]
    fn test_failing_entry_does_not_block_later_entries() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let source = StaticSource::default()
            .with(ServiceDescriptor::new("A", "test.Plain").with_lazy(false))
            .with(ServiceDescriptor::new("B", "test.Broken").with_lazy(false))
            .with(ServiceDescriptor::new("C", "test.Plain").with_lazy(false));

        let nanos = boot_with(&source, logging_registry(&log));
        let report = nanos.report();

        assert_eq!(*log.lock(), vec!["A", "C"]);
        assert_eq!(report.activated, vec!["A", "C"]);
        let failure = report.failure("B").unwrap();
        assert_eq!(failure.kind, "construction");
        assert!(failure.message.contains("B refuses to start"));
    }

    #[test]
    fn test_panicking_entry_does_not_abort_boot() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let source = StaticSource::default()
            .with(ServiceDescriptor::new("A", "test.Plain").with_lazy(false))
            .with(ServiceDescriptor::new("B", "test.Panics").with_lazy(false))
            .with(ServiceDescriptor::new("C", "test.Plain").with_lazy(false));

        let nanos = boot_with(&source, logging_registry(&log));
        let report = nanos.report();

        assert_eq!(nanos.phase(), BootPhase::Ready);
        assert_eq!(*log.lock(), vec!["A", "C"]);
        let failure = report.failure("B").unwrap();
        assert_eq!(failure.kind, "construction");
        assert!(failure.message.contains("B exploded"));

        // The binding is left unresolved, so a later lookup tries again.
        assert!(nanos.get("B").is_err());
        assert!(!nanos.context().is_resolved("B"));
    }

    #[test]
    fn test_missing_implementation_and_missing_dependency_are_isolated() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let source = StaticSource::default()
            .with(ServiceDescriptor::new("ghost", "test.NotRegistered").with_lazy(false))
            .with(ServiceDescriptor::new("orphan", "test.Dependent").with_lazy(false))
            .with(ServiceDescriptor::new("ok", "test.Plain").with_lazy(false));

        let nanos = boot_with(&source, logging_registry(&log));
        let report = nanos.report();

        assert_eq!(report.failure("ghost").unwrap().kind, "resolution");
        assert_eq!(report.failure("orphan").unwrap().kind, "construction");
        assert_eq!(report.activated, vec!["ok"]);
    }

    #[test]
    fn test_failed_eager_entry_is_retried_on_next_lookup() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let mut registry = ServiceRegistry::new();
        let counter = Arc::clone(&attempts);
        registry.register("test.Flaky", move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(ServiceError::failed("not yet"))
            } else {
                Ok(Flaky)
            }
        });
        let source = StaticSource::default()
            .with(ServiceDescriptor::new("flaky", "test.Flaky").with_lazy(false));

        let nanos = boot_with(&source, registry);
        assert!(nanos.report().failure("flaky").is_some());
        assert!(!nanos.context().is_resolved("flaky"));

        nanos.get_as::<Flaky>("flaky").unwrap();
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert!(nanos.context().is_resolved("flaky"));
    }

    // =============================================================================
    // CATALOG ORDERING
    // =============================================================================

    #[test]
    fn test_replaced_descriptor_activates_at_first_seen_position() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let source = StaticSource::default()
            .with(ServiceDescriptor::new("a", "test.Plain"))
            .with(ServiceDescriptor::new("b", "test.Plain").with_lazy(false))
            .with(ServiceDescriptor::new("a", "test.Plain").with_lazy(false));

        let nanos = boot_with(&source, logging_registry(&log));

        assert_eq!(nanos.catalog().names(), vec!["a", "b"]);
        assert_eq!(*log.lock(), vec!["a", "b"]);
        assert_eq!(nanos.report().registered, 2);
    }

    // =============================================================================
    // ACTIVATION METRICS
    // =============================================================================

    #[test]
    fn test_activation_outcomes_are_counted() {
        let outcome = |label: &str| SERVICE_ACTIVATIONS.with_label_values(&[label]).get();
        let started = outcome("started");
        let construction_failed = outcome("construction_failed");
        let resolution_failed = outcome("resolution_failed");

        let log = Arc::new(Mutex::new(Vec::new()));
        let source = StaticSource::default()
            .with(ServiceDescriptor::new("A", "test.Plain").with_lazy(false))
            .with(ServiceDescriptor::new("B", "test.Broken").with_lazy(false))
            .with(ServiceDescriptor::new("C", "test.NotRegistered").with_lazy(false));
        let _nanos = boot_with(&source, logging_registry(&log));

        // Other tests share the global counters, so only lower bounds hold.
        assert!(outcome("started") >= started + 1.0);
        assert!(outcome("construction_failed") >= construction_failed + 1.0);
        assert!(outcome("resolution_failed") >= resolution_failed + 1.0);
    }

    #[test]
    fn test_report_serializes() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let source = StaticSource::default()
            .with(ServiceDescriptor::new("A", "test.Plain").with_lazy(false))
            .with(ServiceDescriptor::new("B", "test.Broken").with_lazy(false));

        let nanos = boot_with(&source, logging_registry(&log));
        let json = serde_json::to_value(nanos.report()).unwrap();

        assert_eq!(json["registered"], 2);
        assert_eq!(json["activated"][0], "A");
        assert_eq!(json["failed"][0]["name"], "B");
        assert!(json["boot_id"].is_string());
    }
}
