//! # Context Chain Tests
//!
//! Singleton activation and context closing as seen through a booted
//! container.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    use nanos_boot::{Boot, BootConfig, NanoService, Nanos, ServiceError, ServiceRegistry};
    use nanos_catalog::{ServiceDescriptor, StaticSource};
    use nanos_context::{Context, ContextError};
    use parking_lot::Mutex;

    /// Slow to construct so concurrent lookups overlap.
    struct Slow;

    impl NanoService for Slow {
        fn start(&self) -> Result<(), ServiceError> {
            thread::sleep(std::time::Duration::from_millis(20));
            Ok(())
        }
    }

    /// Keeps the context it was started with.
    #[derive(Default)]
    struct Scoped {
        ctx: Mutex<Option<Context>>,
    }

    impl NanoService for Scoped {
        fn set_context(&self, ctx: Context) {
            *self.ctx.lock() = Some(ctx);
        }

        fn start(&self) -> Result<(), ServiceError> {
            Ok(())
        }
    }

    fn boot_lazy(constructed: &Arc<AtomicUsize>) -> Nanos {
        let mut registry = ServiceRegistry::new();
        let counter = Arc::clone(constructed);
        registry.register("test.Slow", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Slow)
        });
        registry.register("test.Scoped", |_| Ok(Scoped::default()));

        let source = StaticSource::default()
            .with(ServiceDescriptor::new("slow", "test.Slow"))
            .with(ServiceDescriptor::new("scoped", "test.Scoped"));
        Boot::new(BootConfig::default(), registry)
            .run(&source)
            .expect("boot")
    }

    #[test]
    fn test_concurrent_first_lookups_construct_once() {
        let constructed = Arc::new(AtomicUsize::new(0));
        let nanos = boot_lazy(&constructed);
        let threads = 16;
        let barrier = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let ctx = nanos.context().clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    ctx.get_as::<Slow>("slow").unwrap()
                })
            })
            .collect();

        let instances: Vec<Arc<Slow>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(constructed.load(Ordering::SeqCst), 1);
        assert!(instances.iter().all(|i| Arc::ptr_eq(i, &instances[0])));
        assert_eq!(nanos.started(), vec!["slow"]);
    }

    #[test]
    fn test_booted_root_rejects_new_and_existing_names() {
        let nanos = boot_lazy(&Arc::new(AtomicUsize::new(0)));
        let ctx = nanos.context();

        let fresh = ctx.bind_value("brand-new", Arc::new(1u8)).unwrap_err();
        let existing = ctx.bind_value("slow", Arc::new(1u8)).unwrap_err();

        assert!(matches!(fresh, ContextError::Closed { ref name } if name == "brand-new"));
        assert!(matches!(existing, ContextError::Closed { ref name } if name == "slow"));
        assert!(!ctx.contains("brand-new"));
    }

    #[test]
    fn test_child_lookup_memoizes_at_root() {
        let constructed = Arc::new(AtomicUsize::new(0));
        let nanos = boot_lazy(&constructed);

        let mut child = nanos.context().child();
        child.bind_value("tenant", Arc::new("acme".to_string())).unwrap();
        let child = child.close();

        let via_child = child.get_as::<Slow>("slow").unwrap();
        assert!(nanos.context().is_resolved("slow"));
        let via_root = nanos.get_as::<Slow>("slow").unwrap();

        assert!(Arc::ptr_eq(&via_child, &via_root));
        assert_eq!(constructed.load(Ordering::SeqCst), 1);
        assert!(!nanos.context().contains("tenant"));
    }

    #[test]
    fn test_service_is_wired_with_querying_context() {
        let nanos = boot_lazy(&Arc::new(AtomicUsize::new(0)));

        let mut child = nanos.context().child();
        child.bind_value("tenant", Arc::new("acme".to_string())).unwrap();
        let child = child.close();

        let scoped = child.get_as::<Scoped>("scoped").unwrap();
        let wired = scoped.ctx.lock().clone().unwrap();
        assert_eq!(*wired.get_as::<String>("tenant").unwrap(), "acme");
    }

    #[test]
    fn test_child_cannot_bind_after_close() {
        let nanos = boot_lazy(&Arc::new(AtomicUsize::new(0)));
        let child = nanos.context().child().close();

        let err = child.bind_value("late", Arc::new(0u8)).unwrap_err();
        assert!(matches!(err, ContextError::Closed { .. }));
        assert!(child.contains("slow"));
    }
}
