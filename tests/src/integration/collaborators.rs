//! # Collaborator Tests
//!
//! The benchmark harness and the blob wrapper used against a booted
//! container.

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use nanos_bench::{Benchmark, BenchmarkRunner};
    use nanos_blob::{Blob, BlobError, InputStreamBlob, BUFFER_SIZE};
    use nanos_boot::services::{
        PingService, PmInfoStore, PmLogger, PING_CLASS, PM_INFO_CLASS, PM_LOGGER_CLASS,
    };
    use nanos_boot::{Boot, BootConfig, Nanos, ServiceRegistry};
    use nanos_catalog::{ServiceDescriptor, StaticSource};
    use nanos_context::Context;

    fn boot_ping() -> Nanos {
        let source = StaticSource::default()
            .with(ServiceDescriptor::new("ping", PING_CLASS))
            .with(ServiceDescriptor::new("pmLogger", PM_LOGGER_CLASS))
            .with(ServiceDescriptor::new("pmInfoDAO", PM_INFO_CLASS).with_serve(true));
        Boot::new(BootConfig::default(), ServiceRegistry::builtin())
            .run(&source)
            .expect("boot")
    }

    struct PingBench {
        setups: AtomicUsize,
    }

    impl Benchmark for PingBench {
        fn setup(&self, ctx: &Context) {
            self.setups.fetch_add(1, Ordering::SeqCst);
            // Warm the singleton so workers only measure lookups.
            let _ = ctx.get("ping");
        }

        fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
            let pm = ctx.get_as::<PmLogger>("pmLogger")?;
            let ping = ctx.get_as::<PingService>("ping")?;
            pm.measure("bench:ping", || ping.ping());
            Ok(())
        }
    }

    #[test]
    fn test_bench_runs_against_booted_services() {
        let nanos = boot_ping();
        let report = BenchmarkRunner::builder(nanos.context().clone())
            .thread_count(4)
            .invocation_count(50)
            .timeout(10_000)
            .benchmark(PingBench {
                setups: AtomicUsize::new(0),
            })
            .build()
            .unwrap()
            .execute();

        assert!(report.completed);
        let ping = nanos.get_as::<PingService>("ping").unwrap();
        assert_eq!(ping.count(), 200);

        let store = nanos.get_as::<PmInfoStore>("pmInfoDAO").unwrap();
        assert_eq!(store.get("bench:ping").map(|i| i.count), Some(200));
        assert_eq!(nanos.started(), vec!["ping", "pmLogger", "pmInfoDAO"]);
    }

    #[test]
    fn test_bench_ignores_lookup_failures() {
        struct Missing;
        impl Benchmark for Missing {
            fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
                ctx.get("nope")?;
                Ok(())
            }
        }

        let nanos = boot_ping();
        let report = BenchmarkRunner::builder(nanos.context().clone())
            .thread_count(2)
            .invocation_count(5)
            .benchmark(Missing)
            .build()
            .unwrap()
            .execute();

        assert!(report.completed);
        assert_eq!(report.invocation_count, 5);
    }

    #[test]
    fn test_blob_streams_across_buffer_boundaries() {
        let data: Vec<u8> = (0..(BUFFER_SIZE * 2 + 123)).map(|i| (i % 251) as u8).collect();
        let mut blob = InputStreamBlob::new(Cursor::new(data.clone()), data.len() as u64);

        let mut out = Vec::new();
        let first = blob.read(&mut out, 0, 5_000).unwrap();
        let second = blob.read(&mut out, first, blob.size()).unwrap();

        assert_eq!(first, 5_000);
        assert_eq!(first + second, data.len() as u64);
        assert_eq!(out, data);
    }

    #[test]
    fn test_blob_rejects_out_of_order_offsets() {
        let mut blob = InputStreamBlob::new(Cursor::new(vec![7u8; 64]), 64);
        let mut out = Vec::new();
        blob.read(&mut out, 0, 16).unwrap();

        let err = blob.read(&mut out, 0, 16).unwrap_err();
        assert!(matches!(
            err,
            BlobError::OffsetMismatch {
                offset: 0,
                position: 16
            }
        ));
    }

    #[test]
    fn test_booted_catalog_is_shared_as_value() {
        let nanos = boot_ping();
        let catalog = nanos
            .get_as::<nanos_catalog::Catalog>(nanos_boot::CATALOG_NAME)
            .unwrap();
        assert_eq!(catalog.names(), nanos.catalog().names());
        let served: Vec<&str> = catalog
            .select_where(|d| d.is_serve())
            .map(|d| d.name())
            .collect();
        assert_eq!(served, vec!["pmInfoDAO"]);
    }
}
