//! # Built-in HTTP Server
//!
//! An `axum` router on a tokio runtime owned by the service. Endpoints
//! resolve their backing services lazily from the server's context:
//!
//! | Route | Backing service |
//! |-------|-----------------|
//! | `GET /ping` | `ping` |
//! | `GET /uptime` | `uptime` |
//! | `GET /metrics` | Prometheus registry |
//!
//! Request timings go to `pmLogger` under `http:<path>` when it can be
//! resolved.

use std::net::SocketAddr;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use nanos_context::{Context, ContextError};
use nanos_telemetry::{gather_metrics, log_event};
use parking_lot::Mutex;
use tokio::runtime::{self, Runtime};
use tokio::sync::oneshot;
use tracing::{error, info};

use super::ping::PingService;
use super::pm::PmLogger;
use super::uptime::UptimeService;
use super::{PING_NAME, PM_LOGGER_NAME, UPTIME_NAME};
use crate::config::BootConfig;
use crate::service::{NanoService, ServiceError};

const WORKER_THREADS: usize = 2;
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// The `http` service.
#[derive(Debug, Default)]
pub struct NanoHttpServer {
    ctx: OnceLock<Context>,
    local_addr: OnceLock<SocketAddr>,
    runtime: Mutex<Option<Runtime>>,
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl NanoHttpServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound address, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr.get().copied()
    }

    pub fn is_running(&self) -> bool {
        self.shutdown_tx.lock().is_some()
    }
}

impl NanoService for NanoHttpServer {
    fn set_context(&self, ctx: Context) {
        let _ = self.ctx.set(ctx);
    }

    fn start(&self) -> Result<(), ServiceError> {
        let ctx = self
            .ctx
            .get()
            .cloned()
            .ok_or_else(|| ServiceError::MissingDependency("context".to_string()))?;
        let config = ctx
            .get_as::<BootConfig>("config")
            .map_err(|_| ServiceError::MissingDependency("config".to_string()))?;

        // Bind synchronously so a taken port fails start() instead of a task.
        let addr = config.http_addr();
        let std_listener =
            std::net::TcpListener::bind(&addr).map_err(|source| ServiceError::Bind {
                addr: addr.clone(),
                source,
            })?;
        std_listener.set_nonblocking(true)?;
        let local = std_listener.local_addr()?;

        let runtime = runtime::Builder::new_multi_thread()
            .worker_threads(WORKER_THREADS)
            .thread_name("nanos-http")
            .enable_all()
            .build()?;
        let listener = {
            let _guard = runtime.enter();
            tokio::net::TcpListener::from_std(std_listener)?
        };

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let router = build_router(ctx);
        runtime.spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!(error = %e, "[http] Server error");
            }
            info!("[http] Server stopped");
        });

        let _ = self.local_addr.set(local);
        *self.shutdown_tx.lock() = Some(shutdown_tx);
        *self.runtime.lock() = Some(runtime);

        log_event!(info, "http", "HTTP server listening", addr = %local);
        Ok(())
    }

    /// Signal graceful shutdown, then tear the runtime down. Must not be
    /// called from inside an async context.
    fn stop(&self) {
        if let Some(tx) = self.shutdown_tx.lock().take() {
            let _ = tx.send(());
        }
        if let Some(runtime) = self.runtime.lock().take() {
            runtime.shutdown_timeout(SHUTDOWN_GRACE);
        }
    }
}

fn build_router(ctx: Context) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/uptime", get(uptime))
        .route("/metrics", get(metrics))
        .layer(middleware::from_fn_with_state(ctx.clone(), record_timing))
        .with_state(ctx)
}

async fn ping(State(ctx): State<Context>) -> Response {
    match ctx.get_as::<PingService>(PING_NAME) {
        Ok(ping) => ping.ping().into_response(),
        Err(e) => unavailable(&e),
    }
}

async fn uptime(State(ctx): State<Context>) -> Response {
    match ctx.get_as::<UptimeService>(UPTIME_NAME) {
        Ok(uptime) => uptime.report().into_response(),
        Err(e) => unavailable(&e),
    }
}

async fn metrics() -> Response {
    match gather_metrics() {
        Ok(text) => text.into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

fn unavailable(e: &ContextError) -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response()
}

async fn record_timing(State(ctx): State<Context>, request: Request, next: Next) -> Response {
    let key = format!("http:{}", request.uri().path());
    let start = Instant::now();
    let response = next.run(request).await;
    if let Ok(pm) = ctx.get_as::<PmLogger>(PM_LOGGER_NAME) {
        let _ = pm.log(&key, start.elapsed());
    }
    response
}
