//! The trait every container-managed service implements.

use std::io;

use nanos_context::Context;
use thiserror::Error;

/// A service started by the container on first lookup.
///
/// The container calls [`set_context`](Self::set_context) once with the
/// context the lookup was issued against, then [`start`](Self::start).
/// Services use interior mutability for anything they keep.
pub trait NanoService: Send + Sync + 'static {
    fn set_context(&self, _ctx: Context) {}

    fn start(&self) -> Result<(), ServiceError>;

    /// Called at container shutdown, in reverse start order.
    fn stop(&self) {}
}

/// Errors raised while constructing or starting a service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("missing dependency `{0}`")]
    MissingDependency(String),

    #[error("panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Failed(String),
}

impl ServiceError {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}
