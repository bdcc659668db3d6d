//! Factories installed into context bindings.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::error::ActivationError;

/// A resolved binding value. Typed access goes through
/// [`Context::get_as`](crate::Context::get_as).
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Produces the instance for an unresolved binding.
///
/// `ctx` is the context the lookup was issued against, which may be a
/// descendant of the node holding the binding. A lookup through an open
/// [`ContextBuilder`](crate::ContextBuilder) passes a view of that still-open
/// node, so `ctx.bind` succeeds there and fails with
/// [`ContextError::Closed`](crate::ContextError::Closed) after close.
pub trait Factory: Send + Sync {
    fn create(&self, ctx: &Context) -> Result<Instance, ActivationError>;
}

/// Adapts a closure into a [`Factory`].
pub struct FnFactory<F>(pub F);

impl<F> Factory for FnFactory<F>
where
    F: Fn(&Context) -> Result<Instance, ActivationError> + Send + Sync,
{
    fn create(&self, ctx: &Context) -> Result<Instance, ActivationError> {
        (self.0)(ctx)
    }
}

impl<F> fmt::Debug for FnFactory<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnFactory")
    }
}
