//! Per-name binding slot.
//!
//! A binding moves `Unresolved → Resolving → Resolved`. Only the thread that
//! wins the `Unresolved → Resolving` transition runs the factory; the others
//! park on the condvar until the slot settles.

use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::{Condvar, Mutex};
use tracing::trace;

use crate::context::Context;
use crate::error::ContextError;
use crate::factory::{Factory, Instance};

enum Slot {
    Unresolved(Arc<dyn Factory>),
    /// Factory is running on the recorded thread.
    Resolving(ThreadId),
    Resolved(Instance),
}

pub(crate) struct Binding {
    slot: Mutex<Slot>,
    settled: Condvar,
}

impl Binding {
    pub(crate) fn unresolved(factory: Arc<dyn Factory>) -> Self {
        Self {
            slot: Mutex::new(Slot::Unresolved(factory)),
            settled: Condvar::new(),
        }
    }

    pub(crate) fn resolved(instance: Instance) -> Self {
        Self {
            slot: Mutex::new(Slot::Resolved(instance)),
            settled: Condvar::new(),
        }
    }

    pub(crate) fn is_resolved(&self) -> bool {
        matches!(*self.slot.lock(), Slot::Resolved(_))
    }

    /// Return the instance, running the factory if nobody has yet.
    pub(crate) fn resolve(&self, name: &str, ctx: &Context) -> Result<Instance, ContextError> {
        let me = thread::current().id();
        let mut slot = self.slot.lock();

        let factory = loop {
            let claimed = match &*slot {
                Slot::Resolved(instance) => return Ok(Arc::clone(instance)),
                Slot::Resolving(owner) if *owner == me => {
                    return Err(ContextError::Circular {
                        name: name.to_string(),
                    })
                }
                Slot::Resolving(_) => None,
                Slot::Unresolved(factory) => Some(Arc::clone(factory)),
            };

            match claimed {
                Some(factory) => {
                    *slot = Slot::Resolving(me);
                    break factory;
                }
                None => self.settled.wait(&mut slot),
            }
        };
        drop(slot);

        trace!(binding = name, "resolving");
        let mut guard = ResolveGuard {
            binding: self,
            factory: Some(Arc::clone(&factory)),
        };
        let outcome = factory.create(ctx);

        match outcome {
            Ok(instance) => {
                guard.factory = None;
                let mut slot = self.slot.lock();
                *slot = Slot::Resolved(Arc::clone(&instance));
                self.settled.notify_all();
                Ok(instance)
            }
            // Failure is not cached: the guard restores the factory.
            Err(e) => {
                drop(guard);
                Err(e.into())
            }
        }
    }
}

/// Puts the factory back if resolution does not complete, including when
/// the factory panics, so waiters are never left parked on `Resolving`.
struct ResolveGuard<'a> {
    binding: &'a Binding,
    factory: Option<Arc<dyn Factory>>,
}

impl Drop for ResolveGuard<'_> {
    fn drop(&mut self) {
        if let Some(factory) = self.factory.take() {
            let mut slot = self.binding.slot.lock();
            *slot = Slot::Unresolved(factory);
            self.binding.settled.notify_all();
        }
    }
}
