//! # Context Chain
//!
//! A context node holds a parent pointer, a local `name → binding` map and
//! a closed flag. Lookups walk from the queried node towards the root and
//! resolve the first binding found, memoizing the instance inside that
//! binding (at the node where it was installed).
//!
//! Two handles share a node:
//!
//! - [`ContextBuilder`]: exclusive, open. Adds bindings.
//! - [`Context`]: shared, closed after [`ContextBuilder::close`]. Resolves.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::binding::Binding;
use crate::error::{ActivationError, ContextError};
use crate::factory::{Factory, FnFactory, Instance};

struct Node {
    parent: Option<Arc<Node>>,
    bindings: RwLock<HashMap<String, Arc<Binding>>>,
    closed: AtomicBool,
}

impl Node {
    fn new(parent: Option<Arc<Node>>) -> Arc<Self> {
        Arc::new(Self {
            parent,
            bindings: RwLock::new(HashMap::new()),
            closed: AtomicBool::new(false),
        })
    }

    /// Closing is checked under the write lock so an insert can never race
    /// past `close`.
    fn insert(&self, name: String, binding: Binding) -> Result<(), ContextError> {
        let mut bindings = self.bindings.write();
        if self.closed.load(Ordering::Acquire) {
            return Err(ContextError::Closed { name });
        }
        if bindings.insert(name.clone(), Arc::new(binding)).is_some() {
            debug!(binding = %name, "[Context] Rebound existing key");
        }
        Ok(())
    }

    fn close(&self) {
        let _bindings = self.bindings.write();
        self.closed.store(true, Ordering::Release);
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn lookup(&self, name: &str) -> Option<Arc<Binding>> {
        let mut node = self;
        loop {
            if let Some(binding) = node.bindings.read().get(name) {
                return Some(Arc::clone(binding));
            }
            node = node.parent.as_deref()?;
        }
    }

    fn local_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.bindings.read().keys().cloned().collect();
        names.sort();
        names
    }
}

fn resolve(node: &Arc<Node>, name: &str) -> Result<Instance, ContextError> {
    let binding = node.lookup(name).ok_or_else(|| ContextError::NotFound {
        name: name.to_string(),
    })?;
    let view = Context {
        node: Arc::clone(node),
    };
    binding.resolve(name, &view)
}

fn downcast<T: Any + Send + Sync>(name: &str, instance: Instance) -> Result<Arc<T>, ContextError> {
    instance
        .downcast::<T>()
        .map_err(|_| ContextError::TypeMismatch {
            name: name.to_string(),
            expected: type_name::<T>(),
        })
}

/// Open context: the only handle that adds bindings.
///
/// Not `Clone`; whoever holds it owns the node's key set until
/// [`close`](Self::close) hands back a shared [`Context`].
pub struct ContextBuilder {
    node: Arc<Node>,
}

impl ContextBuilder {
    /// Create an open root node.
    pub fn new() -> Self {
        Self {
            node: Node::new(None),
        }
    }

    /// Install an unresolved binding. Replaces an existing key at this node.
    pub fn bind<F>(&mut self, name: impl Into<String>, factory: F) -> Result<(), ContextError>
    where
        F: Factory + 'static,
    {
        self.bind_shared(name, Arc::new(factory))
    }

    /// Install an unresolved binding backed by a shared factory.
    pub fn bind_shared(
        &mut self,
        name: impl Into<String>,
        factory: Arc<dyn Factory>,
    ) -> Result<(), ContextError> {
        self.node.insert(name.into(), Binding::unresolved(factory))
    }

    /// Install an unresolved binding backed by a closure.
    pub fn bind_fn<F>(&mut self, name: impl Into<String>, f: F) -> Result<(), ContextError>
    where
        F: Fn(&Context) -> Result<Instance, ActivationError> + Send + Sync + 'static,
    {
        self.bind(name, FnFactory(f))
    }

    /// Install an already resolved value.
    pub fn bind_value(
        &mut self,
        name: impl Into<String>,
        instance: Instance,
    ) -> Result<(), ContextError> {
        self.node.insert(name.into(), Binding::resolved(instance))
    }

    /// Resolve `name` from the chain while still open.
    pub fn get(&self, name: &str) -> Result<Instance, ContextError> {
        resolve(&self.node, name)
    }

    pub fn get_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, ContextError> {
        downcast(name, self.get(name)?)
    }

    /// Whether `name` is bound anywhere in the chain.
    pub fn contains(&self, name: &str) -> bool {
        self.node.lookup(name).is_some()
    }

    /// Create an open node whose parent is this node.
    pub fn child(&self) -> ContextBuilder {
        ContextBuilder {
            node: Node::new(Some(Arc::clone(&self.node))),
        }
    }

    /// Freeze this node's key set and return the resolver handle.
    pub fn close(self) -> Context {
        self.node.close();
        debug!(bindings = self.node.bindings.read().len(), "[Context] Closed");
        Context { node: self.node }
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ContextBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextBuilder")
            .field("bindings", &self.node.local_names())
            .finish()
    }
}

/// Resolver handle.
///
/// Cheap to clone. Binding through a closed context fails with
/// [`ContextError::Closed`]; resolving existing bindings keeps working.
#[derive(Clone)]
pub struct Context {
    node: Arc<Node>,
}

impl Context {
    /// Attempt to add a binding. Rejected once the node is closed.
    pub fn bind<F>(&self, name: impl Into<String>, factory: F) -> Result<(), ContextError>
    where
        F: Factory + 'static,
    {
        self.node
            .insert(name.into(), Binding::unresolved(Arc::new(factory)))
    }

    /// Attempt to add a resolved value. Rejected once the node is closed.
    pub fn bind_value(&self, name: impl Into<String>, instance: Instance) -> Result<(), ContextError> {
        self.node.insert(name.into(), Binding::resolved(instance))
    }

    /// Resolve `name`, constructing it on first lookup.
    pub fn get(&self, name: &str) -> Result<Instance, ContextError> {
        resolve(&self.node, name)
    }

    /// Resolve `name` and downcast it to `T`.
    pub fn get_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, ContextError> {
        downcast(name, self.get(name)?)
    }

    /// Whether `name` is bound anywhere in the chain.
    pub fn contains(&self, name: &str) -> bool {
        self.node.lookup(name).is_some()
    }

    /// Whether `name` is bound and already constructed. Never constructs.
    pub fn is_resolved(&self, name: &str) -> bool {
        self.node
            .lookup(name)
            .is_some_and(|binding| binding.is_resolved())
    }

    pub fn is_closed(&self) -> bool {
        self.node.is_closed()
    }

    /// Names bound at this node, sorted. Ancestors are not included.
    pub fn names(&self) -> Vec<String> {
        self.node.local_names()
    }

    pub fn parent(&self) -> Option<Context> {
        self.node.parent.as_ref().map(|node| Context {
            node: Arc::clone(node),
        })
    }

    /// Create an open node whose parent is this node.
    pub fn child(&self) -> ContextBuilder {
        ContextBuilder {
            node: Node::new(Some(Arc::clone(&self.node))),
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("closed", &self.is_closed())
            .field("bindings", &self.names())
            .finish()
    }
}
