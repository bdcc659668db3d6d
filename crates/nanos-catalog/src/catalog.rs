//! # Service Catalog
//!
//! Keyed store of [`ServiceDescriptor`]s.
//!
//! Population happens single-threaded during boot before any reader exists,
//! so the catalog carries no internal locking.

use indexmap::IndexMap;
use tracing::debug;

use crate::descriptor::ServiceDescriptor;
use crate::source::DescriptorSource;

/// Ordered mapping from service name to descriptor.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    descriptors: IndexMap<String, ServiceDescriptor>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a descriptor keyed by its name.
    ///
    /// A replacement keeps the position of the first registration.
    pub fn put(&mut self, descriptor: ServiceDescriptor) {
        let name = descriptor.name().to_string();
        match self.descriptors.insert(name.clone(), descriptor) {
            Some(previous) => debug!(
                service = %name,
                previous_class = previous.service_class(),
                "[Catalog] Replaced descriptor"
            ),
            None => debug!(service = %name, "[Catalog] Added descriptor"),
        }
    }

    /// Put every descriptor produced by `source`, in order.
    ///
    /// Returns the number of descriptors read from the source.
    pub fn load(&mut self, source: &dyn DescriptorSource) -> usize {
        let descriptors = source.descriptors();
        let count = descriptors.len();
        for descriptor in descriptors {
            self.put(descriptor);
        }
        count
    }

    /// All descriptors in insertion order.
    ///
    /// The iterator is `Clone`, so a caller can restart it without going back
    /// to the catalog.
    pub fn select_all(&self) -> impl Iterator<Item = &ServiceDescriptor> + Clone + '_ {
        self.descriptors.values()
    }

    /// Descriptors accepted by `predicate`, in insertion order.
    pub fn select_where<'a, P>(
        &'a self,
        predicate: P,
    ) -> impl Iterator<Item = &'a ServiceDescriptor> + Clone + 'a
    where
        P: Fn(&ServiceDescriptor) -> bool + Clone + 'a,
    {
        self.descriptors.values().filter(move |d| predicate(*d))
    }

    /// Descriptors that must be activated during boot.
    pub fn select_eager(&self) -> impl Iterator<Item = &ServiceDescriptor> + Clone + '_ {
        self.select_where(|d| !d.is_lazy())
    }

    pub fn get(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.descriptors.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    /// Service names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.descriptors.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
