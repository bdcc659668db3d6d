//! Descriptor sources.
//!
//! The boot pass reads its descriptor list through [`DescriptorSource`].
//! A compiled-in list is the only source shipped here; a persisted or
//! config-driven source plugs in behind the same trait.

use crate::descriptor::ServiceDescriptor;

/// Produces the descriptors registered during the catalog-building phase.
pub trait DescriptorSource: Send + Sync {
    /// Descriptors in registration order. Duplicated names are allowed and
    /// follow the catalog's upsert rule.
    fn descriptors(&self) -> Vec<ServiceDescriptor>;
}

/// A fixed list of descriptors.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    descriptors: Vec<ServiceDescriptor>,
}

impl StaticSource {
    pub fn new(descriptors: Vec<ServiceDescriptor>) -> Self {
        Self { descriptors }
    }

    /// Append a descriptor.
    pub fn with(mut self, descriptor: ServiceDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }
}

impl DescriptorSource for StaticSource {
    fn descriptors(&self) -> Vec<ServiceDescriptor> {
        self.descriptors.clone()
    }
}

impl FromIterator<ServiceDescriptor> for StaticSource {
    fn from_iter<I: IntoIterator<Item = ServiceDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
