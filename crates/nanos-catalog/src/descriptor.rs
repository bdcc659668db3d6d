//! Service descriptor model.

use serde::{Deserialize, Serialize};

fn default_lazy() -> bool {
    true
}

/// Describes one installable service.
///
/// The name is fixed at construction; every other field can be adjusted
/// with the builder-style `with_*` methods before the descriptor is put
/// into a [`Catalog`](crate::Catalog).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    name: String,
    /// Identifier resolved against the implementation registry at activation.
    service_class: String,
    /// `true`: activate on first lookup. `false`: activate during boot.
    #[serde(default = "default_lazy")]
    lazy: bool,
    /// Marks the service as externally exposed. Passed through untouched.
    #[serde(default)]
    serve: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    description: String,
}

impl ServiceDescriptor {
    /// Create a lazy, unexposed descriptor.
    pub fn new(name: impl Into<String>, service_class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            service_class: service_class.into(),
            lazy: true,
            serve: false,
            description: String::new(),
        }
    }

    pub fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    pub fn with_serve(mut self, serve: bool) -> Self {
        self.serve = serve;
        self
    }

    pub fn with_service_class(mut self, service_class: impl Into<String>) -> Self {
        self.service_class = service_class.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn service_class(&self) -> &str {
        &self.service_class
    }

    pub fn is_lazy(&self) -> bool {
        self.lazy
    }

    pub fn is_serve(&self) -> bool {
        self.serve
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
