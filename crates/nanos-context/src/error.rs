//! Error types for context lookups and service activation.

use thiserror::Error;

/// Failure while turning a binding's factory into an instance.
///
/// Both kinds are retryable: the binding stays unresolved and the next
/// lookup runs the factory again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivationError {
    /// The implementation reference named by a descriptor is unknown.
    #[error("cannot resolve implementation `{class}` for service `{service}`")]
    Resolution { service: String, class: String },

    /// The implementation was found but constructing or starting it failed.
    #[error("failed to construct service `{service}`: {reason}")]
    Construction { service: String, reason: String },
}

impl ActivationError {
    pub fn resolution(service: impl Into<String>, class: impl Into<String>) -> Self {
        Self::Resolution {
            service: service.into(),
            class: class.into(),
        }
    }

    pub fn construction(service: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Construction {
            service: service.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolution { .. })
    }

    pub fn is_construction(&self) -> bool {
        matches!(self, Self::Construction { .. })
    }

    /// Name of the service whose activation failed.
    pub fn service(&self) -> &str {
        match self {
            Self::Resolution { service, .. } | Self::Construction { service, .. } => service,
        }
    }

    /// Short label for logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Resolution { .. } => "resolution",
            Self::Construction { .. } => "construction",
        }
    }
}

/// Errors returned by [`Context`](crate::Context) and
/// [`ContextBuilder`](crate::ContextBuilder) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// A binding was attempted on a closed context.
    #[error("context is closed: cannot bind `{name}`")]
    Closed { name: String },

    /// No node in the chain binds `name`.
    #[error("no binding for `{name}`")]
    NotFound { name: String },

    /// A factory looked itself up while it was being resolved.
    #[error("circular resolution of `{name}`")]
    Circular { name: String },

    /// The bound instance is not of the requested type.
    #[error("binding `{name}` is not a `{expected}`")]
    TypeMismatch {
        name: String,
        expected: &'static str,
    },

    #[error(transparent)]
    Activation(#[from] ActivationError),
}

impl ContextError {
    /// The activation failure, if this lookup failed inside a factory.
    pub fn as_activation(&self) -> Option<&ActivationError> {
        match self {
            Self::Activation(e) => Some(e),
            _ => None,
        }
    }
}
