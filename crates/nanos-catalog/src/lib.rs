//! # Nanos Catalog
//!
//! The set of services a container knows how to install.
//!
//! - `ServiceDescriptor`: immutable record naming one installable service
//! - `Catalog`: ordered, upsert-by-name store of descriptors
//! - `DescriptorSource`: where the boot pass gets its descriptor list from
//!
//! ## Ordering
//!
//! Iteration order is first-registration order. Replacing a descriptor
//! keeps its original slot, so eager activation order never depends on
//! how many times a name was re-registered.
//!
//! ```rust
//! use nanos_catalog::{Catalog, ServiceDescriptor};
//!
//! let mut catalog = Catalog::new();
//! catalog.put(ServiceDescriptor::new("a", "svc.First"));
//! catalog.put(ServiceDescriptor::new("b", "svc.Second"));
//! catalog.put(ServiceDescriptor::new("a", "svc.Replacement"));
//!
//! let names: Vec<_> = catalog.select_all().map(|d| d.name()).collect();
//! assert_eq!(names, ["a", "b"]);
//! assert_eq!(catalog.get("a").unwrap().service_class(), "svc.Replacement");
//! ```

pub mod catalog;
pub mod descriptor;
pub mod source;

pub use catalog::Catalog;
pub use descriptor::ServiceDescriptor;
pub use source::{DescriptorSource, StaticSource};
