//! Cross-crate integration tests.

pub mod boot_flows;
pub mod collaborators;
pub mod context_chain;
