//! Reference site demo scenarios.
//!
//! Each scenario wires the real role manager, content gate, or private-site
//! gate to an `InMemorySite` and walks through one feature end to end.

pub mod content_permissions;
pub mod private_site;
pub mod role_lifecycle;
