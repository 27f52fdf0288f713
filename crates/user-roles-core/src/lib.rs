//! # user-roles-core
//!
//! Role and capability management on top of a platform-owned role store.
//!
//! This crate provides:
//! - The collaborator traits (`RoleStore`, `SettingsStore`, `PostMetaStore`, `EventSink`)
//! - `Registry<T>` and the request-scoped `Registries`, built by `RegistryLoader`
//! - The capability catalog, default capability/role groups, and cap-tab assembly
//! - The capability reconciler and the `RoleManager` that persists its output
//! - Role list views
//!
//! ## Usage
//!
//! ```rust,ignore
//! use user_roles_core::{RegistryLoader, RoleManager, reconcile::CapabilitySelection};
//!
//! let mut registries = manager.load_registries(&RegistryLoader::new())?;
//! let update = manager.edit_role(&mut registries, "editor", &selection)?;
//! ```

pub mod catalog;
pub mod groups;
pub mod loader;
pub mod manager;
pub mod reconcile;
pub mod registry;
pub mod traits;
pub mod views;

pub use loader::RegistryLoader;
pub use manager::{DeleteOutcome, NewRoleRequest, RoleDraft, RoleManager, RoleUpdate};
pub use reconcile::{reconcile, CapChange, CapabilitySelection, Reconciliation};
pub use registry::{Registries, Registry};
