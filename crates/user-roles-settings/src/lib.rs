//! # user-roles-settings
//!
//! Configuration for the user-roles role manager.
//!
//! This crate provides:
//! - [`TomlSettingsStore`], a TOML-backed implementation of
//!   [`SettingsStore`](user_roles_core::traits::SettingsStore)
//! - [`validate_settings`], applied on every save
//! - The built-in add-on catalog, embedded as TOML
//! - [`PrivateSite`], the private site / feed / REST gates driven by the settings
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use user_roles_settings::{PrivateSite, TomlSettingsStore};
//!
//! let store = TomlSettingsStore::from_file(Path::new("config/user-roles.toml"))?;
//! let gate = PrivateSite::new(store.load()?);
//! ```

pub mod addons;
pub mod private_site;
pub mod store;
pub mod validate;

pub use addons::{builtin_addons, parse_addons};
pub use private_site::{AccessDecision, PageKind, PrivateSite, RequestContext, RestAuth, RestError};
pub use store::TomlSettingsStore;
pub use validate::validate_settings;
