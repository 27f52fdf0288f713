//! Named registries.
//!
//! A `Registry<T>` maps a unique string key to a value and remembers
//! insertion order. `Registries` bundles one registry per kind (roles,
//! capabilities, capability groups, role groups, add-ons) and is built fresh
//! for every request, then passed explicitly to whatever needs it.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use tracing::debug;

use user_roles_contracts::{
    addon::Addon,
    capability::{Capability, CapabilityGroup},
    role::{Role, RoleGroup},
};

use crate::catalog::PlatformFlags;

/// An insertion-ordered, uniqueness-enforcing map from name to value.
///
/// Registering an existing name overwrites its value in place: the entry
/// keeps its original position and the previous value is returned.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    kind: &'static str,
    entries: IndexMap<String, T>,
}

impl<T> Registry<T> {
    /// Create an empty registry. `kind` only appears in log output.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: IndexMap::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Insert or overwrite `name`. Returns the replaced value, if any.
    pub fn register(&mut self, name: impl Into<String>, value: T) -> Option<T> {
        let name = name.into();
        let previous = self.entries.insert(name.clone(), value);
        if previous.is_some() {
            debug!(kind = self.kind, name = %name, "registry entry overwritten");
        }
        previous
    }

    /// Remove `name` if present, keeping the order of the remaining entries.
    pub fn unregister(&mut self, name: &str) -> Option<T> {
        self.entries.shift_remove(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.entries.get_mut(name)
    }

    /// All entries in insertion order.
    pub fn collection(&self) -> &IndexMap<String, T> {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The request-scoped set of registries.
#[derive(Debug, Clone)]
pub struct Registries {
    pub roles: Registry<Role>,
    pub caps: Registry<Capability>,
    pub cap_groups: Registry<CapabilityGroup>,
    pub role_groups: Registry<RoleGroup>,
    pub addons: Registry<Addon>,
    /// Capabilities that must never be shown or submitted on this site.
    pub hidden_caps: BTreeSet<String>,
}

impl Registries {
    /// Empty registries with the hidden caps of a default single-site install.
    pub fn new() -> Self {
        Self::with_platform(&PlatformFlags::default())
    }

    pub fn with_platform(platform: &PlatformFlags) -> Self {
        Self {
            roles: Registry::new("role"),
            caps: Registry::new("cap"),
            cap_groups: Registry::new("cap_group"),
            role_groups: Registry::new("role_group"),
            addons: Registry::new("addon"),
            hidden_caps: platform.hidden_caps(),
        }
    }
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}
