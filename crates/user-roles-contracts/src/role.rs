//! Role, role-group, and user-account types.

use serde::{Deserialize, Serialize};

use crate::capability::CapMap;

/// A named bundle of capability grants and denials.
///
/// `name` is the immutable key. `label` and `capabilities` change through the
/// edit flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub capabilities: CapMap,
}

impl Role {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            capabilities: CapMap::new(),
        }
    }

    /// Replace the capability map with `(cap, granted)` pairs.
    pub fn with_caps<I, S>(mut self, caps: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        self.capabilities = caps.into_iter().map(|(c, g)| (c.into(), g)).collect();
        self
    }

    /// True when `cap` is present with value `true`.
    pub fn is_granted(&self, cap: &str) -> bool {
        self.capabilities.get(cap).copied() == Some(true)
    }

    /// True when `cap` is present with value `false`.
    pub fn is_denied(&self, cap: &str) -> bool {
        self.capabilities.get(cap).copied() == Some(false)
    }

    pub fn granted_caps(&self) -> impl Iterator<Item = &str> {
        self.capabilities
            .iter()
            .filter(|(_, granted)| **granted)
            .map(|(cap, _)| cap.as_str())
    }

    pub fn denied_caps(&self) -> impl Iterator<Item = &str> {
        self.capabilities
            .iter()
            .filter(|(_, granted)| !**granted)
            .map(|(cap, _)| cap.as_str())
    }

    pub fn granted_count(&self) -> usize {
        self.granted_caps().count()
    }

    pub fn denied_count(&self) -> usize {
        self.denied_caps().count()
    }

    /// A role "has caps" when it grants at least one capability.
    pub fn has_caps(&self) -> bool {
        self.granted_count() > 0
    }
}

/// A cosmetic grouping of role names, used to filter role listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGroup {
    pub name: String,
    pub label: String,
    pub roles: Vec<String>,
}

impl RoleGroup {
    pub fn new(name: impl Into<String>, label: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            roles,
        }
    }
}

/// A site user as seen by role deletion and content checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: u64,
    pub login: String,
    pub roles: Vec<String>,
}

impl UserAccount {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}
