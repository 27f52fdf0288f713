//! Capability and capability-group types.
//!
//! A capability is a named permission string. A role maps capability names
//! to `true` (granted) or `false` (explicitly denied); a missing key means
//! neither.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A role's capability map: capability name → granted (`true`) / denied (`false`).
pub type CapMap = BTreeMap<String, bool>;

/// A registered capability.
///
/// `group` names the capability group the capability belongs to. It may be
/// empty for capabilities discovered on roles but never declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub group: String,
}

impl Capability {
    /// A capability labelled with its own name and no group.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            group: String::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }
}

/// A display grouping of capabilities for tabbed editors.
///
/// Groups are processed in ascending `priority`. When `diff_added` is set the
/// group only shows capabilities that no earlier group already claimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityGroup {
    pub name: String,
    pub label: String,
    pub icon: String,
    pub priority: i32,
    /// Declared capabilities, in display order.
    pub caps: Vec<String>,
    pub diff_added: bool,
}

impl CapabilityGroup {
    pub const DEFAULT_ICON: &'static str = "dashicons-admin-generic";
    pub const DEFAULT_PRIORITY: i32 = 10;

    /// A group with the default icon and priority and no declared caps.
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            icon: Self::DEFAULT_ICON.to_string(),
            priority: Self::DEFAULT_PRIORITY,
            caps: Vec::new(),
            diff_added: false,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_caps<I, S>(mut self, caps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.caps = caps.into_iter().map(Into::into).collect();
        self
    }

    pub fn diff_added(mut self, diff_added: bool) -> Self {
        self.diff_added = diff_added;
        self
    }
}
