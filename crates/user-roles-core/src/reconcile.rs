//! Role capability reconciliation.
//!
//! Given a role's current capability map and a submitted grant/deny form,
//! compute the operations that converge the role to the submitted state.
//! Everything here is pure: callers decide how to apply the changes.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use user_roles_contracts::{
    capability::CapMap,
    names::{sanitize_cap, DO_NOT_ALLOW},
};

use crate::catalog::remove_hidden_caps;

/// A submitted capability form.
///
/// `grant` and `deny` hold known capabilities ticked in the editor;
/// `grant_custom` and `deny_custom` hold free-text names typed by the admin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilitySelection {
    pub grant: Vec<String>,
    pub deny: Vec<String>,
    pub grant_custom: Vec<String>,
    pub deny_custom: Vec<String>,
}

impl CapabilitySelection {
    pub fn is_empty(&self) -> bool {
        self.grant.is_empty()
            && self.deny.is_empty()
            && self.grant_custom.is_empty()
            && self.deny_custom.is_empty()
    }

    /// The same selection with hidden caps dropped and duplicates removed.
    ///
    /// Custom names are matched against `hidden` after sanitizing, so
    /// "Manage Network" is dropped along with `manage_network`.
    pub fn without_hidden(&self, hidden: &BTreeSet<String>) -> Self {
        let visible_custom = |names: &[String]| -> Vec<String> {
            remove_hidden_caps(names, hidden)
                .into_iter()
                .filter(|raw| !hidden.contains(&sanitize_cap(raw)))
                .collect()
        };
        Self {
            grant: remove_hidden_caps(&self.grant, hidden),
            deny: remove_hidden_caps(&self.deny, hidden),
            grant_custom: visible_custom(&self.grant_custom),
            deny_custom: visible_custom(&self.deny_custom),
        }
    }
}

/// A single operation on a role's capability map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "cap", rename_all = "snake_case")]
pub enum CapChange {
    Grant(String),
    Deny(String),
    Remove(String),
}

impl CapChange {
    pub fn cap(&self) -> &str {
        match self {
            Self::Grant(cap) | Self::Deny(cap) | Self::Remove(cap) => cap,
        }
    }

    pub fn apply(&self, caps: &mut CapMap) {
        match self {
            Self::Grant(cap) => {
                caps.insert(cap.clone(), true);
            }
            Self::Deny(cap) => {
                caps.insert(cap.clone(), false);
            }
            Self::Remove(cap) => {
                caps.remove(cap);
            }
        }
    }
}

/// Result of reconciling a role against a submitted form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// Operations in evaluation order: known caps first, then custom grants,
    /// then custom denials.
    pub changes: Vec<CapChange>,
    /// The capability map after every change is applied.
    pub capabilities: CapMap,
    /// Sanitized custom names that were not known before this submission.
    pub new_caps: Vec<String>,
}

impl Reconciliation {
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Reconcile `current` against `selection`.
///
/// For each known cap the first matching rule wins:
///
/// 1. selected for grant, not granted → grant
/// 2. selected for deny, not denied   → deny
/// 3. not selected for grant, granted → remove
/// 4. not selected for deny, denied   → remove
///
/// A cap selected for both grant and deny is granted only when it is not
/// already granted; an already granted cap falls through to rule 2 and is
/// denied. Custom names are sanitized; `do_not_allow`, empty names, and names already in
/// `known` are ignored, and a custom denial loses to a custom grant of the
/// same sanitized name.
pub fn reconcile(current: &CapMap, known: &[String], selection: &CapabilitySelection) -> Reconciliation {
    let grant: HashSet<&str> = selection.grant.iter().map(String::as_str).collect();
    let deny: HashSet<&str> = selection.deny.iter().map(String::as_str).collect();
    let known_set: HashSet<&str> = known.iter().map(String::as_str).collect();

    let mut capabilities = current.clone();
    let mut changes = Vec::new();
    let mut visited = HashSet::new();

    for cap in known {
        if !visited.insert(cap.as_str()) {
            continue;
        }

        let want_grant = grant.contains(cap.as_str());
        let want_deny = deny.contains(cap.as_str());
        let has_grant = current.get(cap).copied() == Some(true);
        let has_deny = current.get(cap).copied() == Some(false);

        let change = if want_grant && !has_grant {
            Some(CapChange::Grant(cap.clone()))
        } else if want_deny && !has_deny {
            Some(CapChange::Deny(cap.clone()))
        } else if !want_grant && has_grant {
            Some(CapChange::Remove(cap.clone()))
        } else if !want_deny && has_deny {
            Some(CapChange::Remove(cap.clone()))
        } else {
            None
        };

        if let Some(change) = change {
            change.apply(&mut capabilities);
            changes.push(change);
        }
    }

    let is_new = |cap: &str| !cap.is_empty() && cap != DO_NOT_ALLOW && !known_set.contains(cap);

    let granted_custom: Vec<String> = selection
        .grant_custom
        .iter()
        .map(|raw| sanitize_cap(raw))
        .collect();

    let mut new_caps: Vec<String> = Vec::new();

    for cap in &granted_custom {
        if !is_new(cap.as_str()) || new_caps.contains(cap) {
            continue;
        }
        if capabilities.get(cap).copied() != Some(true) {
            let change = CapChange::Grant(cap.clone());
            change.apply(&mut capabilities);
            changes.push(change);
        }
        new_caps.push(cap.clone());
    }

    for raw in &selection.deny_custom {
        let cap = sanitize_cap(raw);
        if !is_new(cap.as_str()) || granted_custom.contains(&cap) || new_caps.contains(&cap) {
            continue;
        }
        if capabilities.get(&cap).copied() != Some(false) {
            let change = CapChange::Deny(cap.clone());
            change.apply(&mut capabilities);
            changes.push(change);
        }
        new_caps.push(cap);
    }

    Reconciliation {
        changes,
        capabilities,
        new_caps,
    }
}
