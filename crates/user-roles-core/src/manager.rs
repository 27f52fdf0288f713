//! The role manager: create, clone, edit, and delete roles.
//!
//! Every mutating operation follows the same order:
//!
//!   Settings gate → Validate → Reconcile → Store → Registries → Event
//!
//! The role store is written before the registries so that a store failure
//! leaves the request's registries untouched. The lifecycle event is sent
//! last; a sink failure is returned after the store has been updated.

use serde::Serialize;
use tracing::{debug, info, warn};

use user_roles_contracts::{
    capability::{CapMap, Capability},
    error::{UserRolesError, UserRolesResult},
    event::{RoleEvent, RoleEventKind},
    names::{sanitize_role, strip_all_tags},
    role::Role,
    settings::Settings,
};

use crate::{
    catalog::{available_capabilities, new_role_default_caps},
    groups::ALL_SECTION,
    loader::RegistryLoader,
    reconcile::{reconcile, CapChange, CapabilitySelection},
    registry::Registries,
    traits::{EventSink, RoleStore, SettingsStore},
};

/// Group names that receive newly introduced custom caps.
const NEW_CAP_GROUPS: [&str; 2] = [ALL_SECTION, "custom"];

/// A submitted "add new role" form.
#[derive(Debug, Clone, Default)]
pub struct NewRoleRequest {
    /// Requested role name. Derived from the label when absent or blank.
    pub role: Option<String>,
    pub label: String,
    pub selection: CapabilitySelection,
}

/// Prefilled values for the "add new role" form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDraft {
    pub role: String,
    pub label: String,
    pub capabilities: CapMap,
}

/// What an edit did to a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleUpdate {
    pub role: Role,
    pub changes: Vec<CapChange>,
    pub new_caps: Vec<String>,
}

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// The role is gone. `reassigned` users fell back to the default role;
    /// `stripped` users kept their other roles.
    Deleted { reassigned: Vec<u64>, stripped: Vec<u64> },
    /// The role is the site's default role and was left in place.
    DefaultRoleProtected,
}

/// Role management over the platform's stores.
///
/// Registries are request-scoped and passed into each call; the manager holds
/// only the collaborators.
pub struct RoleManager {
    store: Box<dyn RoleStore>,
    settings: Box<dyn SettingsStore>,
    events: Box<dyn EventSink>,
}

impl RoleManager {
    pub fn new(
        store: Box<dyn RoleStore>,
        settings: Box<dyn SettingsStore>,
        events: Box<dyn EventSink>,
    ) -> Self {
        Self { store, settings, events }
    }

    pub fn store(&self) -> &dyn RoleStore {
        self.store.as_ref()
    }

    pub fn settings(&self) -> UserRolesResult<Settings> {
        self.settings.load()
    }

    /// Build this request's registries from the role store.
    pub fn load_registries(&self, loader: &RegistryLoader) -> UserRolesResult<Registries> {
        loader.load(self.store.as_ref())
    }

    /// Capabilities the editor may grant or deny: available caps plus every
    /// cap group's caps, hidden caps excluded. Sorted and unique.
    pub fn known_capabilities(registries: &Registries) -> Vec<String> {
        let mut known = available_capabilities(&registries.caps, &registries.hidden_caps);
        known.extend(
            registries
                .cap_groups
                .values()
                .flat_map(|group| group.caps.iter())
                .filter(|cap| !registries.hidden_caps.contains(*cap))
                .cloned(),
        );
        known.sort();
        known.dedup();
        known
    }

    // ── Create ───────────────────────────────────────────────────────────────

    /// Create a role from a submitted form.
    ///
    /// # Errors
    ///
    /// `RoleManagerDisabled`, `InvalidRole` for an empty sanitized name,
    /// `InvalidRoleLabel` for an empty label, `DuplicateRole` when the name is
    /// taken, and any store or event sink error.
    pub fn create_role(&self, registries: &mut Registries, request: NewRoleRequest) -> UserRolesResult<Role> {
        self.ensure_enabled()?;

        let label = strip_all_tags(&request.label).trim().to_string();
        let name = match request.role.as_deref().map(str::trim) {
            Some(role) if !role.is_empty() => sanitize_role(role),
            _ => sanitize_role(&label),
        };

        if name.is_empty() {
            return Err(UserRolesError::InvalidRole {
                reason: "role name is empty after sanitizing".to_string(),
            });
        }
        if label.is_empty() {
            return Err(UserRolesError::InvalidRoleLabel {
                reason: "role label is empty".to_string(),
            });
        }
        if registries.roles.exists(&name) || self.store.get_role(&name)?.is_some() {
            warn!(role = %name, "refusing to create duplicate role");
            return Err(UserRolesError::DuplicateRole { role: name });
        }

        let selection = request.selection.without_hidden(&registries.hidden_caps);
        let known = Self::known_capabilities(registries);
        let result = reconcile(&CapMap::new(), &known, &selection);

        let role = Role {
            name: name.clone(),
            label,
            capabilities: result.capabilities,
        };
        self.store.add_role(&role)?;

        add_new_caps(registries, &result.new_caps);
        registries.roles.register(name.clone(), role.clone());

        info!(
            role = %name,
            granted = role.granted_count(),
            denied = role.denied_count(),
            "role created"
        );

        self.events.record(&RoleEvent::new(RoleEventKind::Added, name))?;
        Ok(role)
    }

    /// Prefill for an empty "add new role" form.
    pub fn new_role_draft() -> RoleDraft {
        RoleDraft {
            role: String::new(),
            label: String::new(),
            capabilities: new_role_default_caps(),
        }
    }

    /// Prefill for cloning `source`: `{source}_clone`, `{Label} Clone`, and
    /// the source's capability map.
    pub fn clone_draft(registries: &Registries, source: &str) -> UserRolesResult<RoleDraft> {
        let source = sanitize_role(source);
        let role = registries
            .roles
            .get(&source)
            .ok_or_else(|| UserRolesError::RoleNotFound { role: source.clone() })?;

        Ok(RoleDraft {
            role: format!("{}_clone", role.name),
            label: format!("{} Clone", role.label),
            capabilities: role.capabilities.clone(),
        })
    }

    // ── Edit ─────────────────────────────────────────────────────────────────

    /// Reconcile a role against a submitted capability form and persist the
    /// resulting changes.
    ///
    /// # Errors
    ///
    /// `RoleManagerDisabled`, `RoleNotFound`, `RoleNotEditable`, and any store
    /// or event sink error.
    pub fn edit_role(
        &self,
        registries: &mut Registries,
        role: &str,
        selection: &CapabilitySelection,
    ) -> UserRolesResult<RoleUpdate> {
        self.ensure_enabled()?;

        let name = sanitize_role(role);
        let mut current = self
            .store
            .get_role(&name)?
            .ok_or_else(|| UserRolesError::RoleNotFound { role: name.clone() })?;

        if !self.store.editable_roles()?.contains(&name) {
            warn!(role = %name, "role is not editable by the current user");
            return Err(UserRolesError::RoleNotEditable { role: name });
        }

        let selection = selection.without_hidden(&registries.hidden_caps);
        let known = Self::known_capabilities(registries);
        let result = reconcile(&current.capabilities, &known, &selection);

        for change in &result.changes {
            match change {
                CapChange::Grant(cap) => self.store.add_cap(&name, cap, true)?,
                CapChange::Deny(cap) => self.store.add_cap(&name, cap, false)?,
                CapChange::Remove(cap) => self.store.remove_cap(&name, cap)?,
            }
            debug!(role = %name, change = ?change, "capability change applied");
        }

        add_new_caps(registries, &result.new_caps);
        current.capabilities = result.capabilities;
        registries.roles.register(name.clone(), current.clone());

        info!(
            role = %name,
            changes = result.changes.len(),
            new_caps = result.new_caps.len(),
            "role updated"
        );

        self.events.record(&RoleEvent::new(RoleEventKind::Updated, name))?;
        Ok(RoleUpdate {
            role: current,
            changes: result.changes,
            new_caps: result.new_caps,
        })
    }

    // ── Delete ───────────────────────────────────────────────────────────────

    /// Delete a role after moving its users off it.
    ///
    /// Users holding no other role fall back to the default role. The default
    /// role itself is never deleted.
    ///
    /// # Errors
    ///
    /// `RoleManagerDisabled`, `RoleNotFound`, and any store or event sink error.
    pub fn delete_role(&self, registries: &mut Registries, role: &str) -> UserRolesResult<DeleteOutcome> {
        let settings = self.settings.load()?;
        if !settings.role_manager {
            return Err(UserRolesError::RoleManagerDisabled);
        }

        let name = sanitize_role(role);
        if name == settings.default_role {
            info!(role = %name, "refusing to delete the default role");
            return Ok(DeleteOutcome::DefaultRoleProtected);
        }

        if self.store.get_role(&name)?.is_none() {
            return Err(UserRolesError::RoleNotFound { role: name });
        }

        let mut reassigned = Vec::new();
        let mut stripped = Vec::new();
        for user in self.store.users_with_role(&name)? {
            let remaining: Vec<String> = user.roles.iter().filter(|r| **r != name).cloned().collect();
            if remaining.is_empty() {
                self.store.set_user_roles(user.id, &[settings.default_role.clone()])?;
                reassigned.push(user.id);
            } else {
                self.store.set_user_roles(user.id, &remaining)?;
                stripped.push(user.id);
            }
        }

        self.store.remove_role(&name)?;
        registries.roles.unregister(&name);

        info!(
            role = %name,
            reassigned = reassigned.len(),
            stripped = stripped.len(),
            "role deleted"
        );

        self.events.record(&RoleEvent::new(RoleEventKind::Deleted, name))?;
        Ok(DeleteOutcome::Deleted { reassigned, stripped })
    }

    /// Delete several roles. Names that do not exist are skipped.
    pub fn bulk_delete(
        &self,
        registries: &mut Registries,
        roles: &[String],
    ) -> UserRolesResult<Vec<(String, DeleteOutcome)>> {
        let mut outcomes = Vec::new();
        for role in roles {
            let name = sanitize_role(role);
            if self.store.get_role(&name)?.is_none() {
                debug!(role = %name, "bulk delete skipping unknown role");
                continue;
            }
            let outcome = self.delete_role(registries, &name)?;
            outcomes.push((name, outcome));
        }
        Ok(outcomes)
    }

    fn ensure_enabled(&self) -> UserRolesResult<()> {
        if self.settings.load()?.role_manager {
            Ok(())
        } else {
            Err(UserRolesError::RoleManagerDisabled)
        }
    }
}

/// Register new custom caps and list them in the `all` and `custom` groups
/// when those groups exist.
fn add_new_caps(registries: &mut Registries, new_caps: &[String]) {
    if new_caps.is_empty() {
        return;
    }

    for cap in new_caps {
        if !registries.caps.exists(cap) {
            registries.caps.register(cap.clone(), Capability::new(cap.clone()));
        }
    }

    for group in NEW_CAP_GROUPS {
        if let Some(group) = registries.cap_groups.get_mut(group) {
            for cap in new_caps {
                if !group.caps.contains(cap) {
                    group.caps.push(cap.clone());
                }
            }
            group.caps.sort();
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
