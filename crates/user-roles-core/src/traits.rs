//! Collaborator traits for the role manager.
//!
//! The hosting platform owns persistence. These four traits are the whole
//! contract between the core and the platform:
//!
//! - `RoleStore`: roles, their capability maps, and user-role assignment
//! - `SettingsStore`: the plugin settings document
//! - `PostMetaStore`: per-post role restrictions and error messages
//! - `EventSink`: receiver for role lifecycle events
//!
//! All methods take `&self`; implementations use interior mutability.

use std::collections::BTreeMap;

use user_roles_contracts::{
    error::UserRolesResult,
    event::RoleEvent,
    role::{Role, UserAccount},
    settings::Settings,
};

/// The platform's persistent role store.
pub trait RoleStore: Send + Sync {
    /// Every role the platform currently knows, in platform order.
    fn roles(&self) -> UserRolesResult<Vec<Role>>;

    /// Look up a single role. `Ok(None)` when it does not exist.
    fn get_role(&self, name: &str) -> UserRolesResult<Option<Role>>;

    /// Persist a new role with its initial capability map.
    fn add_role(&self, role: &Role) -> UserRolesResult<()>;

    /// Set `cap` on `role` to granted (`true`) or denied (`false`).
    fn add_cap(&self, role: &str, cap: &str, grant: bool) -> UserRolesResult<()>;

    /// Remove `cap` from `role` entirely.
    fn remove_cap(&self, role: &str, cap: &str) -> UserRolesResult<()>;

    /// Delete a role. Users are not touched; callers migrate them first.
    fn remove_role(&self, role: &str) -> UserRolesResult<()>;

    /// Names of the roles the current user may edit.
    fn editable_roles(&self) -> UserRolesResult<Vec<String>>;

    /// Every user holding `role`.
    fn users_with_role(&self, role: &str) -> UserRolesResult<Vec<UserAccount>>;

    /// Replace a user's full role set.
    fn set_user_roles(&self, user_id: u64, roles: &[String]) -> UserRolesResult<()>;

    /// Number of users per role name. Roles without users may be absent.
    fn role_user_counts(&self) -> UserRolesResult<BTreeMap<String, usize>>;
}

/// The platform's key-value settings store, typed as one document.
pub trait SettingsStore: Send + Sync {
    /// Load the settings, falling back to defaults for anything unset.
    fn load(&self) -> UserRolesResult<Settings>;

    fn save(&self, settings: &Settings) -> UserRolesResult<()>;
}

/// Per-post metadata for content permissions.
pub trait PostMetaStore: Send + Sync {
    /// Roles allowed to view the post. Empty means unrestricted.
    fn post_roles(&self, post_id: u64) -> UserRolesResult<Vec<String>>;

    fn set_post_roles(&self, post_id: u64, roles: &[String]) -> UserRolesResult<()>;

    fn delete_post_roles(&self, post_id: u64) -> UserRolesResult<()>;

    /// The post's own "no access" message, if one was saved.
    fn access_message(&self, post_id: u64) -> UserRolesResult<Option<String>>;

    fn set_access_message(&self, post_id: u64, message: &str) -> UserRolesResult<()>;

    fn delete_access_message(&self, post_id: u64) -> UserRolesResult<()>;
}

/// Receiver for role lifecycle events.
///
/// A failed record is reported to the caller after the mutation it describes
/// has already been applied to the role store.
pub trait EventSink: Send + Sync {
    fn record(&self, event: &RoleEvent) -> UserRolesResult<()>;
}
