//! Error types shared by every user-roles crate.
//!
//! All fallible operations return `UserRolesResult<T>`. Variants carry the
//! role or reason so callers can surface a precise admin notice.

use thiserror::Error;

/// The unified error type for role and capability management.
#[derive(Debug, Error)]
pub enum UserRolesError {
    /// The requested role is not known to the role store.
    #[error("role '{role}' does not exist")]
    RoleNotFound { role: String },

    /// A role with the same sanitized name already exists.
    #[error("role '{role}' already exists")]
    DuplicateRole { role: String },

    /// The role name was empty after sanitization.
    #[error("invalid role: {reason}")]
    InvalidRole { reason: String },

    /// The role label was empty after stripping markup.
    #[error("invalid role label: {reason}")]
    InvalidRoleLabel { reason: String },

    /// The role exists but the current site does not allow editing it.
    #[error("role '{role}' is not editable")]
    RoleNotEditable { role: String },

    /// Role create/edit/delete was attempted while the role manager is off.
    #[error("the role manager is disabled")]
    RoleManagerDisabled,

    /// A configuration value is missing or malformed.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The backing role, settings, or metadata store failed.
    #[error("store error: {reason}")]
    StoreError { reason: String },

    /// A role lifecycle event could not be recorded.
    #[error("event write failed: {reason}")]
    EventWriteFailed { reason: String },
}

/// Convenience alias used throughout the user-roles crates.
pub type UserRolesResult<T> = Result<T, UserRolesError>;
