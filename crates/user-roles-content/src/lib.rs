//! # user-roles-content
//!
//! Post-level content permissions.
//!
//! A post can be restricted to a set of roles. [`ContentGate`] answers who may
//! view it and replaces the content with an error message for everyone else.
//! Restrictions live in the platform's
//! [`PostMetaStore`](user_roles_core::traits::PostMetaStore).

pub mod gate;

pub use gate::{ContentGate, PostPermissionsForm, SaveContext, SaveOutcome, RESTRICT_CONTENT_CAP};
