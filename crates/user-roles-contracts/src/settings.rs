//! Plugin settings with their documented defaults.
//!
//! Every field is defaulted, so a partial settings document (or none at all)
//! still produces a complete `Settings` value.

use serde::{Deserialize, Serialize};

/// Site-wide configuration flags and messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enables the role create/edit/delete screens.
    pub role_manager: bool,
    /// Enables per-post role restrictions.
    pub content_permissions: bool,
    /// Requires login for every front-end page.
    pub private_blog: bool,
    pub private_feed: bool,
    pub login_form_widget: bool,
    pub users_widget: bool,
    /// Shown in place of restricted content when the post has no own message.
    pub content_permissions_error: String,
    /// Replaces feed content when the feed is private.
    pub private_feed_error: String,
    pub explicit_denied_caps: bool,
    pub multi_roles: bool,
    pub show_human_caps: bool,
    pub private_rest_api: bool,
    /// Role given to new users and to users whose only role is deleted.
    pub default_role: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            role_manager: true,
            content_permissions: true,
            private_blog: false,
            private_feed: false,
            login_form_widget: false,
            users_widget: false,
            content_permissions_error:
                "Sorry, but you do not have permission to view this content.".to_string(),
            private_feed_error: "You must be logged into the site to view this content."
                .to_string(),
            explicit_denied_caps: true,
            multi_roles: true,
            show_human_caps: true,
            private_rest_api: false,
            default_role: "subscriber".to_string(),
        }
    }
}
