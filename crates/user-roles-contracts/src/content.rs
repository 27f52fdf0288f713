//! Types for post-level content restrictions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A post as seen by the content gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub author_id: u64,
    pub post_type: String,
    /// Primitive capability that lets a user edit this post when they are not
    /// its author (e.g. `edit_others_posts`).
    pub edit_others_cap: String,
}

/// A registered post type and the primitive capabilities it uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostType {
    pub name: String,
    pub label: String,
    pub public: bool,
    pub hierarchical: bool,
    #[serde(default)]
    pub menu_icon: Option<String>,
    /// Primitive caps, meta caps (`edit_post`, `read_post`, `delete_post`) excluded.
    #[serde(default)]
    pub caps: Vec<String>,
}

/// The user requesting a piece of content. `user_id = None` is anonymous.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub user_id: Option<u64>,
    pub roles: Vec<String>,
    /// Effective (granted) capabilities of the user across all roles.
    pub capabilities: BTreeSet<String>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn can(&self, cap: &str) -> bool {
        self.capabilities.contains(cap)
    }
}
