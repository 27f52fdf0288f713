//! Simulated site data for the user-roles reference runtime.
//!
//! `InMemorySite` stands in for the platform's role and post-meta storage.
//! It is seeded with the five stock roles and their stock capabilities, a
//! handful of users, and two posts. All data is fictional.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, Mutex, MutexGuard},
};

use tracing::debug;

use user_roles_contracts::{
    content::{Post, PostType, Viewer},
    error::{UserRolesError, UserRolesResult},
    role::{Role, UserAccount},
};
use user_roles_core::{
    traits::{PostMetaStore, RoleStore},
    RegistryLoader,
};
use user_roles_settings::builtin_addons;

// ── Stock roles ──────────────────────────────────────────────────────────────

const SUBSCRIBER_CAPS: &[&str] = &["read", "level_0"];

const CONTRIBUTOR_CAPS: &[&str] = &["edit_posts", "delete_posts", "level_1"];

const AUTHOR_CAPS: &[&str] = &[
    "upload_files",
    "edit_published_posts",
    "publish_posts",
    "delete_published_posts",
    "level_2",
];

const EDITOR_CAPS: &[&str] = &[
    "moderate_comments",
    "manage_categories",
    "manage_links",
    "unfiltered_html",
    "edit_others_posts",
    "edit_pages",
    "edit_others_pages",
    "edit_published_pages",
    "publish_pages",
    "delete_pages",
    "delete_others_pages",
    "delete_published_pages",
    "delete_others_posts",
    "delete_private_posts",
    "edit_private_posts",
    "read_private_posts",
    "delete_private_pages",
    "edit_private_pages",
    "read_private_pages",
    "level_3",
    "level_4",
    "level_5",
    "level_6",
    "level_7",
];

const ADMINISTRATOR_CAPS: &[&str] = &[
    "switch_themes",
    "edit_themes",
    "activate_plugins",
    "edit_plugins",
    "edit_users",
    "edit_files",
    "manage_options",
    "import",
    "unfiltered_upload",
    "edit_dashboard",
    "update_plugins",
    "delete_plugins",
    "install_plugins",
    "update_themes",
    "install_themes",
    "update_core",
    "list_users",
    "remove_users",
    "promote_users",
    "edit_theme_options",
    "delete_themes",
    "export",
    "delete_users",
    "create_users",
    "create_roles",
    "delete_roles",
    "edit_roles",
    "list_roles",
    "restrict_content",
    "level_8",
    "level_9",
    "level_10",
];

/// The stock roles, each inheriting the caps of the one below it.
pub fn stock_roles() -> Vec<Role> {
    let tiers: [(&str, &str, &[&str]); 5] = [
        ("subscriber", "Subscriber", SUBSCRIBER_CAPS),
        ("contributor", "Contributor", CONTRIBUTOR_CAPS),
        ("author", "Author", AUTHOR_CAPS),
        ("editor", "Editor", EDITOR_CAPS),
        ("administrator", "Administrator", ADMINISTRATOR_CAPS),
    ];

    let mut inherited: Vec<&str> = Vec::new();
    let mut roles: Vec<Role> = tiers
        .iter()
        .map(|(name, label, caps)| {
            inherited.extend_from_slice(caps);
            Role::new(*name, *label).with_caps(inherited.iter().map(|cap| (*cap, true)))
        })
        .collect();

    // Stock install order: highest tier first.
    roles.reverse();
    roles
}

pub fn stock_users() -> Vec<UserAccount> {
    let user = |id: u64, login: &str, roles: &[&str]| UserAccount {
        id,
        login: login.to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
    };
    vec![
        user(1, "admin", &["administrator"]),
        user(2, "edna", &["editor"]),
        user(3, "ann", &["author", "contributor"]),
        user(4, "carl", &["contributor"]),
        user(5, "sue", &["subscriber"]),
    ]
}

pub fn stock_post_types() -> Vec<PostType> {
    let caps = |kind: &str| -> Vec<String> {
        [
            "edit_{}",
            "edit_others_{}",
            "publish_{}",
            "read_private_{}",
            "delete_{}",
            "delete_private_{}",
            "delete_published_{}",
            "delete_others_{}",
            "edit_private_{}",
            "edit_published_{}",
        ]
        .iter()
        .map(|pattern| pattern.replace("{}", kind))
        .chain(std::iter::once("read".to_string()))
        .collect()
    };

    vec![
        PostType {
            name: "post".to_string(),
            label: "Posts".to_string(),
            public: true,
            hierarchical: false,
            menu_icon: None,
            caps: caps("posts"),
        },
        PostType {
            name: "page".to_string(),
            label: "Pages".to_string(),
            public: true,
            hierarchical: true,
            menu_icon: None,
            caps: caps("pages"),
        },
        PostType {
            name: "attachment".to_string(),
            label: "Media".to_string(),
            public: true,
            hierarchical: false,
            menu_icon: None,
            caps: caps("posts"),
        },
    ]
}

/// Primitive caps of the category and tag taxonomies.
pub fn stock_taxonomy_caps() -> Vec<String> {
    [
        "manage_categories",
        "edit_categories",
        "delete_categories",
        "assign_categories",
        "manage_post_tags",
        "edit_post_tags",
        "delete_post_tags",
        "assign_post_tags",
    ]
    .iter()
    .map(|cap| cap.to_string())
    .collect()
}

pub fn stock_posts() -> Vec<Post> {
    vec![
        Post {
            id: 10,
            author_id: 2,
            post_type: "post".to_string(),
            edit_others_cap: "edit_others_posts".to_string(),
        },
        Post {
            id: 11,
            author_id: 3,
            post_type: "page".to_string(),
            edit_others_cap: "edit_others_pages".to_string(),
        },
    ]
}

/// A registry loader configured for the stock site.
pub fn site_loader() -> UserRolesResult<RegistryLoader> {
    Ok(RegistryLoader::new()
        .with_post_types(stock_post_types())
        .with_taxonomy_caps(stock_taxonomy_caps())
        .with_addons(builtin_addons()?))
}

// ── In-memory site ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct SiteState {
    roles: Vec<Role>,
    users: Vec<UserAccount>,
    uneditable: BTreeSet<String>,
    post_roles: BTreeMap<u64, Vec<String>>,
    access_messages: BTreeMap<u64, String>,
}

/// Role storage and post metadata for one fictional site.
///
/// Clones share state, so one clone can be boxed into the role manager while
/// another inspects the result.
#[derive(Debug, Clone, Default)]
pub struct InMemorySite {
    state: Arc<Mutex<SiteState>>,
}

impl InMemorySite {
    /// A site with the stock roles and users.
    pub fn stock() -> Self {
        let site = Self::default();
        if let Ok(mut state) = site.state.lock() {
            state.roles = stock_roles();
            state.users = stock_users();
        }
        site
    }

    /// Hide `role` from the editable set, as a lower-privileged admin would
    /// see it.
    pub fn lock_role(&self, role: &str) -> UserRolesResult<()> {
        self.lock()?.uneditable.insert(role.to_string());
        Ok(())
    }

    pub fn user(&self, id: u64) -> UserRolesResult<Option<UserAccount>> {
        Ok(self.lock()?.users.iter().find(|u| u.id == id).cloned())
    }

    /// Build the viewer for `user_id`.
    ///
    /// Effective caps are the union of the user's granted caps. With
    /// `explicit_denied_caps` on, a cap denied by any of the user's roles is
    /// removed even when another role grants it.
    pub fn viewer(&self, user_id: u64, explicit_denied_caps: bool) -> UserRolesResult<Viewer> {
        let state = self.lock()?;
        let user = state
            .users
            .iter()
            .find(|u| u.id == user_id)
            .ok_or_else(|| UserRolesError::StoreError {
                reason: format!("user {} does not exist", user_id),
            })?;

        let roles: Vec<&Role> = state
            .roles
            .iter()
            .filter(|role| user.has_role(&role.name))
            .collect();

        let mut capabilities: BTreeSet<String> = roles
            .iter()
            .flat_map(|role| role.granted_caps())
            .map(str::to_string)
            .collect();

        if explicit_denied_caps {
            for denied in roles.iter().flat_map(|role| role.denied_caps()) {
                capabilities.remove(denied);
            }
        }

        Ok(Viewer {
            user_id: Some(user.id),
            roles: user.roles.clone(),
            capabilities,
        })
    }

    fn lock(&self) -> UserRolesResult<MutexGuard<'_, SiteState>> {
        self.state.lock().map_err(|e| UserRolesError::StoreError {
            reason: format!("site state lock poisoned: {}", e),
        })
    }

    fn with_role<T>(&self, name: &str, f: impl FnOnce(&mut Role) -> T) -> UserRolesResult<T> {
        let mut state = self.lock()?;
        let role = state
            .roles
            .iter_mut()
            .find(|role| role.name == name)
            .ok_or_else(|| UserRolesError::RoleNotFound { role: name.to_string() })?;
        Ok(f(role))
    }
}

impl RoleStore for InMemorySite {
    fn roles(&self) -> UserRolesResult<Vec<Role>> {
        Ok(self.lock()?.roles.clone())
    }

    fn get_role(&self, name: &str) -> UserRolesResult<Option<Role>> {
        Ok(self.lock()?.roles.iter().find(|role| role.name == name).cloned())
    }

    fn add_role(&self, role: &Role) -> UserRolesResult<()> {
        let mut state = self.lock()?;
        if state.roles.iter().any(|r| r.name == role.name) {
            return Err(UserRolesError::DuplicateRole { role: role.name.clone() });
        }
        state.roles.push(role.clone());
        debug!(role = %role.name, "site role added");
        Ok(())
    }

    fn add_cap(&self, role: &str, cap: &str, grant: bool) -> UserRolesResult<()> {
        self.with_role(role, |role| {
            role.capabilities.insert(cap.to_string(), grant);
        })
    }

    fn remove_cap(&self, role: &str, cap: &str) -> UserRolesResult<()> {
        self.with_role(role, |role| {
            role.capabilities.remove(cap);
        })
    }

    fn remove_role(&self, role: &str) -> UserRolesResult<()> {
        let mut state = self.lock()?;
        let before = state.roles.len();
        state.roles.retain(|r| r.name != role);
        if state.roles.len() == before {
            return Err(UserRolesError::RoleNotFound { role: role.to_string() });
        }
        debug!(role = %role, "site role removed");
        Ok(())
    }

    fn editable_roles(&self) -> UserRolesResult<Vec<String>> {
        let state = self.lock()?;
        Ok(state
            .roles
            .iter()
            .filter(|role| !state.uneditable.contains(&role.name))
            .map(|role| role.name.clone())
            .collect())
    }

    fn users_with_role(&self, role: &str) -> UserRolesResult<Vec<UserAccount>> {
        Ok(self
            .lock()?
            .users
            .iter()
            .filter(|user| user.has_role(role))
            .cloned()
            .collect())
    }

    fn set_user_roles(&self, user_id: u64, roles: &[String]) -> UserRolesResult<()> {
        let mut state = self.lock()?;
        let user = state
            .users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or_else(|| UserRolesError::StoreError {
                reason: format!("user {} does not exist", user_id),
            })?;
        user.roles = roles.to_vec();
        Ok(())
    }

    fn role_user_counts(&self) -> UserRolesResult<BTreeMap<String, usize>> {
        let state = self.lock()?;
        let mut counts = BTreeMap::new();
        for role in state.users.iter().flat_map(|user| user.roles.iter()) {
            *counts.entry(role.clone()).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

impl PostMetaStore for InMemorySite {
    fn post_roles(&self, post_id: u64) -> UserRolesResult<Vec<String>> {
        Ok(self.lock()?.post_roles.get(&post_id).cloned().unwrap_or_default())
    }

    fn set_post_roles(&self, post_id: u64, roles: &[String]) -> UserRolesResult<()> {
        self.lock()?.post_roles.insert(post_id, roles.to_vec());
        Ok(())
    }

    fn delete_post_roles(&self, post_id: u64) -> UserRolesResult<()> {
        self.lock()?.post_roles.remove(&post_id);
        Ok(())
    }

    fn access_message(&self, post_id: u64) -> UserRolesResult<Option<String>> {
        Ok(self.lock()?.access_messages.get(&post_id).cloned())
    }

    fn set_access_message(&self, post_id: u64, message: &str) -> UserRolesResult<()> {
        self.lock()?.access_messages.insert(post_id, message.to_string());
        Ok(())
    }

    fn delete_access_message(&self, post_id: u64) -> UserRolesResult<()> {
        self.lock()?.access_messages.remove(&post_id);
        Ok(())
    }
}
