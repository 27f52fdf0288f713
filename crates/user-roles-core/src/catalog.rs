//! The capability catalog.
//!
//! Registers the built-in capability set, discovers capabilities that only
//! exist on roles, and computes which capabilities a site hides.

use std::collections::BTreeSet;

use user_roles_contracts::{
    capability::{CapMap, Capability},
    names::DO_NOT_ALLOW,
    role::Role,
};

use crate::registry::Registry;

/// Built-in capabilities as `(name, label, group)`.
const DEFAULT_CAPS: &[(&str, &str, &str)] = &[
    // General.
    ("edit_dashboard", "Edit Dashboard", "general"),
    ("edit_files", "Edit Files", "general"),
    ("export", "Export", "general"),
    ("import", "Import", "general"),
    ("manage_links", "Manage Links", "general"),
    ("manage_options", "Manage Options", "general"),
    ("moderate_comments", "Moderate Comments", "general"),
    ("read", "Read", "general"),
    ("unfiltered_html", "Unfiltered HTML", "general"),
    ("update_core", "Update Core", "general"),
    // Posts.
    ("delete_others_posts", "Delete Others' Posts", "type-post"),
    ("delete_posts", "Delete Posts", "type-post"),
    ("delete_private_posts", "Delete Private Posts", "type-post"),
    ("delete_published_posts", "Delete Published Posts", "type-post"),
    ("edit_others_posts", "Edit Others' Posts", "type-post"),
    ("edit_posts", "Edit Posts", "type-post"),
    ("edit_private_posts", "Edit Private Posts", "type-post"),
    ("edit_published_posts", "Edit Published Posts", "type-post"),
    ("publish_posts", "Publish Posts", "type-post"),
    ("read_private_posts", "Read Private Posts", "type-post"),
    // Pages.
    ("delete_others_pages", "Delete Others' Pages", "type-page"),
    ("delete_pages", "Delete Pages", "type-page"),
    ("delete_private_pages", "Delete Private Pages", "type-page"),
    ("delete_published_pages", "Delete Published Pages", "type-page"),
    ("edit_others_pages", "Edit Others' Pages", "type-page"),
    ("edit_pages", "Edit Pages", "type-page"),
    ("edit_private_pages", "Edit Private Pages", "type-page"),
    ("edit_published_pages", "Edit Published Pages", "type-page"),
    ("publish_pages", "Publish Pages", "type-page"),
    ("read_private_pages", "Read Private Pages", "type-page"),
    // Attachments.
    ("upload_files", "Upload Files", "type-attachment"),
    // Taxonomies.
    ("manage_categories", "Manage Categories", "taxonomy"),
    // Themes.
    ("delete_themes", "Delete Themes", "theme"),
    ("edit_theme_options", "Edit Theme Options", "theme"),
    ("edit_themes", "Edit Themes", "theme"),
    ("install_themes", "Install Themes", "theme"),
    ("switch_themes", "Switch Themes", "theme"),
    ("update_themes", "Update Themes", "theme"),
    // Plugins.
    ("activate_plugins", "Activate Plugins", "plugin"),
    ("delete_plugins", "Delete Plugins", "plugin"),
    ("edit_plugins", "Edit Plugins", "plugin"),
    ("install_plugins", "Install Plugins", "plugin"),
    ("update_plugins", "Update Plugins", "plugin"),
    // Users and roles.
    ("create_roles", "Create Roles", "user"),
    ("create_users", "Create Users", "user"),
    ("delete_roles", "Delete Roles", "user"),
    ("delete_users", "Delete Users", "user"),
    ("edit_roles", "Edit Roles", "user"),
    ("edit_users", "Edit Users", "user"),
    ("list_roles", "List Roles", "user"),
    ("list_users", "List Users", "user"),
    ("promote_users", "Promote Users", "user"),
    ("remove_users", "Remove Users", "user"),
    // Custom.
    ("restrict_content", "Restrict Content", "custom"),
];

/// Category and tag caps. These map to `manage_categories` on a stock
/// install, so they are only registered once some role actually carries them.
pub const TAXONOMY_ROLE_CAPS: &[(&str, &str)] = &[
    ("assign_categories", "Assign Categories"),
    ("edit_categories", "Edit Categories"),
    ("delete_categories", "Delete Categories"),
    ("assign_post_tags", "Assign Post Tags"),
    ("edit_post_tags", "Edit Post Tags"),
    ("delete_post_tags", "Delete Post Tags"),
    ("manage_post_tags", "Manage Post Tags"),
];

/// Legacy user levels, filtered out of every capability listing.
pub const OLD_LEVELS: [&str; 11] = [
    "level_0", "level_1", "level_2", "level_3", "level_4", "level_5", "level_6", "level_7",
    "level_8", "level_9", "level_10",
];

/// The roles a stock install ships with.
pub const WORDPRESS_ROLES: [&str; 5] =
    ["administrator", "editor", "author", "contributor", "subscriber"];

const NETWORK_CAPS: &[&str] = &[
    "create_sites",
    "delete_sites",
    "manage_network",
    "manage_sites",
    "manage_network_users",
    "manage_network_plugins",
    "manage_network_themes",
    "manage_network_options",
    "upgrade_network",
];

const FILE_EDIT_CAPS: &[&str] = &["edit_files", "edit_plugins", "edit_themes"];

const FILE_MOD_CAPS: &[&str] = &[
    "edit_files",
    "edit_plugins",
    "edit_themes",
    "update_plugins",
    "delete_plugins",
    "install_plugins",
    "upload_plugins",
    "update_themes",
    "delete_themes",
    "install_themes",
    "upload_themes",
    "update_core",
];

/// Install-level switches that decide which capabilities are hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformFlags {
    pub multisite: bool,
    pub allow_unfiltered_uploads: bool,
    pub disallow_unfiltered_html: bool,
    pub disallow_file_edit: bool,
    pub disallow_file_mods: bool,
}

impl PlatformFlags {
    /// Capabilities that are never listed or accepted on this install.
    ///
    /// `do_not_allow` and the network caps are always hidden. The rest depend
    /// on multisite and the file/upload/html switches.
    pub fn hidden_caps(&self) -> BTreeSet<String> {
        let mut caps: BTreeSet<String> = std::iter::once(DO_NOT_ALLOW)
            .chain(NETWORK_CAPS.iter().copied())
            .map(str::to_string)
            .collect();

        if self.multisite {
            caps.insert("setup_network".to_string());
        }
        if self.multisite || !self.allow_unfiltered_uploads {
            caps.insert("unfiltered_upload".to_string());
        }
        if self.multisite || self.disallow_unfiltered_html {
            caps.insert("unfiltered_html".to_string());
        }
        if self.multisite || self.disallow_file_edit {
            caps.extend(FILE_EDIT_CAPS.iter().map(|c| c.to_string()));
        }
        if self.multisite || self.disallow_file_mods {
            caps.extend(FILE_MOD_CAPS.iter().map(|c| c.to_string()));
        }

        caps
    }
}

/// Register the built-in capabilities.
///
/// `role_caps` is every capability currently present on any role; it gates
/// the category and tag caps.
pub fn register_default_caps(caps: &mut Registry<Capability>, role_caps: &BTreeSet<String>) {
    for (name, label, group) in DEFAULT_CAPS {
        caps.register(*name, Capability::new(*name).with_label(*label).in_group(*group));
    }

    for (name, label) in TAXONOMY_ROLE_CAPS {
        if role_caps.contains(*name) {
            caps.register(*name, Capability::new(*name).with_label(*label).in_group("taxonomy"));
        }
    }
}

/// Register capabilities that exist on roles but were never declared.
///
/// They are labelled with their own name and belong to no group.
pub fn register_role_caps(caps: &mut Registry<Capability>, roles: &Registry<Role>) {
    for cap in role_capabilities(roles) {
        if !caps.exists(&cap) {
            caps.register(cap.clone(), Capability::new(cap));
        }
    }
}

/// Every capability key on every role, granted or denied.
pub fn role_capabilities(roles: &Registry<Role>) -> BTreeSet<String> {
    roles
        .values()
        .flat_map(|role| role.capabilities.keys().cloned())
        .collect()
}

/// Names of the roles that grant `cap`.
pub fn cap_roles(cap: &str, roles: &Registry<Role>) -> Vec<String> {
    roles
        .values()
        .filter(|role| role.is_granted(cap))
        .map(|role| role.name.clone())
        .collect()
}

/// True when `cap` is assigned (granted or denied) to at least one role.
pub fn check_for_cap(cap: &str, roles: &Registry<Role>) -> bool {
    !cap.is_empty() && roles.values().any(|role| role.capabilities.contains_key(cap))
}

/// Registered capability names without old levels and hidden caps, sorted.
pub fn available_capabilities(
    caps: &Registry<Capability>,
    hidden: &BTreeSet<String>,
) -> Vec<String> {
    let available: BTreeSet<&str> = caps
        .names()
        .filter(|name| !OLD_LEVELS.contains(name) && !hidden.contains(*name))
        .collect();
    available.into_iter().map(str::to_string).collect()
}

/// Drop hidden caps from a submitted list, keeping first occurrences only.
pub fn remove_hidden_caps(submitted: &[String], hidden: &BTreeSet<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    submitted
        .iter()
        .filter(|cap| !hidden.contains(*cap) && seen.insert(cap.as_str()))
        .cloned()
        .collect()
}

/// Capabilities pre-checked on an empty "new role" form.
pub fn new_role_default_caps() -> CapMap {
    CapMap::from([("read".to_string(), true)])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles_with(caps: &[(&str, bool)]) -> Registry<Role> {
        let mut roles = Registry::new("role");
        roles.register(
            "custom",
            Role::new("custom", "Custom").with_caps(caps.iter().map(|(c, g)| (*c, *g))),
        );
        roles
    }

    #[test]
    fn default_caps_skip_taxonomy_caps_not_on_roles() {
        let mut caps = Registry::new("cap");
        register_default_caps(&mut caps, &BTreeSet::new());

        assert!(caps.exists("edit_posts"));
        assert!(caps.exists("restrict_content"));
        assert!(!caps.exists("assign_categories"));
        assert_eq!(caps.get("edit_others_posts").unwrap().label, "Edit Others' Posts");
        assert_eq!(caps.get("upload_files").unwrap().group, "type-attachment");
    }

    #[test]
    fn default_caps_include_taxonomy_caps_on_roles() {
        let mut caps = Registry::new("cap");
        let role_caps = BTreeSet::from(["edit_post_tags".to_string()]);
        register_default_caps(&mut caps, &role_caps);

        assert_eq!(caps.get("edit_post_tags").unwrap().group, "taxonomy");
        assert!(!caps.exists("edit_categories"));
    }

    #[test]
    fn role_caps_are_registered_with_name_as_label() {
        let roles = roles_with(&[("sell_tickets", true), ("read", false)]);
        let mut caps = Registry::new("cap");
        caps.register("read", Capability::new("read").with_label("Read"));
        register_role_caps(&mut caps, &roles);

        assert_eq!(caps.get("sell_tickets").unwrap().label, "sell_tickets");
        // Already registered caps keep their label.
        assert_eq!(caps.get("read").unwrap().label, "Read");
    }

    #[test]
    fn role_capabilities_include_denied() {
        let roles = roles_with(&[("a", true), ("b", false)]);
        let all = role_capabilities(&roles);
        assert!(all.contains("a"));
        assert!(all.contains("b"));
    }

    #[test]
    fn cap_roles_only_lists_grants() {
        let mut roles = roles_with(&[("edit_posts", false)]);
        roles.register("editor", Role::new("editor", "Editor").with_caps([("edit_posts", true)]));
        assert_eq!(cap_roles("edit_posts", &roles), vec!["editor".to_string()]);
        assert!(check_for_cap("edit_posts", &roles));
        assert!(!check_for_cap("", &roles));
    }

    #[test]
    fn hidden_caps_single_site_defaults() {
        let hidden = PlatformFlags::default().hidden_caps();
        assert!(hidden.contains("do_not_allow"));
        assert!(hidden.contains("manage_network"));
        assert!(hidden.contains("unfiltered_upload"));
        assert!(!hidden.contains("unfiltered_html"));
        assert!(!hidden.contains("edit_plugins"));
        assert!(!hidden.contains("setup_network"));
    }

    #[test]
    fn hidden_caps_multisite_hides_file_and_html_caps() {
        let flags = PlatformFlags {
            multisite: true,
            ..PlatformFlags::default()
        };
        let hidden = flags.hidden_caps();
        assert!(hidden.contains("setup_network"));
        assert!(hidden.contains("unfiltered_html"));
        assert!(hidden.contains("update_core"));
        assert!(hidden.contains("upload_themes"));
    }

    #[test]
    fn allowing_unfiltered_uploads_unhides_it() {
        let flags = PlatformFlags {
            allow_unfiltered_uploads: true,
            ..PlatformFlags::default()
        };
        assert!(!flags.hidden_caps().contains("unfiltered_upload"));
    }

    #[test]
    fn available_capabilities_sorted_without_levels_or_hidden() {
        let mut caps = Registry::new("cap");
        for name in ["zap", "level_3", "do_not_allow", "alpha"] {
            caps.register(name, Capability::new(name));
        }
        let hidden = PlatformFlags::default().hidden_caps();
        assert_eq!(
            available_capabilities(&caps, &hidden),
            vec!["alpha".to_string(), "zap".to_string()]
        );
    }

    #[test]
    fn remove_hidden_caps_dedups() {
        let hidden = PlatformFlags::default().hidden_caps();
        let submitted: Vec<String> = ["read", "do_not_allow", "read", "edit_posts"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            remove_hidden_caps(&submitted, &hidden),
            vec!["read".to_string(), "edit_posts".to_string()]
        );
    }
}
