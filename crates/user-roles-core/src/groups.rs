//! Capability groups and role groups.
//!
//! Besides registering the default groups, this module assembles the tabbed
//! capability editor: groups are walked in ascending priority and each one
//! yields its effective capability list. The walk is a fold with an explicit
//! "already added" accumulator. A final synthetic `all` section lists every
//! capability seen along the way.

use indexmap::IndexSet;
use serde::Serialize;

use user_roles_contracts::{
    capability::{CapMap, Capability, CapabilityGroup},
    content::PostType,
    role::{Role, RoleGroup},
};

use crate::{
    catalog::{TAXONOMY_ROLE_CAPS, WORDPRESS_ROLES},
    registry::Registry,
};

/// Name of the synthetic section appended after every registered group.
pub const ALL_SECTION: &str = "all";

/// Post types that never get a capability group.
const SKIPPED_POST_TYPES: [&str; 4] = ["revision", "nav_menu_item", "custom_css", "customize_changeset"];

/// Platform data the default capability groups are derived from.
#[derive(Debug, Clone, Copy)]
pub struct DefaultGroupsInput<'a> {
    pub post_types: &'a [PostType],
    /// Primitive caps of every registered taxonomy.
    pub taxonomy_caps: &'a [String],
    /// The site's available capabilities; feeds the `custom` group.
    pub available_caps: &'a [String],
}

/// Register `general`, one group per post type, `taxonomy`, `theme`,
/// `plugin`, `user`, and `custom`.
pub fn register_default_cap_groups(
    groups: &mut Registry<CapabilityGroup>,
    input: DefaultGroupsInput<'_>,
) {
    groups.register(
        "general",
        CapabilityGroup::new("general", "General")
            .with_icon("dashicons-wordpress")
            .with_priority(5),
    );

    for post_type in input.post_types {
        if SKIPPED_POST_TYPES.contains(&post_type.name.as_str()) {
            continue;
        }

        let caps = post_type_group_caps(post_type, input.post_types);
        if caps.is_empty() {
            continue;
        }

        let name = format!("type-{}", post_type.name);
        groups.register(
            name.clone(),
            CapabilityGroup::new(name, post_type.label.clone())
                .with_caps(caps)
                .with_icon(post_type_icon(post_type))
                .with_priority(10),
        );
    }

    groups.register(
        "taxonomy",
        CapabilityGroup::new("taxonomy", "Taxonomies")
            .with_caps(taxonomy_group_caps(input.taxonomy_caps))
            .with_icon("dashicons-tag")
            .diff_added(true)
            .with_priority(15),
    );

    groups.register(
        "theme",
        CapabilityGroup::new("theme", "Appearance")
            .with_icon("dashicons-admin-appearance")
            .with_priority(20),
    );

    groups.register(
        "plugin",
        CapabilityGroup::new("plugin", "Plugins")
            .with_icon("dashicons-admin-plugins")
            .with_priority(25),
    );

    groups.register(
        "user",
        CapabilityGroup::new("user", "Users")
            .with_icon("dashicons-admin-users")
            .with_priority(30),
    );

    groups.register(
        "custom",
        CapabilityGroup::new("custom", "Custom")
            .with_caps(input.available_caps.iter().cloned())
            .with_icon("dashicons-admin-generic")
            .diff_added(true)
            .with_priority(995),
    );
}

/// Primitive caps for a post type's group.
///
/// Types other than `post` and `page` drop caps they share with those two.
/// Attachments also carry `unfiltered_upload`.
fn post_type_group_caps(post_type: &PostType, all: &[PostType]) -> Vec<String> {
    let mut caps: IndexSet<String> = post_type.caps.iter().cloned().collect();

    if post_type.name != "post" && post_type.name != "page" {
        for core in all.iter().filter(|t| t.name == "post" || t.name == "page") {
            for cap in &core.caps {
                caps.shift_remove(cap);
            }
        }
    }

    if post_type.name == "attachment" {
        caps.insert("unfiltered_upload".to_string());
    }

    caps.into_iter().collect()
}

fn post_type_icon(post_type: &PostType) -> String {
    if let Some(icon) = post_type
        .menu_icon
        .as_deref()
        .filter(|icon| icon.to_ascii_lowercase().contains("dashicons-"))
    {
        return icon.to_string();
    }

    match post_type.name.as_str() {
        "attachment" => "dashicons-admin-media",
        "download" => "dashicons-download",
        "product" => "dashicons-cart",
        _ if post_type.hierarchical => "dashicons-admin-page",
        _ => "dashicons-admin-post",
    }
    .to_string()
}

/// Taxonomy caps without the category/tag caps, which stay role-gated.
fn taxonomy_group_caps(taxonomy_caps: &[String]) -> Vec<String> {
    let unique: IndexSet<&String> = taxonomy_caps.iter().collect();
    unique
        .into_iter()
        .filter(|cap| !TAXONOMY_ROLE_CAPS.iter().any(|(name, _)| *name == cap.as_str()))
        .cloned()
        .collect()
}

/// Register the `wordpress` role group with the stock roles present in `roles`.
pub fn register_default_role_groups(role_groups: &mut Registry<RoleGroup>, roles: &Registry<Role>) {
    role_groups.register(
        "wordpress",
        RoleGroup::new("wordpress", "WordPress", wordpress_roles(roles)),
    );
}

/// Stock role names that are present in `roles`, in stock order.
pub fn wordpress_roles(roles: &Registry<Role>) -> Vec<String> {
    WORDPRESS_ROLES
        .iter()
        .filter(|name| roles.exists(name))
        .map(|name| name.to_string())
        .collect()
}

// ── Capability editor assembly ───────────────────────────────────────────────

/// One tab of the capability editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapSection {
    pub name: String,
    pub label: String,
    pub icon: String,
    /// Effective capabilities shown in this tab.
    pub caps: Vec<String>,
}

/// One capability row: its label and its state on the role being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapControl {
    pub cap: String,
    pub section: String,
    pub label: String,
    pub granted: bool,
    pub denied: bool,
}

/// The assembled editor: registered groups by priority, then `all`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapTabs {
    pub sections: Vec<CapSection>,
}

impl CapTabs {
    pub fn section(&self, name: &str) -> Option<&CapSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// The trailing `all` section.
    pub fn all(&self) -> Option<&CapSection> {
        self.sections.last().filter(|s| s.name == ALL_SECTION)
    }

    /// Rows for every section, with grant/deny state taken from `has_caps`.
    ///
    /// Labels come from the capability registry when `human_labels` is set,
    /// otherwise the raw capability name is used.
    pub fn controls(
        &self,
        has_caps: &CapMap,
        caps: &Registry<Capability>,
        human_labels: bool,
    ) -> Vec<CapControl> {
        self.sections
            .iter()
            .flat_map(|section| {
                section.caps.iter().map(move |cap| CapControl {
                    cap: cap.clone(),
                    section: section.name.clone(),
                    label: match caps.get(cap) {
                        Some(registered) if human_labels => registered.label.clone(),
                        _ => cap.clone(),
                    },
                    granted: has_caps.get(cap).copied() == Some(true),
                    denied: has_caps.get(cap).copied() == Some(false),
                })
            })
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "sections": self.sections,
        })
    }
}

/// Declared caps of a group followed by registered caps assigned to it.
fn declared_caps(group: &CapabilityGroup, caps: &Registry<Capability>) -> IndexSet<String> {
    group
        .caps
        .iter()
        .cloned()
        .chain(
            caps.values()
                .filter(|cap| cap.group == group.name)
                .map(|cap| cap.name.clone()),
        )
        .collect()
}

/// Assemble the capability editor from the registered groups.
///
/// Groups are stably sorted by priority. A `diff_added` group drops every
/// cap an earlier group already claimed; either way the group's full declared
/// list joins the accumulator.
pub fn assemble_cap_tabs(
    groups: &Registry<CapabilityGroup>,
    caps: &Registry<Capability>,
) -> CapTabs {
    let mut ordered: Vec<&CapabilityGroup> = groups.values().collect();
    ordered.sort_by_key(|group| group.priority);

    let (mut sections, added) = ordered.into_iter().fold(
        (Vec::new(), IndexSet::<String>::new()),
        |(mut sections, mut added), group| {
            let declared = declared_caps(group, caps);

            let shown: Vec<String> = if group.diff_added {
                declared.iter().filter(|cap| !added.contains(*cap)).cloned().collect()
            } else {
                declared.iter().cloned().collect()
            };

            added.extend(declared);
            sections.push(CapSection {
                name: group.name.clone(),
                label: group.label.clone(),
                icon: group.icon.clone(),
                caps: shown,
            });

            (sections, added)
        },
    );

    sections.push(CapSection {
        name: ALL_SECTION.to_string(),
        label: "All".to_string(),
        icon: "dashicons-plus".to_string(),
        caps: added.into_iter().collect(),
    });

    CapTabs { sections }
}
