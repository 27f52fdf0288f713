//! Builds the request-scoped registries from the platform's role store.

use tracing::debug;

use user_roles_contracts::{addon::Addon, content::PostType, error::UserRolesResult};

use crate::{
    catalog::{available_capabilities, register_default_caps, register_role_caps, role_capabilities, PlatformFlags},
    groups::{register_default_cap_groups, register_default_role_groups, DefaultGroupsInput},
    registry::Registries,
    traits::RoleStore,
};

/// Platform data needed to populate a fresh set of registries.
#[derive(Debug, Clone, Default)]
pub struct RegistryLoader {
    platform: PlatformFlags,
    post_types: Vec<PostType>,
    taxonomy_caps: Vec<String>,
    addons: Vec<Addon>,
}

impl RegistryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_platform(mut self, platform: PlatformFlags) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_post_types(mut self, post_types: Vec<PostType>) -> Self {
        self.post_types = post_types;
        self
    }

    pub fn with_taxonomy_caps(mut self, caps: Vec<String>) -> Self {
        self.taxonomy_caps = caps;
        self
    }

    pub fn with_addons(mut self, addons: Vec<Addon>) -> Self {
        self.addons = addons;
        self
    }

    pub fn platform(&self) -> &PlatformFlags {
        &self.platform
    }

    pub fn post_types(&self) -> &[PostType] {
        &self.post_types
    }

    /// Populate registries in dependency order: roles, caps, cap groups,
    /// role groups, add-ons.
    pub fn load(&self, store: &dyn RoleStore) -> UserRolesResult<Registries> {
        let mut registries = Registries::with_platform(&self.platform);

        self.refresh_roles(&mut registries, store)?;

        let role_caps = role_capabilities(&registries.roles);
        register_default_caps(&mut registries.caps, &role_caps);
        register_role_caps(&mut registries.caps, &registries.roles);

        let available = available_capabilities(&registries.caps, &registries.hidden_caps);
        register_default_cap_groups(
            &mut registries.cap_groups,
            DefaultGroupsInput {
                post_types: &self.post_types,
                taxonomy_caps: &self.taxonomy_caps,
                available_caps: &available,
            },
        );

        register_default_role_groups(&mut registries.role_groups, &registries.roles);

        for addon in &self.addons {
            registries.addons.register(addon.name.clone(), addon.clone());
        }

        debug!(
            roles = registries.roles.len(),
            caps = registries.caps.len(),
            cap_groups = registries.cap_groups.len(),
            role_groups = registries.role_groups.len(),
            addons = registries.addons.len(),
            "registries loaded"
        );

        Ok(registries)
    }

    /// Re-read roles from the store: register every store role and drop
    /// registered roles the store no longer has.
    pub fn refresh_roles(&self, registries: &mut Registries, store: &dyn RoleStore) -> UserRolesResult<()> {
        let roles = store.roles()?;

        let stale: Vec<String> = registries
            .roles
            .names()
            .filter(|name| !roles.iter().any(|role| role.name == *name))
            .map(str::to_string)
            .collect();
        for name in &stale {
            debug!(role = %name, "dropping role missing from store");
            registries.roles.unregister(name);
        }

        for role in roles {
            registries.roles.register(role.name.clone(), role);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::BTreeMap,
        sync::{Arc, Mutex},
    };

    use user_roles_contracts::role::{Role, UserAccount};

    use super::*;

    /// A role store that only answers `roles()`.
    #[derive(Clone, Default)]
    struct ListStore {
        roles: Arc<Mutex<Vec<Role>>>,
    }

    impl ListStore {
        fn with(roles: Vec<Role>) -> Self {
            Self { roles: Arc::new(Mutex::new(roles)) }
        }
    }

    impl RoleStore for ListStore {
        fn roles(&self) -> UserRolesResult<Vec<Role>> {
            Ok(self.roles.lock().unwrap().clone())
        }
        fn get_role(&self, name: &str) -> UserRolesResult<Option<Role>> {
            Ok(self.roles.lock().unwrap().iter().find(|r| r.name == name).cloned())
        }
        fn add_role(&self, _role: &Role) -> UserRolesResult<()> {
            Ok(())
        }
        fn add_cap(&self, _role: &str, _cap: &str, _grant: bool) -> UserRolesResult<()> {
            Ok(())
        }
        fn remove_cap(&self, _role: &str, _cap: &str) -> UserRolesResult<()> {
            Ok(())
        }
        fn remove_role(&self, _role: &str) -> UserRolesResult<()> {
            Ok(())
        }
        fn editable_roles(&self) -> UserRolesResult<Vec<String>> {
            Ok(vec![])
        }
        fn users_with_role(&self, _role: &str) -> UserRolesResult<Vec<UserAccount>> {
            Ok(vec![])
        }
        fn set_user_roles(&self, _user_id: u64, _roles: &[String]) -> UserRolesResult<()> {
            Ok(())
        }
        fn role_user_counts(&self) -> UserRolesResult<BTreeMap<String, usize>> {
            Ok(BTreeMap::new())
        }
    }

    fn post_type(name: &str, caps: &[&str]) -> PostType {
        PostType {
            name: name.to_string(),
            label: name.to_string(),
            public: true,
            hierarchical: false,
            menu_icon: None,
            caps: caps.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn store() -> ListStore {
        ListStore::with(vec![
            Role::new("administrator", "Administrator")
                .with_caps([("manage_options", true), ("edit_categories", true)]),
            Role::new("subscriber", "Subscriber").with_caps([("read", true)]),
            Role::new("ticket_agent", "Ticket Agent").with_caps([("sell_tickets", true), ("read", false)]),
        ])
    }

    #[test]
    fn load_populates_every_registry() {
        let loader = RegistryLoader::new()
            .with_post_types(vec![post_type("post", &["edit_posts", "publish_posts"])])
            .with_addons(vec![Addon {
                name: "members-privacy-caps".into(),
                title: "Privacy Caps".into(),
                url: String::new(),
                excerpt: String::new(),
            }]);
        let reg = loader.load(&store()).unwrap();

        assert_eq!(reg.roles.len(), 3);
        assert!(reg.caps.exists("manage_options"));
        assert!(reg.cap_groups.exists("type-post"));
        assert!(reg.cap_groups.exists("custom"));
        assert!(reg.addons.exists("members-privacy-caps"));

        let wordpress = reg.role_groups.get("wordpress").unwrap();
        assert_eq!(wordpress.roles, vec!["administrator".to_string(), "subscriber".to_string()]);
    }

    #[test]
    fn undeclared_role_caps_are_registered_with_their_name() {
        let reg = RegistryLoader::new().load(&store()).unwrap();
        let cap = reg.caps.get("sell_tickets").unwrap();
        assert_eq!(cap.label, "sell_tickets");
        assert_eq!(cap.group, "");
    }

    #[test]
    fn taxonomy_caps_follow_role_usage() {
        let reg = RegistryLoader::new().load(&store()).unwrap();
        assert!(reg.caps.exists("edit_categories"));
        assert!(!reg.caps.exists("edit_post_tags"));
    }

    #[test]
    fn refresh_drops_roles_removed_from_store() {
        let store = store();
        let loader = RegistryLoader::new();
        let mut reg = loader.load(&store).unwrap();

        store.roles.lock().unwrap().retain(|r| r.name != "ticket_agent");
        loader.refresh_roles(&mut reg, &store).unwrap();

        assert!(!reg.roles.exists("ticket_agent"));
        assert_eq!(reg.roles.len(), 2);
    }

    #[test]
    fn platform_flags_drive_hidden_caps() {
        let loader = RegistryLoader::new().with_platform(PlatformFlags {
            multisite: true,
            ..PlatformFlags::default()
        });
        let reg = loader.load(&store()).unwrap();
        assert!(reg.hidden_caps.contains("unfiltered_html"));
    }
}
