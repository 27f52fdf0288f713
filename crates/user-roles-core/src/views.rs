//! Role list views: which roles appear under each tab of the roles screen.

use std::{collections::BTreeMap, convert::Infallible, fmt, str::FromStr};

use crate::registry::Registries;

/// A named filter over the role registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleView {
    All,
    Mine,
    Active,
    Inactive,
    Editable,
    Uneditable,
    /// The roles of a registered role group.
    Group(String),
}

impl FromStr for RoleView {
    type Err = Infallible;

    /// Keywords map to their view; anything else names a role group.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "all" | "" => Self::All,
            "mine" => Self::Mine,
            "active" => Self::Active,
            "inactive" => Self::Inactive,
            "editable" => Self::Editable,
            "uneditable" => Self::Uneditable,
            other => Self::Group(other.to_string()),
        })
    }
}

impl fmt::Display for RoleView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Mine => f.write_str("mine"),
            Self::Active => f.write_str("active"),
            Self::Inactive => f.write_str("inactive"),
            Self::Editable => f.write_str("editable"),
            Self::Uneditable => f.write_str("uneditable"),
            Self::Group(name) => f.write_str(name),
        }
    }
}

/// Request data the views are computed from.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub registries: &'a Registries,
    pub user_counts: &'a BTreeMap<String, usize>,
    pub editable: &'a [String],
    pub current_user_roles: &'a [String],
}

impl ViewContext<'_> {
    fn user_count(&self, role: &str) -> usize {
        self.user_counts.get(role).copied().unwrap_or(0)
    }
}

/// Role names visible under `view`, in registry order.
///
/// An unknown group yields an empty list.
pub fn filter_roles(view: &RoleView, ctx: &ViewContext<'_>) -> Vec<String> {
    let roles = &ctx.registries.roles;
    match view {
        RoleView::All => roles.names().map(str::to_string).collect(),
        RoleView::Mine => keep(ctx, |name| ctx.current_user_roles.iter().any(|r| r == name)),
        RoleView::Active => active_roles(ctx),
        RoleView::Inactive => inactive_roles(ctx),
        RoleView::Editable => keep(ctx, |name| ctx.editable.iter().any(|r| r == name)),
        RoleView::Uneditable => uneditable_roles(ctx),
        RoleView::Group(group) => match ctx.registries.role_groups.get(group) {
            Some(group) => keep(ctx, |name| group.roles.iter().any(|r| r == name)),
            None => Vec::new(),
        },
    }
}

/// Roles held by at least one user.
pub fn active_roles(ctx: &ViewContext<'_>) -> Vec<String> {
    keep(ctx, |name| ctx.user_count(name) > 0)
}

/// Roles no user holds.
pub fn inactive_roles(ctx: &ViewContext<'_>) -> Vec<String> {
    keep(ctx, |name| ctx.user_count(name) == 0)
}

pub fn uneditable_roles(ctx: &ViewContext<'_>) -> Vec<String> {
    keep(ctx, |name| !ctx.editable.iter().any(|r| r == name))
}

/// Every non-empty view with its role count, in tab order.
///
/// `All` is always listed; groups follow the built-in views.
pub fn view_counts(ctx: &ViewContext<'_>) -> Vec<(RoleView, usize)> {
    let fixed = [
        RoleView::All,
        RoleView::Mine,
        RoleView::Active,
        RoleView::Inactive,
        RoleView::Editable,
        RoleView::Uneditable,
    ];
    let groups = ctx
        .registries
        .role_groups
        .names()
        .map(|name| RoleView::Group(name.to_string()));

    fixed
        .into_iter()
        .chain(groups)
        .map(|view| {
            let count = filter_roles(&view, ctx).len();
            (view, count)
        })
        .filter(|(view, count)| *view == RoleView::All || *count > 0)
        .collect()
}

fn keep(ctx: &ViewContext<'_>, pred: impl Fn(&str) -> bool) -> Vec<String> {
    ctx.registries
        .roles
        .names()
        .filter(|name| pred(*name))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use user_roles_contracts::role::{Role, RoleGroup};

    use super::*;

    fn registries() -> Registries {
        let mut reg = Registries::new();
        for (name, label) in [
            ("administrator", "Administrator"),
            ("editor", "Editor"),
            ("subscriber", "Subscriber"),
            ("shop_manager", "Shop Manager"),
        ] {
            reg.roles.register(name, Role::new(name, label));
        }
        reg.role_groups.register(
            "wordpress",
            RoleGroup::new(
                "wordpress",
                "WordPress",
                vec!["administrator".into(), "editor".into(), "subscriber".into()],
            ),
        );
        reg
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    struct Fixture {
        registries: Registries,
        counts: BTreeMap<String, usize>,
        editable: Vec<String>,
        mine: Vec<String>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                registries: registries(),
                counts: BTreeMap::from([("administrator".to_string(), 1), ("subscriber".to_string(), 4)]),
                editable: strings(&["editor", "subscriber", "shop_manager"]),
                mine: strings(&["administrator"]),
            }
        }

        fn ctx(&self) -> ViewContext<'_> {
            ViewContext {
                registries: &self.registries,
                user_counts: &self.counts,
                editable: &self.editable,
                current_user_roles: &self.mine,
            }
        }
    }

    #[test]
    fn parse_keywords_and_groups() {
        assert_eq!("all".parse::<RoleView>().unwrap(), RoleView::All);
        assert_eq!("uneditable".parse::<RoleView>().unwrap(), RoleView::Uneditable);
        assert_eq!(
            "wordpress".parse::<RoleView>().unwrap(),
            RoleView::Group("wordpress".to_string())
        );
        assert_eq!(RoleView::Group("wordpress".into()).to_string(), "wordpress");
    }

    #[test]
    fn all_keeps_registry_order() {
        let f = Fixture::new();
        assert_eq!(
            filter_roles(&RoleView::All, &f.ctx()),
            strings(&["administrator", "editor", "subscriber", "shop_manager"])
        );
    }

    #[test]
    fn active_and_inactive_partition_roles() {
        let f = Fixture::new();
        assert_eq!(active_roles(&f.ctx()), strings(&["administrator", "subscriber"]));
        assert_eq!(inactive_roles(&f.ctx()), strings(&["editor", "shop_manager"]));
    }

    #[test]
    fn mine_editable_uneditable() {
        let f = Fixture::new();
        assert_eq!(filter_roles(&RoleView::Mine, &f.ctx()), strings(&["administrator"]));
        assert_eq!(
            filter_roles(&RoleView::Editable, &f.ctx()),
            strings(&["editor", "subscriber", "shop_manager"])
        );
        assert_eq!(uneditable_roles(&f.ctx()), strings(&["administrator"]));
    }

    #[test]
    fn group_view_and_unknown_group() {
        let f = Fixture::new();
        assert_eq!(
            filter_roles(&RoleView::Group("wordpress".into()), &f.ctx()),
            strings(&["administrator", "editor", "subscriber"])
        );
        assert!(filter_roles(&RoleView::Group("nope".into()), &f.ctx()).is_empty());
    }

    #[test]
    fn view_counts_skip_empty_views() {
        let mut f = Fixture::new();
        f.mine.clear();
        let counts = view_counts(&f.ctx());

        assert_eq!(counts[0], (RoleView::All, 4));
        assert!(!counts.iter().any(|(view, _)| *view == RoleView::Mine));
        assert!(counts.contains(&(RoleView::Group("wordpress".into()), 3)));
    }
}
