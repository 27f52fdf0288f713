//! The built-in add-on catalog.

use serde::Deserialize;

use user_roles_contracts::{
    addon::Addon,
    error::{UserRolesError, UserRolesResult},
};

const BUILTIN_ADDONS: &str = include_str!("addons.toml");

#[derive(Debug, Deserialize)]
struct AddonCatalog {
    #[serde(default)]
    addon: Vec<Addon>,
}

/// Parse an add-on catalog document (`[[addon]]` tables).
pub fn parse_addons(s: &str) -> UserRolesResult<Vec<Addon>> {
    let catalog: AddonCatalog = toml::from_str(s).map_err(|e| UserRolesError::ConfigError {
        reason: format!("failed to parse add-on catalog: {}", e),
    })?;
    Ok(catalog.addon)
}

/// The add-ons shipped with the role manager.
pub fn builtin_addons() -> UserRolesResult<Vec<Addon>> {
    parse_addons(BUILTIN_ADDONS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_parses_in_order() {
        let addons = builtin_addons().unwrap();
        assert_eq!(addons.len(), 6);
        assert_eq!(addons[0].name, "user-roles-privacy-caps");
        assert_eq!(addons[5].name, "user-roles-block-permissions");
    }

    #[test]
    fn unreleased_addon_has_no_url() {
        let addons = builtin_addons().unwrap();
        let block = addons.iter().find(|a| a.name == "user-roles-block-permissions").unwrap();
        assert!(block.url.is_empty());
        assert!(block.excerpt.contains("COMING SOON"));
    }

    #[test]
    fn missing_title_is_config_error() {
        let err = parse_addons("[[addon]]\nname = \"x\"\n").unwrap_err();
        assert!(matches!(err, UserRolesError::ConfigError { .. }));
    }

    #[test]
    fn empty_document_is_empty_catalog() {
        assert!(parse_addons("").unwrap().is_empty());
    }
}
