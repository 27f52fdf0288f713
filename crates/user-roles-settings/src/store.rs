//! TOML-backed settings store.
//!
//! `TomlSettingsStore` keeps the current `Settings` in memory and, when
//! opened from a file, writes every save back to that file. Keys missing from
//! the document take their default values.

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::{debug, info};

use user_roles_contracts::{
    error::{UserRolesError, UserRolesResult},
    settings::Settings,
};
use user_roles_core::traits::SettingsStore;

use crate::validate::validate_settings;

/// A `SettingsStore` over a TOML document.
///
/// ```rust,ignore
/// use user_roles_settings::TomlSettingsStore;
///
/// let store = TomlSettingsStore::from_file(Path::new("config/user-roles.toml"))?;
/// ```
#[derive(Debug)]
pub struct TomlSettingsStore {
    path: Option<PathBuf>,
    settings: Mutex<Settings>,
}

impl TomlSettingsStore {
    /// An in-memory store holding `settings`.
    pub fn new(settings: Settings) -> Self {
        Self {
            path: None,
            settings: Mutex::new(settings),
        }
    }

    /// Parse `s` as TOML.
    ///
    /// Returns `UserRolesError::ConfigError` if the TOML is malformed or a key
    /// has the wrong type.
    pub fn from_toml_str(s: &str) -> UserRolesResult<Self> {
        Ok(Self::new(parse_settings(s)?))
    }

    /// Read the file at `path`. A missing file yields default settings; the
    /// first save creates it.
    pub fn from_file(path: &Path) -> UserRolesResult<Self> {
        let settings = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(|e| UserRolesError::ConfigError {
                reason: format!("failed to read settings file '{}': {}", path.display(), e),
            })?;
            parse_settings(&contents)?
        } else {
            debug!(path = %path.display(), "settings file not found, using defaults");
            Settings::default()
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            settings: Mutex::new(settings),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The current document serialized as TOML.
    pub fn to_toml_string(&self) -> UserRolesResult<String> {
        let settings = self.load()?;
        toml::to_string_pretty(&settings).map_err(|e| UserRolesError::ConfigError {
            reason: format!("failed to serialize settings: {}", e),
        })
    }

    fn lock(&self) -> UserRolesResult<std::sync::MutexGuard<'_, Settings>> {
        self.settings.lock().map_err(|_| UserRolesError::StoreError {
            reason: "settings lock poisoned".to_string(),
        })
    }
}

impl Default for TomlSettingsStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl SettingsStore for TomlSettingsStore {
    fn load(&self) -> UserRolesResult<Settings> {
        Ok(self.lock()?.clone())
    }

    /// Validate and store `settings`, writing the file when file-backed.
    fn save(&self, settings: &Settings) -> UserRolesResult<()> {
        let settings = validate_settings(settings.clone());

        if let Some(path) = &self.path {
            let contents = toml::to_string_pretty(&settings).map_err(|e| UserRolesError::ConfigError {
                reason: format!("failed to serialize settings: {}", e),
            })?;
            std::fs::write(path, contents).map_err(|e| UserRolesError::StoreError {
                reason: format!("failed to write settings file '{}': {}", path.display(), e),
            })?;
            info!(path = %path.display(), "settings saved");
        }

        *self.lock()? = settings;
        Ok(())
    }
}

fn parse_settings(s: &str) -> UserRolesResult<Settings> {
    toml::from_str(s).map_err(|e| UserRolesError::ConfigError {
        reason: format!("failed to parse settings TOML: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_uses_defaults() {
        let store = TomlSettingsStore::from_toml_str("private_blog = true\ndefault_role = \"author\"\n").unwrap();
        let settings = store.load().unwrap();
        assert!(settings.private_blog);
        assert_eq!(settings.default_role, "author");
        assert!(settings.role_manager);
        assert_eq!(settings.private_feed_error, Settings::default().private_feed_error);
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = TomlSettingsStore::from_toml_str("role_manager = \"yes\"").unwrap_err();
        match err {
            UserRolesError::ConfigError { reason } => assert!(reason.contains("settings TOML")),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn save_validates_in_memory() {
        let store = TomlSettingsStore::default();
        let settings = Settings {
            content_permissions_error: "Nope<script>x()</script>".to_string(),
            ..Settings::default()
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap().content_permissions_error, "Nope");
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user-roles.toml");

        let store = TomlSettingsStore::from_file(&path).unwrap();
        assert_eq!(store.load().unwrap(), Settings::default());

        let settings = Settings {
            private_feed: true,
            multi_roles: false,
            ..Settings::default()
        };
        store.save(&settings).unwrap();

        let reopened = TomlSettingsStore::from_file(&path).unwrap();
        assert_eq!(reopened.load().unwrap(), settings);
        assert_eq!(reopened.path(), Some(path.as_path()));
    }

    #[test]
    fn unreadable_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TomlSettingsStore::from_file(dir.path()).unwrap_err();
        assert!(matches!(err, UserRolesError::ConfigError { .. }));
    }
}
