//! Settings validation applied before every save.

use tracing::debug;

use user_roles_contracts::{
    names::{sanitize_role, strip_script_blocks},
    settings::Settings,
};

/// Clean a submitted settings document.
///
/// The two free-text messages lose any `<script>`/`<style>` elements along
/// with their contents. `default_role` is sanitized like a role name and
/// falls back to the stock default when nothing is left.
pub fn validate_settings(mut settings: Settings) -> Settings {
    let content_error = strip_script_blocks(&settings.content_permissions_error);
    if content_error != settings.content_permissions_error {
        debug!("stripped script/style blocks from content permissions error");
    }
    settings.content_permissions_error = content_error;

    let feed_error = strip_script_blocks(&settings.private_feed_error);
    if feed_error != settings.private_feed_error {
        debug!("stripped script/style blocks from private feed error");
    }
    settings.private_feed_error = feed_error;

    let default_role = sanitize_role(&settings.default_role);
    settings.default_role = if default_role.is_empty() {
        Settings::default().default_role
    } else {
        default_role
    };

    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_removed_from_messages() {
        let settings = Settings {
            content_permissions_error: "<p>No.</p><script>alert(1)</script>".to_string(),
            private_feed_error: "Log in<STYLE>p{}</STYLE>.".to_string(),
            ..Settings::default()
        };
        let clean = validate_settings(settings);
        assert_eq!(clean.content_permissions_error, "<p>No.</p>");
        assert_eq!(clean.private_feed_error, "Log in.");
    }

    #[test]
    fn default_role_is_sanitized() {
        let settings = Settings {
            default_role: "Shop Manager".to_string(),
            ..Settings::default()
        };
        assert_eq!(validate_settings(settings).default_role, "shop_manager");

        let settings = Settings {
            default_role: "***".to_string(),
            ..Settings::default()
        };
        assert_eq!(validate_settings(settings).default_role, "subscriber");
    }

    #[test]
    fn defaults_pass_unchanged() {
        assert_eq!(validate_settings(Settings::default()), Settings::default());
    }
}
