//! Content permission gate.
//!
//! `ContentGate` decides whether a viewer may see a post that has been
//! restricted to a set of roles, and reconciles the restriction when the
//! post's permissions form is saved.
//!
//! Visibility is decided in this order:
//!
//! 1. Feature disabled → visible.
//! 2. No roles on the post → visible.
//! 3. Anonymous viewer → hidden.
//! 4. The post's author, holders of `restrict_content`, and users who can
//!    edit other users' posts of this type → visible.
//! 5. Otherwise visible iff the viewer holds one of the post's roles.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use user_roles_contracts::{
    content::{Post, PostType, Viewer},
    error::UserRolesResult,
    names::{sanitize_role, strip_script_blocks},
    settings::Settings,
};
use user_roles_core::traits::PostMetaStore;

/// Capability that bypasses every content restriction.
pub const RESTRICT_CONTENT_CAP: &str = "restrict_content";

/// The submitted content permissions form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPermissionsForm {
    /// `None` when no role checkbox was submitted at all.
    pub roles: Option<Vec<String>>,
    #[serde(default)]
    pub message: String,
}

/// Flags of the save request the form arrived with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveContext {
    pub autosave: bool,
    pub revision: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Autosaves and revisions never touch permissions.
    Skipped,
}

pub struct ContentGate {
    meta: Box<dyn PostMetaStore>,
    settings: Settings,
}

impl ContentGate {
    pub fn new(meta: Box<dyn PostMetaStore>, settings: Settings) -> Self {
        Self { meta, settings }
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.content_permissions
    }

    /// Whether the permissions form is offered for `post_type`.
    pub fn enabled_for_post_type(post_type: &PostType) -> bool {
        post_type.public && post_type.name != "attachment"
    }

    pub fn can_user_view_post(&self, viewer: &Viewer, post: &Post) -> UserRolesResult<bool> {
        if !self.is_enabled() {
            return Ok(true);
        }

        let roles = self.meta.post_roles(post.id)?;
        if roles.is_empty() {
            return Ok(true);
        }

        let Some(user_id) = viewer.user_id else {
            debug!(post_id = post.id, "anonymous viewer on restricted post");
            return Ok(false);
        };

        if user_id == post.author_id || viewer.can(RESTRICT_CONTENT_CAP) || viewer.can(&post.edit_others_cap) {
            return Ok(true);
        }

        let allowed = viewer.roles.iter().any(|role| roles.contains(role));
        debug!(post_id = post.id, user_id, allowed, "content permission checked");
        Ok(allowed)
    }

    /// The message shown in place of restricted content: the post's own
    /// message, or the site-wide one.
    pub fn error_message(&self, post_id: u64) -> UserRolesResult<String> {
        Ok(self
            .meta
            .access_message(post_id)?
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| self.settings.content_permissions_error.clone()))
    }

    /// `content` when the viewer may see the post, otherwise the error message.
    pub fn filter_content(&self, viewer: &Viewer, post: &Post, content: &str) -> UserRolesResult<String> {
        if self.can_user_view_post(viewer, post)? {
            Ok(content.to_string())
        } else {
            self.error_message(post.id)
        }
    }

    /// Store a submitted permissions form.
    ///
    /// Submitted roles replace the current ones; when no roles were submitted
    /// any existing restriction is removed. A cleared message deletes the
    /// post's message and a changed one replaces it.
    pub fn save_post_permissions(
        &self,
        post_id: u64,
        form: &PostPermissionsForm,
        ctx: SaveContext,
    ) -> UserRolesResult<SaveOutcome> {
        if ctx.autosave || ctx.revision {
            return Ok(SaveOutcome::Skipped);
        }

        match &form.roles {
            Some(roles) => {
                let roles: Vec<String> = roles
                    .iter()
                    .map(|role| sanitize_role(role))
                    .filter(|role| !role.is_empty())
                    .collect();
                info!(post_id, roles = ?roles, "post roles set");
                self.meta.set_post_roles(post_id, &roles)?;
            }
            None => {
                if !self.meta.post_roles(post_id)?.is_empty() {
                    info!(post_id, "post roles cleared");
                    self.meta.delete_post_roles(post_id)?;
                }
            }
        }

        let old_message = self.meta.access_message(post_id)?.unwrap_or_default();
        let new_message = strip_script_blocks(form.message.trim());

        if new_message.is_empty() && !old_message.is_empty() {
            self.meta.delete_access_message(post_id)?;
        } else if new_message != old_message {
            self.meta.set_access_message(post_id, &new_message)?;
        }

        Ok(SaveOutcome::Saved)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::{BTreeMap, BTreeSet},
        sync::{Arc, Mutex},
    };

    use super::*;

    #[derive(Clone, Default)]
    struct MockMeta {
        roles: Arc<Mutex<BTreeMap<u64, Vec<String>>>>,
        messages: Arc<Mutex<BTreeMap<u64, String>>>,
    }

    impl PostMetaStore for MockMeta {
        fn post_roles(&self, post_id: u64) -> UserRolesResult<Vec<String>> {
            Ok(self.roles.lock().unwrap().get(&post_id).cloned().unwrap_or_default())
        }
        fn set_post_roles(&self, post_id: u64, roles: &[String]) -> UserRolesResult<()> {
            self.roles.lock().unwrap().insert(post_id, roles.to_vec());
            Ok(())
        }
        fn delete_post_roles(&self, post_id: u64) -> UserRolesResult<()> {
            self.roles.lock().unwrap().remove(&post_id);
            Ok(())
        }
        fn access_message(&self, post_id: u64) -> UserRolesResult<Option<String>> {
            Ok(self.messages.lock().unwrap().get(&post_id).cloned())
        }
        fn set_access_message(&self, post_id: u64, message: &str) -> UserRolesResult<()> {
            self.messages.lock().unwrap().insert(post_id, message.to_string());
            Ok(())
        }
        fn delete_access_message(&self, post_id: u64) -> UserRolesResult<()> {
            self.messages.lock().unwrap().remove(&post_id);
            Ok(())
        }
    }

    fn post() -> Post {
        Post {
            id: 7,
            author_id: 1,
            post_type: "post".to_string(),
            edit_others_cap: "edit_others_posts".to_string(),
        }
    }

    fn viewer(id: u64, roles: &[&str], caps: &[&str]) -> Viewer {
        Viewer {
            user_id: Some(id),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            capabilities: caps.iter().map(|c| c.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    fn restricted(roles: &[&str]) -> (MockMeta, ContentGate) {
        let meta = MockMeta::default();
        meta.set_post_roles(7, &roles.iter().map(|r| r.to_string()).collect::<Vec<_>>())
            .unwrap();
        let gate = ContentGate::new(Box::new(meta.clone()), Settings::default());
        (meta, gate)
    }

    #[test]
    fn unrestricted_post_is_public() {
        let (_, gate) = restricted(&[]);
        assert!(gate.can_user_view_post(&Viewer::anonymous(), &post()).unwrap());
    }

    #[test]
    fn disabled_feature_shows_everything() {
        let meta = MockMeta::default();
        meta.set_post_roles(7, &["editor".to_string()]).unwrap();
        let settings = Settings { content_permissions: false, ..Settings::default() };
        let gate = ContentGate::new(Box::new(meta), settings);
        assert!(gate.can_user_view_post(&Viewer::anonymous(), &post()).unwrap());
    }

    #[test]
    fn restricted_post_rules() {
        let (_, gate) = restricted(&["editor"]);
        let post = post();

        assert!(!gate.can_user_view_post(&Viewer::anonymous(), &post).unwrap());
        assert!(gate.can_user_view_post(&viewer(1, &["subscriber"], &[]), &post).unwrap());
        assert!(gate.can_user_view_post(&viewer(2, &["editor"], &[]), &post).unwrap());
        assert!(!gate.can_user_view_post(&viewer(3, &["subscriber"], &["read"]), &post).unwrap());
        assert!(gate.can_user_view_post(&viewer(4, &[], &["restrict_content"]), &post).unwrap());
        assert!(gate.can_user_view_post(&viewer(5, &[], &["edit_others_posts"]), &post).unwrap());
    }

    #[test]
    fn filter_content_uses_post_message_first() {
        let (meta, gate) = restricted(&["editor"]);
        let anon = Viewer::anonymous();

        assert_eq!(
            gate.filter_content(&anon, &post(), "secret").unwrap(),
            Settings::default().content_permissions_error
        );

        meta.set_access_message(7, "Editors only.").unwrap();
        assert_eq!(gate.filter_content(&anon, &post(), "secret").unwrap(), "Editors only.");
        assert_eq!(
            gate.filter_content(&viewer(2, &["editor"], &[]), &post(), "secret").unwrap(),
            "secret"
        );
    }

    #[test]
    fn save_sets_and_clears_roles() {
        let (meta, gate) = restricted(&[]);
        let form = PostPermissionsForm {
            roles: Some(vec!["Editor".to_string(), "author".to_string()]),
            message: "  Members only <script>x()</script> ".to_string(),
        };

        assert_eq!(gate.save_post_permissions(7, &form, SaveContext::default()).unwrap(), SaveOutcome::Saved);
        assert_eq!(meta.post_roles(7).unwrap(), vec!["editor".to_string(), "author".to_string()]);
        assert_eq!(meta.access_message(7).unwrap().as_deref(), Some("Members only "));

        gate.save_post_permissions(7, &PostPermissionsForm::default(), SaveContext::default())
            .unwrap();
        assert!(meta.post_roles(7).unwrap().is_empty());
        assert_eq!(meta.access_message(7).unwrap(), None);
    }

    #[test]
    fn autosave_and_revision_skipped() {
        let (meta, gate) = restricted(&["editor"]);
        for ctx in [
            SaveContext { autosave: true, revision: false },
            SaveContext { autosave: false, revision: true },
        ] {
            let outcome = gate.save_post_permissions(7, &PostPermissionsForm::default(), ctx).unwrap();
            assert_eq!(outcome, SaveOutcome::Skipped);
        }
        assert_eq!(meta.post_roles(7).unwrap(), vec!["editor".to_string()]);
    }

    #[test]
    fn form_offered_for_public_non_attachment_types() {
        let mut post_type = PostType {
            name: "post".to_string(),
            label: "Posts".to_string(),
            public: true,
            hierarchical: false,
            menu_icon: None,
            caps: vec![],
        };
        assert!(ContentGate::enabled_for_post_type(&post_type));

        post_type.public = false;
        assert!(!ContentGate::enabled_for_post_type(&post_type));

        post_type.public = true;
        post_type.name = "attachment".to_string();
        assert!(!ContentGate::enabled_for_post_type(&post_type));
    }
}
