//! Scenario 2: Content Permissions
//!
//! Restricts post 10 to editors with a custom message, then renders it for
//! an anonymous visitor, a subscriber, the editor, an author, and the
//! administrator (who holds `restrict_content`). Finally clears the
//! restriction and shows the post is public again.

use user_roles_content::{ContentGate, PostPermissionsForm, SaveContext};
use user_roles_contracts::{
    content::Viewer,
    error::{UserRolesError, UserRolesResult},
    settings::Settings,
};

use crate::mock_site::{stock_posts, InMemorySite};

const POST_BODY: &str = "Quarterly editorial calendar.";

/// One rendered view of the restricted post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendering {
    pub viewer: String,
    pub can_view: bool,
    pub content: String,
}

pub fn execute(site: &InMemorySite) -> UserRolesResult<(Vec<Rendering>, Vec<Rendering>)> {
    let settings = Settings::default();
    let gate = ContentGate::new(Box::new(site.clone()), settings.clone());
    let post = stock_posts()
        .into_iter()
        .find(|post| post.id == 10)
        .ok_or_else(|| UserRolesError::StoreError {
            reason: "post 10 is missing from the stock site".to_string(),
        })?;

    gate.save_post_permissions(
        post.id,
        &PostPermissionsForm {
            roles: Some(vec!["editor".to_string()]),
            message: "This calendar is for the editorial team.".to_string(),
        },
        SaveContext::default(),
    )?;

    let mut viewers = vec![("anonymous".to_string(), Viewer::anonymous())];
    for (label, user_id) in [("sue (subscriber)", 5), ("edna (editor)", 2), ("ann (author)", 3), ("admin", 1)] {
        viewers.push((label.to_string(), site.viewer(user_id, settings.explicit_denied_caps)?));
    }

    let render = |viewers: &[(String, Viewer)]| -> UserRolesResult<Vec<Rendering>> {
        viewers
            .iter()
            .map(|(label, viewer)| -> UserRolesResult<Rendering> {
                Ok(Rendering {
                    viewer: label.clone(),
                    can_view: gate.can_user_view_post(viewer, &post)?,
                    content: gate.filter_content(viewer, &post, POST_BODY)?,
                })
            })
            .collect()
    };

    let restricted = render(viewers.as_slice())?;

    gate.save_post_permissions(post.id, &PostPermissionsForm::default(), SaveContext::default())?;
    let public = render(viewers.as_slice())?;

    Ok((restricted, public))
}

/// Run Scenario 2: Content Permissions.
pub fn run_scenario() -> UserRolesResult<()> {
    println!("=== Scenario 2: Content Permissions ===");
    println!();

    let site = InMemorySite::stock();
    let (restricted, public) = execute(&site)?;

    println!("  Post 10 restricted to: editor");
    for rendering in &restricted {
        println!(
            "    {:<18} {}  {}",
            rendering.viewer,
            if rendering.can_view { "VIEW  " } else { "HIDDEN" },
            rendering.content
        );
    }
    println!();
    println!("  Restriction cleared:");
    for rendering in &public {
        println!("    {:<18} {}", rendering.viewer, if rendering.can_view { "VIEW" } else { "HIDDEN" });
    }
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}
