//! Scenario 3: Private Site
//!
//! Loads settings that make the blog, its feed, and its REST API private,
//! then runs a set of requests through the `PrivateSite` gates.

use user_roles_contracts::error::UserRolesResult;
use user_roles_core::traits::SettingsStore;
use user_roles_settings::{AccessDecision, PageKind, PrivateSite, RequestContext, TomlSettingsStore};

/// Settings for a private single site.
const PRIVATE_SETTINGS: &str = r#"
private_blog = true
private_feed = true
private_rest_api = true
private_feed_error = "Members only. <script>track()</script>Please log in."
"#;

#[derive(Debug)]
pub struct PrivateSiteReport {
    pub decisions: Vec<(String, AccessDecision)>,
    pub feed: String,
    pub rest_anonymous: Option<String>,
    pub rest_logged_in: Option<String>,
}

pub fn execute() -> UserRolesResult<PrivateSiteReport> {
    let store = TomlSettingsStore::from_toml_str(PRIVATE_SETTINGS)?;
    // Saving runs validation, which strips the script block from the message.
    store.save(&store.load()?)?;
    let gate = PrivateSite::new(store.load()?);

    let base = RequestContext {
        site_name: "Field Notes".to_string(),
        ..RequestContext::default()
    };
    let requests = [
        ("anonymous, front page", base.clone()),
        (
            "anonymous, register page",
            RequestContext { page: PageKind::Register, ..base.clone() },
        ),
        ("logged-in member", RequestContext { logged_in: true, member_of_site: true, ..base.clone() }),
        (
            "network user, not a member",
            RequestContext { logged_in: true, multisite: true, ..base.clone() },
        ),
        (
            "network super admin",
            RequestContext { logged_in: true, multisite: true, super_admin: true, ..base },
        ),
    ];

    let decisions = requests
        .into_iter()
        .map(|(label, ctx)| (label.to_string(), gate.gate_request(&ctx)))
        .collect();

    let rest_code = |logged_in: bool| {
        gate.authenticate_rest(None, logged_in)
            .and_then(|result| result.err())
            .map(|err| format!("{} ({})", err.code, err.status))
    };

    Ok(PrivateSiteReport {
        decisions,
        feed: gate.filter_feed("Latest field notes..."),
        rest_anonymous: rest_code(false),
        rest_logged_in: rest_code(true),
    })
}

/// Run Scenario 3: Private Site.
pub fn run_scenario() -> UserRolesResult<()> {
    println!("=== Scenario 3: Private Site ===");
    println!();

    let report = execute()?;

    for (label, decision) in &report.decisions {
        let shown = match decision {
            AccessDecision::Allow => "ALLOW".to_string(),
            AccessDecision::RedirectToLogin => "REDIRECT TO LOGIN".to_string(),
            AccessDecision::Forbidden { message } => format!("FORBIDDEN: {}", message),
        };
        println!("  {:<28} {}", label, shown);
    }
    println!();
    println!("  Feed content:           {}", report.feed);
    println!(
        "  REST, anonymous:        {}",
        report.rest_anonymous.as_deref().unwrap_or("allowed")
    );
    println!(
        "  REST, logged in:        {}",
        report.rest_logged_in.as_deref().unwrap_or("allowed")
    );
    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_site_decisions() {
        let report = execute().unwrap();
        let decisions: Vec<&AccessDecision> = report.decisions.iter().map(|(_, d)| d).collect();

        assert_eq!(decisions[0], &AccessDecision::RedirectToLogin);
        assert_eq!(decisions[1], &AccessDecision::Allow);
        assert_eq!(decisions[2], &AccessDecision::Allow);
        match decisions[3] {
            AccessDecision::Forbidden { message } => assert!(message.contains("Field Notes")),
            other => panic!("expected Forbidden, got {:?}", other),
        }
        assert_eq!(decisions[4], &AccessDecision::Allow);
    }

    #[test]
    fn test_private_feed_and_rest() {
        let report = execute().unwrap();
        assert_eq!(report.feed, "Members only. Please log in.");
        assert_eq!(report.rest_anonymous.as_deref(), Some("rest_not_logged_in (401)"));
        assert_eq!(report.rest_logged_in, None);
    }
}
