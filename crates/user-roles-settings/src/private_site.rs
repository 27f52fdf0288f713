//! Private site, private feed, and private REST API gates.

use serde::Serialize;
use tracing::debug;

use user_roles_contracts::settings::Settings;

/// The kind of front-end page being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageKind {
    #[default]
    Regular,
    /// Community registration page.
    Register,
    /// Community account activation page.
    Activate,
    /// The shop's "my account" page.
    ShopAccount,
}

impl PageKind {
    /// Pages that stay public on a private site.
    pub fn is_private(self) -> bool {
        matches!(self, Self::Regular)
    }
}

/// Who is asking for what.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub logged_in: bool,
    pub multisite: bool,
    /// The user belongs to the site being visited.
    pub member_of_site: bool,
    pub super_admin: bool,
    pub site_name: String,
    pub page: PageKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    Allow,
    RedirectToLogin,
    /// HTTP 403 with a message naming the site.
    Forbidden { message: String },
}

/// A REST authentication failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestError {
    pub code: String,
    pub message: String,
    pub status: u16,
}

/// Outcome of an earlier REST authentication handler: `None` when no handler
/// has decided yet.
pub type RestAuth = Option<Result<(), RestError>>;

/// Front-end access rules derived from the settings.
#[derive(Debug, Clone)]
pub struct PrivateSite {
    settings: Settings,
}

impl PrivateSite {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn is_private_blog(&self) -> bool {
        self.settings.private_blog
    }

    pub fn is_private_feed(&self) -> bool {
        self.settings.private_feed
    }

    pub fn is_private_rest_api(&self) -> bool {
        self.settings.private_rest_api
    }

    /// Decide a front-end page request.
    ///
    /// On a private blog, a logged-in network user who is neither a member of
    /// this site nor a super admin is refused, and an anonymous visitor to a
    /// private page is sent to the login screen.
    pub fn gate_request(&self, ctx: &RequestContext) -> AccessDecision {
        if !self.is_private_blog() {
            return AccessDecision::Allow;
        }

        if ctx.multisite && ctx.logged_in && !ctx.member_of_site && !ctx.super_admin {
            debug!(site = %ctx.site_name, "network user is not a member of private site");
            return AccessDecision::Forbidden {
                message: format!(
                    "You do not currently have access to the \"{}\" site. If you believe you should have access, please contact your network administrator.",
                    ctx.site_name
                ),
            };
        }

        if !ctx.logged_in && ctx.page.is_private() {
            debug!("anonymous request for private page, redirecting to login");
            return AccessDecision::RedirectToLogin;
        }

        AccessDecision::Allow
    }

    /// Feed content, or the private feed message when feeds are private.
    pub fn filter_feed(&self, content: &str) -> String {
        if self.is_private_feed() {
            self.settings.private_feed_error.clone()
        } else {
            content.to_string()
        }
    }

    /// Refuse anonymous REST requests when the REST API is private and no
    /// earlier handler has decided.
    pub fn authenticate_rest(&self, prior: RestAuth, logged_in: bool) -> RestAuth {
        if prior.is_none() && self.is_private_rest_api() && !logged_in {
            return Some(Err(RestError {
                code: "rest_not_logged_in".to_string(),
                message: "You are not currently logged in.".to_string(),
                status: 401,
            }));
        }
        prior
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn private_site() -> PrivateSite {
        PrivateSite::new(Settings {
            private_blog: true,
            private_feed: true,
            private_rest_api: true,
            ..Settings::default()
        })
    }

    fn anonymous(page: PageKind) -> RequestContext {
        RequestContext {
            site_name: "Docs".to_string(),
            page,
            ..RequestContext::default()
        }
    }

    #[test]
    fn public_site_allows_everyone() {
        let site = PrivateSite::new(Settings::default());
        assert_eq!(site.gate_request(&anonymous(PageKind::Regular)), AccessDecision::Allow);
        assert_eq!(site.filter_feed("post body"), "post body");
        assert_eq!(site.authenticate_rest(None, false), None);
    }

    #[test]
    fn anonymous_redirected_except_public_pages() {
        let site = private_site();
        assert_eq!(site.gate_request(&anonymous(PageKind::Regular)), AccessDecision::RedirectToLogin);
        for page in [PageKind::Register, PageKind::Activate, PageKind::ShopAccount] {
            assert_eq!(site.gate_request(&anonymous(page)), AccessDecision::Allow);
        }
    }

    #[test]
    fn network_non_member_forbidden() {
        let site = private_site();
        let ctx = RequestContext {
            logged_in: true,
            multisite: true,
            site_name: "Docs".to_string(),
            ..RequestContext::default()
        };
        match site.gate_request(&ctx) {
            AccessDecision::Forbidden { message } => assert!(message.contains("\"Docs\" site")),
            other => panic!("expected Forbidden, got {:?}", other),
        }

        let member = RequestContext { member_of_site: true, ..ctx.clone() };
        assert_eq!(site.gate_request(&member), AccessDecision::Allow);

        let admin = RequestContext { super_admin: true, ..ctx };
        assert_eq!(site.gate_request(&admin), AccessDecision::Allow);
    }

    #[test]
    fn private_feed_replaces_content() {
        let site = private_site();
        assert_eq!(
            site.filter_feed("post body"),
            "You must be logged into the site to view this content."
        );
    }

    #[test]
    fn rest_requires_login() {
        let site = private_site();
        let err = site.authenticate_rest(None, false).unwrap().unwrap_err();
        assert_eq!(err.code, "rest_not_logged_in");
        assert_eq!(err.status, 401);

        assert_eq!(site.authenticate_rest(None, true), None);
        assert_eq!(site.authenticate_rest(Some(Ok(())), false), Some(Ok(())));
    }
}
