//! # user-roles-ref-site
//!
//! Reference site for the user-roles role manager.
//!
//! Demonstrates three scenarios against an in-memory site seeded with the
//! stock roles:
//!
//! 1. **Role Lifecycle**: create, edit, clone, and delete roles through the
//!    `RoleManager`, with every change recorded in the event log.
//! 2. **Content Permissions**: restrict a post to a role and render it for
//!    different viewers.
//! 3. **Private Site**: private blog, feed, and REST API gates.
//!
//! All data is hardcoded and fictional.

pub mod mock_site;
pub mod scenarios;
