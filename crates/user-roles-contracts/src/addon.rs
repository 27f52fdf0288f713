//! Add-on catalog entries shown on the settings screen.

use serde::{Deserialize, Serialize};

/// A companion plugin advertised by the role manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addon {
    pub name: String,
    pub title: String,
    /// Empty for add-ons that are announced but not yet released.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub excerpt: String,
}
