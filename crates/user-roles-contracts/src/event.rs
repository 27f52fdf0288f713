//! Role lifecycle events.
//!
//! The role manager emits one `RoleEvent` per successful create, update, or
//! delete. Sinks record them in order; nothing reads them back to make
//! decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a recorded event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleEventKind {
    Added,
    Updated,
    Deleted,
}

/// A single role lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEvent {
    pub id: EventId,
    pub kind: RoleEventKind,
    pub role: String,
    pub at: DateTime<Utc>,
}

impl RoleEvent {
    /// Stamp a new event for `role` with a fresh id and the current UTC time.
    pub fn new(kind: RoleEventKind, role: impl Into<String>) -> Self {
        Self {
            id: EventId::new(),
            kind,
            role: role.into(),
            at: Utc::now(),
        }
    }
}
