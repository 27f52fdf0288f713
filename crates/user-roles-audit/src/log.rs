//! In-memory implementation of `EventSink`.
//!
//! `InMemoryEventLog` keeps every role event in a `Vec` behind an
//! `Arc<Mutex<_>>`. Clones share the same log, so a caller can hand one clone
//! to the role manager and read events back through another.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use user_roles_contracts::{
    error::{UserRolesError, UserRolesResult},
    event::{RoleEvent, RoleEventKind},
};
use user_roles_core::traits::EventSink;

/// A snapshot of the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    pub events: Vec<RoleEvent>,
    pub exported_at: DateTime<Utc>,
}

impl EventLog {
    pub fn to_json(&self) -> UserRolesResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| UserRolesError::EventWriteFailed {
            reason: format!("failed to serialize event log: {}", e),
        })
    }
}

/// An append-only, in-memory role event log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventLog {
    events: Arc<Mutex<Vec<RoleEvent>>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event recorded so far, in append order.
    pub fn export(&self) -> UserRolesResult<EventLog> {
        Ok(EventLog {
            events: self.lock()?.clone(),
            exported_at: Utc::now(),
        })
    }

    /// Events about `role`, in append order.
    pub fn events_for(&self, role: &str) -> UserRolesResult<Vec<RoleEvent>> {
        Ok(self.lock()?.iter().filter(|e| e.role == role).cloned().collect())
    }

    pub fn count(&self, kind: RoleEventKind) -> UserRolesResult<usize> {
        Ok(self.lock()?.iter().filter(|e| e.kind == kind).count())
    }

    pub fn len(&self) -> usize {
        self.lock().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> UserRolesResult<MutexGuard<'_, Vec<RoleEvent>>> {
        self.events.lock().map_err(|e| UserRolesError::EventWriteFailed {
            reason: format!("event log lock poisoned: {}", e),
        })
    }
}

impl EventSink for InMemoryEventLog {
    /// Append `event`. Duplicate ids are accepted; ids are not checked.
    fn record(&self, event: &RoleEvent) -> UserRolesResult<()> {
        let mut events = self.lock()?;
        events.push(event.clone());
        debug!(
            role = %event.role,
            kind = ?event.kind,
            event_count = events.len(),
            "role event recorded"
        );
        Ok(())
    }
}
