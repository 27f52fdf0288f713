//! # user-roles-audit
//!
//! Role lifecycle event log.
//!
//! [`InMemoryEventLog`] implements
//! [`EventSink`](user_roles_core::traits::EventSink) and records every
//! `Added`, `Updated`, and `Deleted` event the role manager emits, in order.

pub mod log;

pub use log::{EventLog, InMemoryEventLog};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use user_roles_contracts::event::{RoleEvent, RoleEventKind};
    use user_roles_core::traits::EventSink;

    use super::*;

    fn record_all(log: &InMemoryEventLog, events: &[(RoleEventKind, &str)]) -> Vec<RoleEvent> {
        events
            .iter()
            .map(|(kind, role)| {
                let event = RoleEvent::new(*kind, *role);
                log.record(&event).unwrap();
                event
            })
            .collect()
    }

    #[test]
    fn test_events_kept_in_order() {
        let log = InMemoryEventLog::new();
        let recorded = record_all(
            &log,
            &[
                (RoleEventKind::Added, "ticket_agent"),
                (RoleEventKind::Updated, "editor"),
                (RoleEventKind::Deleted, "ticket_agent"),
            ],
        );

        let exported = log.export().unwrap();
        assert_eq!(exported.events, recorded);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_clones_share_the_log() {
        let log = InMemoryEventLog::new();
        let sink: Box<dyn EventSink> = Box::new(log.clone());
        sink.record(&RoleEvent::new(RoleEventKind::Added, "editor")).unwrap();

        assert!(!log.is_empty());
        assert_eq!(log.count(RoleEventKind::Added).unwrap(), 1);
        assert_eq!(log.count(RoleEventKind::Deleted).unwrap(), 0);
    }

    #[test]
    fn test_events_for_role() {
        let log = InMemoryEventLog::new();
        record_all(
            &log,
            &[
                (RoleEventKind::Added, "ticket_agent"),
                (RoleEventKind::Updated, "editor"),
                (RoleEventKind::Updated, "ticket_agent"),
            ],
        );

        let kinds: Vec<RoleEventKind> = log
            .events_for("ticket_agent")
            .unwrap()
            .into_iter()
            .map(|e| e.kind)
            .collect();
        assert_eq!(kinds, vec![RoleEventKind::Added, RoleEventKind::Updated]);
        assert!(log.events_for("ghost").unwrap().is_empty());
    }

    #[test]
    fn test_export_serializes() {
        let log = InMemoryEventLog::new();
        record_all(&log, &[(RoleEventKind::Deleted, "contributor")]);

        let json = log.export().unwrap().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["events"][0]["kind"], "deleted");
        assert_eq!(value["events"][0]["role"], "contributor");
    }
}
