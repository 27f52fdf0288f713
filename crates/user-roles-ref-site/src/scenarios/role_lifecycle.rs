//! Scenario 1: Role Lifecycle
//!
//! Walks a role through the role manager on the stock site:
//!   1. Create `ticket_agent` from a label, with one custom cap
//!   2. Edit `editor`: grant `publish_posts`, keep `delete_posts` denied
//!   3. Prefill a clone of `author`
//!   4. Delete `contributor`: one user keeps `author`, one falls back
//!   5. Try to delete `subscriber`, the default role
//!   6. Dump the event log

use user_roles_audit::InMemoryEventLog;
use user_roles_contracts::{error::UserRolesResult, event::RoleEventKind};
use user_roles_core::{
    traits::RoleStore, CapChange, CapabilitySelection, DeleteOutcome, NewRoleRequest, RoleManager,
};
use user_roles_settings::TomlSettingsStore;

use crate::mock_site::{site_loader, InMemorySite};

/// What the scenario did, for printing and assertions.
#[derive(Debug)]
pub struct LifecycleReport {
    pub created: String,
    pub new_caps: Vec<String>,
    pub editor_changes: Vec<CapChange>,
    pub clone_name: String,
    pub clone_label: String,
    pub contributor_deleted: DeleteOutcome,
    pub default_delete: DeleteOutcome,
    pub events: Vec<(RoleEventKind, String)>,
}

/// Run every step against `site` and return the report.
pub fn execute(site: &InMemorySite) -> UserRolesResult<LifecycleReport> {
    let events = InMemoryEventLog::new();
    let manager = RoleManager::new(
        Box::new(site.clone()),
        Box::new(TomlSettingsStore::default()),
        Box::new(events.clone()),
    );
    let mut registries = manager.load_registries(&site_loader()?)?;

    // ── Step 1: create ───────────────────────────────────────────────────────
    let known_before = RoleManager::known_capabilities(&registries);
    let created = manager.create_role(
        &mut registries,
        NewRoleRequest {
            role: None,
            label: "Ticket Agent".to_string(),
            selection: CapabilitySelection {
                grant: vec!["read".to_string()],
                grant_custom: vec!["Sell Tickets".to_string()],
                ..CapabilitySelection::default()
            },
        },
    )?;
    let new_caps: Vec<String> = created
        .capabilities
        .keys()
        .filter(|cap| !known_before.contains(cap))
        .cloned()
        .collect();

    // ── Step 2: edit ─────────────────────────────────────────────────────────
    // Start from the state the editor scenario assumes: publish_posts missing,
    // delete_posts denied.
    site.remove_cap("editor", "publish_posts")?;
    site.add_cap("editor", "delete_posts", false)?;
    let mut editor_grants: Vec<String> = manager
        .store()
        .get_role("editor")?
        .map(|role| role.granted_caps().map(str::to_string).collect())
        .unwrap_or_default();
    editor_grants.push("publish_posts".to_string());

    let update = manager.edit_role(
        &mut registries,
        "editor",
        &CapabilitySelection {
            grant: editor_grants,
            deny: vec!["delete_posts".to_string()],
            ..CapabilitySelection::default()
        },
    )?;

    // ── Step 3: clone draft ──────────────────────────────────────────────────
    let draft = RoleManager::clone_draft(&registries, "author")?;

    // ── Steps 4 & 5: delete ──────────────────────────────────────────────────
    let contributor_deleted = manager.delete_role(&mut registries, "contributor")?;
    let default_role = manager.settings()?.default_role;
    let default_delete = manager.delete_role(&mut registries, &default_role)?;

    // ── Step 6: events ───────────────────────────────────────────────────────
    let events = events
        .export()?
        .events
        .into_iter()
        .map(|e| (e.kind, e.role))
        .collect();

    Ok(LifecycleReport {
        created: created.name,
        new_caps,
        editor_changes: update.changes,
        clone_name: draft.role,
        clone_label: draft.label,
        contributor_deleted,
        default_delete,
        events,
    })
}

/// Run Scenario 1: Role Lifecycle.
pub fn run_scenario() -> UserRolesResult<()> {
    println!("=== Scenario 1: Role Lifecycle ===");
    println!();

    let site = InMemorySite::stock();
    let report = execute(&site)?;

    println!("  Created role:           {}", report.created);
    println!("  New custom caps:        {}", report.new_caps.join(", "));
    println!("  Editor changes:");
    for change in &report.editor_changes {
        println!("    {:?}", change);
    }
    println!("  Clone draft:            {} ({})", report.clone_name, report.clone_label);
    match &report.contributor_deleted {
        DeleteOutcome::Deleted { reassigned, stripped } => {
            println!(
                "  Deleted contributor:    reassigned {:?}, stripped {:?}",
                reassigned, stripped
            );
        }
        DeleteOutcome::DefaultRoleProtected => println!("  Deleted contributor:    PROTECTED"),
    }
    println!("  Delete default role:    {:?}", report.default_delete);
    println!();
    println!("  Event log ({} event(s)):", report.events.len());
    for (kind, role) in &report.events {
        println!("    {:<8} {}", format!("{:?}", kind), role);
    }
    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}
