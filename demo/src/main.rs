//! User Roles Reference Site: Demo CLI
//!
//! Runs the reference scenarios and inspects the stock site's roles.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- role-lifecycle
//!   cargo run -p demo -- content-permissions
//!   cargo run -p demo -- private-site
//!   cargo run -p demo -- list-roles --view active
//!   cargo run -p demo -- cap-tabs editor --json

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use user_roles_contracts::error::{UserRolesError, UserRolesResult};
use user_roles_core::{
    groups::assemble_cap_tabs,
    traits::RoleStore,
    views::{filter_roles, view_counts, RoleView, ViewContext},
};
use user_roles_ref_site::{
    mock_site::{site_loader, InMemorySite},
    scenarios::{content_permissions, private_site, role_lifecycle},
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// User roles reference site demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "User roles reference site demo",
    long_about = "Runs the user roles demo scenarios (role lifecycle, content permissions,\n\
                  private site) and inspects the stock site's roles and capabilities."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all three scenarios in sequence.
    RunAll,
    /// Scenario 1: create, edit, clone, and delete roles.
    RoleLifecycle,
    /// Scenario 2: restrict a post to a role.
    ContentPermissions,
    /// Scenario 3: private blog, feed, and REST API.
    PrivateSite,
    /// List the stock site's roles under a view.
    ListRoles {
        /// all, mine, active, inactive, editable, uneditable, or a role group name.
        #[arg(long, default_value = "all")]
        view: String,
    },
    /// Show the capability editor tabs for a role.
    CapTabs {
        role: String,
        /// Print the tabs as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::RoleLifecycle => role_lifecycle::run_scenario(),
        Command::ContentPermissions => content_permissions::run_scenario(),
        Command::PrivateSite => private_site::run_scenario(),
        Command::ListRoles { view } => list_roles(&view),
        Command::CapTabs { role, json } => cap_tabs(&role, json),
    };

    match result {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all() -> UserRolesResult<()> {
    print_banner();
    role_lifecycle::run_scenario()?;
    content_permissions::run_scenario()?;
    private_site::run_scenario()?;
    println!("All scenarios completed successfully.");
    Ok(())
}

// ── Inspection ────────────────────────────────────────────────────────────────

fn list_roles(view: &str) -> UserRolesResult<()> {
    let site = InMemorySite::stock();
    let registries = site_loader()?.load(&site)?;
    let user_counts = site.role_user_counts()?;
    let editable = site.editable_roles()?;
    let current_user_roles = site
        .user(1)?
        .map(|user| user.roles)
        .unwrap_or_default();

    let ctx = ViewContext {
        registries: &registries,
        user_counts: &user_counts,
        editable: &editable,
        current_user_roles: &current_user_roles,
    };

    let view: RoleView = view.parse().unwrap_or_else(|never| match never {});
    debug!(view = %view, "listing roles");

    let tabs: Vec<String> = view_counts(&ctx)
        .into_iter()
        .map(|(view, count)| format!("{} ({})", view, count))
        .collect();
    println!("Views: {}", tabs.join(" | "));
    println!();
    println!("  {:<16} {:<16} {:>5} {:>8} {:>7}", "ROLE", "LABEL", "USERS", "GRANTED", "DENIED");

    for name in filter_roles(&view, &ctx) {
        let Some(role) = registries.roles.get(&name) else {
            continue;
        };
        println!(
            "  {:<16} {:<16} {:>5} {:>8} {:>7}",
            role.name,
            role.label,
            user_counts.get(&role.name).copied().unwrap_or(0),
            role.granted_count(),
            role.denied_count()
        );
    }
    println!();

    Ok(())
}

fn cap_tabs(role: &str, json: bool) -> UserRolesResult<()> {
    let site = InMemorySite::stock();
    let registries = site_loader()?.load(&site)?;
    let role = registries
        .roles
        .get(role)
        .ok_or_else(|| UserRolesError::RoleNotFound { role: role.to_string() })?;

    let tabs = assemble_cap_tabs(&registries.cap_groups, &registries.caps);

    if json {
        let output = serde_json::to_string_pretty(&tabs.to_json()).map_err(|e| {
            UserRolesError::ConfigError {
                reason: format!("failed to render cap tabs: {}", e),
            }
        })?;
        println!("{}", output);
        return Ok(());
    }

    let controls = tabs.controls(&role.capabilities, &registries.caps, true);
    println!("Capability editor for '{}' ({})", role.name, role.label);
    for section in &tabs.sections {
        let rows: Vec<_> = controls.iter().filter(|c| c.section == section.name).collect();
        let granted = rows.iter().filter(|c| c.granted).count();
        let denied = rows.iter().filter(|c| c.denied).count();
        println!();
        println!("  [{}] {} caps, {} granted, {} denied", section.label, rows.len(), granted, denied);
        for control in rows {
            let state = if control.granted {
                "grant"
            } else if control.denied {
                "deny"
            } else {
                "-"
            };
            println!("    {:<6} {}", state, control.label);
        }
    }
    println!();

    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("User Roles Reference Site");
    println!("=========================");
    println!();
    println!("Role manager pipeline per mutation:");
    println!("  [1] Settings gate: the role manager must be enabled");
    println!("  [2] Validate: sanitize names, reject duplicates and unknown roles");
    println!("  [3] Reconcile: grant / deny / remove per submitted capability");
    println!("  [4] Persist to the role store, then refresh the registries");
    println!("  [5] Record a lifecycle event");
    println!();
}
