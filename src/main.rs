//! # Oasis - Terminal Project-Management Dashboard
//!
//! A single-screen project-management dashboard for the terminal: a grouped,
//! filterable task list with a customisable layout.
//!
//! ## Key Features
//!
//! - **Grouped List View**: Tasks grouped by status, assignee, priority,
//!   first tag, or due date, with a persisted, drag-reorderable status order
//! - **Live Filtering**: Navigation contexts (spaces, My Tasks) plus
//!   free-text search over titles and assignees
//! - **Custom Statuses**: Create, rename, and hide status groups alongside
//!   the built-in workflow
//! - **Customisable Columns**: Toggle list columns; the Name column always
//!   stays
//! - **Session-Local State**: The collection lives in memory; only the
//!   light/dark theme preference persists, under `~/.oasis/`
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the dashboard
//! oasis
//!
//! # Seed the collection from a JSON file
//! oasis --tasks backlog.json
//!
//! # Print the grouped list without the UI
//! oasis list --context engineering --group-by status
//! ```
//!
//! ## Usage Patterns
//!
//! **Terminal-Native Planning**: Oasis brings the grouped list of a web
//! project dashboard into the terminal, without accounts or sync. Open it,
//! rearrange your day, close it.
//!
//! **Scripted Views**: `oasis list` prints the same derived view the
//! dashboard renders, for piping into other tools.

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod config;
pub mod fields;
pub mod filter;
pub mod group;
pub mod store;
pub mod task;
pub mod view_state;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod summary;
}

use cli::{Cli, ThemeArg};
use cmd::*;
use config::{load_theme, oasis_dir, ThemeName};
use store::{load_collection, TaskStore};
use task::{builtin_users, User, DEFAULT_OWNER};

fn main() {
    let cli = Cli::parse();

    // Completions need no state at all.
    if let Some(Commands::Completions { shell }) = &cli.command {
        cmd_completions(*shell);
        return;
    }

    let config_dir = oasis_dir();
    let theme = match cli.theme {
        Some(ThemeArg::Light) => ThemeName::Light,
        Some(ThemeArg::Dark) => ThemeName::Dark,
        None => config_dir
            .as_deref()
            .map(load_theme)
            .unwrap_or(ThemeName::Light),
    };

    let tasks = cli
        .tasks
        .as_deref()
        .map(load_collection)
        .unwrap_or_default();
    let store = TaskStore::new(tasks);

    // The "My Tasks" identity: the workspace owner by default, matched
    // against assignees by id or name.
    let me = match cli.me {
        Some(name) => builtin_users()
            .into_iter()
            .find(|u| u.name == name)
            .unwrap_or_else(|| User::new("0", &name, "", "")),
        None => User::new("0", DEFAULT_OWNER, "Workspace Owner", "augusto@example.com"),
    };

    match cli.command {
        None | Some(Commands::Ui) => cmd_ui(store, me, theme, config_dir),
        Some(Commands::List {
            context,
            search,
            group_by,
            direction,
        }) => cmd_list(&store, &me, context, search, group_by, direction),
        Some(Commands::Completions { .. }) => unreachable!("completions handled above"),
    }
}
