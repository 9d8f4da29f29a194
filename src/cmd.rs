//! Command implementations for the oasis CLI.

use std::path::PathBuf;

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::config::ThemeName;
use crate::fields::{GroupField, NavContext, SortDirection};
use crate::filter::visible_tasks;
use crate::group::GroupingState;
use crate::store::{truncate, TaskStore};
use crate::task::User;
use crate::tui::run::run_dashboard;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive dashboard (the default).
    Ui,

    /// Print the derived grouped task list and exit.
    List {
        /// Navigation context to scope the list to.
        #[arg(long, value_enum, default_value_t = NavContext::Everything)]
        context: NavContext,

        /// Case-insensitive search over title and assignee name.
        #[arg(long)]
        search: Option<String>,

        /// Field to group tasks by.
        #[arg(long, value_enum, default_value_t = GroupField::Status)]
        group_by: GroupField,

        /// Display direction for the group keys.
        #[arg(long, value_enum, default_value_t = SortDirection::Ascending)]
        direction: SortDirection,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the dashboard.
pub fn cmd_ui(store: TaskStore, me: User, theme: ThemeName, config_dir: Option<PathBuf>) {
    if let Err(e) = run_dashboard(store, me, theme, config_dir) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Print the grouped view to stdout.
pub fn cmd_list(
    store: &TaskStore,
    me: &User,
    context: NavContext,
    search: Option<String>,
    group_by: GroupField,
    direction: SortDirection,
) {
    let query = search.unwrap_or_default();
    let visible = visible_tasks(store.tasks(), context, &query, me);

    if visible.is_empty() {
        println!("No tasks found");
        return;
    }

    let state = GroupingState::with_grouping(group_by, direction);

    for group in state.grouped(&visible) {
        println!("{} ({})", group.key.to_uppercase(), group.tasks.len());
        if group.tasks.is_empty() {
            continue;
        }
        println!(
            "  {:<5} {:<12} {:<38} {:<16} {:<12} {}",
            "ID", "Status", "Title [tags]", "Assignee", "Due", "Priority"
        );
        for task in &group.tasks {
            let tags = if task.tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", task.tags.join(","))
            };
            let due = task
                .due_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:<5} {:<12} {:<38} {:<16} {:<12} {}",
                task.id,
                truncate(&task.status, 12),
                truncate(&format!("{}{}", task.title, tags), 38),
                truncate(&task.assignee.name, 16),
                due,
                task.priority.label()
            );
        }
        println!();
    }
}

/// Print completions for the requested shell to stdout.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;

    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
