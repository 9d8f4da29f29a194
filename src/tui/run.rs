//! Terminal lifecycle for the dashboard.

use std::io;
use std::path::PathBuf;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::config::ThemeName;
use crate::store::TaskStore;
use crate::task::User;
use crate::tui::app::App;

/// Set up the terminal, run the dashboard until quit, and restore the
/// terminal even when the app errors out.
pub fn run_dashboard(
    store: TaskStore,
    me: User,
    theme: ThemeName,
    config_dir: Option<PathBuf>,
) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let mut app = App::new(store, me, theme, config_dir);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
