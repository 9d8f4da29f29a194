//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the core pipeline
//! (store, grouping state, view state), handles user input, and renders
//! the grouped list dashboard. The full filter/group/order derivation is
//! recomputed on every relevant state change; nothing is incrementally
//! patched.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::config::{save_theme, ThemeName};
use crate::fields::{GroupField, NavContext, Priority};
use crate::filter::visible_tasks;
use crate::group::{Group, GroupingState};
use crate::store::{truncate, TaskStore};
use crate::task::{builtin_users, Task, User};
use crate::tui::colors::{priority_color, status_color, Theme, ACCENT};
use crate::tui::enums::{ListRow, Overlay};
use crate::tui::input::TextInput;
use crate::tui::summary::{OfflineSummarizer, Summarizer};
use crate::view_state::{ViewState, DEFAULT_COLUMNS, NAME_COLUMN, OPTIONAL_COLUMNS};

/// Main application state for the dashboard.
pub struct App {
    store: TaskStore,
    grouping: GroupingState,
    view: ViewState,
    context: NavContext,
    me: User,
    theme: Theme,
    config_dir: Option<PathBuf>,
    overlay: Option<Overlay>,
    rows: Vec<ListRow>,
    list_state: ListState,
    search: TextInput,
    search_active: bool,
    inline_input: TextInput,
    inline_active: bool,
    prompt_input: TextInput,
    menu_index: usize,
    status_message: String,
    summarizer: OfflineSummarizer,
}

impl App {
    pub fn new(
        store: TaskStore,
        me: User,
        theme: ThemeName,
        config_dir: Option<PathBuf>,
    ) -> Self {
        let mut app = App {
            store,
            grouping: GroupingState::default(),
            view: ViewState::default(),
            context: NavContext::Everything,
            me,
            theme: Theme::from_name(theme),
            config_dir,
            overlay: None,
            rows: Vec::new(),
            list_state: ListState::default(),
            search: TextInput::new(),
            search_active: false,
            inline_input: TextInput::new(),
            inline_active: false,
            prompt_input: TextInput::new(),
            menu_index: 0,
            status_message: String::new(),
            summarizer: OfflineSummarizer,
        };
        app.rebuild_rows();
        app
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    /// Recompute the flattened row list from the derivation pipeline and
    /// clamp the cursor into range.
    fn rebuild_rows(&mut self) {
        let visible = visible_tasks(self.store.tasks(), self.context, &self.search.value, &self.me);
        let groups = self.grouping.grouped(&visible);

        let mut rows = Vec::new();
        for (gi, group) in groups.iter().enumerate() {
            rows.push(ListRow::Header(gi));
            if group.expanded {
                for task in &group.tasks {
                    rows.push(ListRow::Task {
                        group: gi,
                        id: task.id,
                    });
                }
                if self.view.inline_add_group() == Some(group.key.as_str()) {
                    rows.push(ListRow::InlineAdd(gi));
                }
            }
        }
        self.rows = rows;

        let selected = self.list_state.selected().unwrap_or(0);
        if self.rows.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(selected.min(self.rows.len() - 1)));
        }
    }

    fn current_row(&self) -> Option<&ListRow> {
        self.list_state.selected().and_then(|i| self.rows.get(i))
    }

    /// Group key under the cursor: the header itself, or the group a task
    /// or inline row belongs to.
    fn current_group_index(&self) -> Option<usize> {
        match self.current_row()? {
            ListRow::Header(gi) => Some(*gi),
            ListRow::Task { group, .. } => Some(*group),
            ListRow::InlineAdd(gi) => Some(*gi),
        }
    }

    fn current_group_key(&self) -> Option<String> {
        let gi = self.current_group_index()?;
        let visible = visible_tasks(self.store.tasks(), self.context, &self.search.value, &self.me);
        self.grouping
            .display_keys(&visible)
            .into_iter()
            .nth(gi)
    }

    fn current_task_id(&self) -> Option<u64> {
        match self.current_row()? {
            ListRow::Task { id, .. } => Some(*id),
            _ => None,
        }
    }

    fn select_row(&mut self, index: usize) {
        if !self.rows.is_empty() {
            self.list_state.select(Some(index.min(self.rows.len() - 1)));
        }
    }

    fn move_cursor(&mut self, delta: i64) {
        if self.rows.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as i64;
        let next = (current + delta).clamp(0, self.rows.len() as i64 - 1);
        self.list_state.select(Some(next as usize));
    }

    fn cycle_context(&mut self, forward: bool) {
        let all = NavContext::all();
        let idx = all.iter().position(|c| *c == self.context).unwrap_or(0);
        let next = if forward {
            (idx + 1) % all.len()
        } else {
            (idx + all.len() - 1) % all.len()
        };
        self.context = all[next];
        self.set_status_message(format!("Context: {}", self.context.label()));
    }

    fn toggle_theme(&mut self) {
        let next = self.theme.name.toggled();
        self.theme = Theme::from_name(next);
        if let Some(dir) = &self.config_dir {
            save_theme(dir, next);
        }
        self.set_status_message(format!("Theme: {}", next.as_str()));
    }

    /// Move the group under the cursor one slot up or down. Dragging is
    /// only available when grouping by status.
    fn reorder_current_group(&mut self, delta: i64) {
        if self.grouping.group_by != GroupField::Status {
            self.set_status_message("Reordering groups requires grouping by status".to_string());
            return;
        }
        let Some(from) = self.current_group_index() else {
            return;
        };
        let to = from as i64 + delta;
        if to < 0 {
            return;
        }
        let to = to as usize;
        let visible = visible_tasks(self.store.tasks(), self.context, &self.search.value, &self.me);
        let count = self.grouping.display_keys(&visible).len();
        if to >= count {
            return;
        }
        self.grouping.reorder_group(&visible, from, to);
        self.rebuild_rows();
        // Follow the moved header.
        if let Some(pos) = self
            .rows
            .iter()
            .position(|r| *r == ListRow::Header(to))
        {
            self.select_row(pos);
        }
    }

    fn toggle_current_task_status(&mut self) {
        let Some(id) = self.current_task_id() else {
            return;
        };
        match self.store.toggle_status(id) {
            Ok(task) => {
                let msg = format!("\"{}\" → {}", task.title, task.status);
                self.set_status_message(msg);
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
        self.rebuild_rows();
    }

    fn cycle_current_task_priority(&mut self) {
        let Some(id) = self.current_task_id() else {
            return;
        };
        let Some(task) = self.store.get(id) else {
            return;
        };
        let all = Priority::all();
        let idx = all.iter().position(|p| *p == task.priority).unwrap_or(0);
        let next = all[(idx + 1) % all.len()];
        if let Err(e) = self.view.set_priority(&mut self.store, id, next) {
            self.set_status_message(e.to_string());
        } else {
            self.set_status_message(format!("Priority: {}", next.label()));
        }
        self.rebuild_rows();
    }

    fn begin_inline_add(&mut self) {
        let Some(key) = self.current_group_key() else {
            return;
        };
        self.view.begin_inline_add(&key);
        self.inline_input.clear();
        self.inline_active = true;
        self.rebuild_rows();
        if let Some(gi) = self.current_group_index() {
            if let Some(pos) = self.rows.iter().position(|r| *r == ListRow::InlineAdd(gi)) {
                self.select_row(pos);
            }
        }
    }

    fn commit_inline_add(&mut self) {
        let title = self.inline_input.take();
        let created = self.view.commit_inline_add(
            &mut self.store,
            self.grouping.group_by,
            self.context,
            &title,
        );
        self.inline_active = false;
        if created.is_some() {
            self.set_status_message(format!("Added \"{}\"", title.trim()));
        }
        self.rebuild_rows();
    }

    fn cancel_inline_add(&mut self) {
        self.view.cancel_inline_add();
        self.inline_input.clear();
        self.inline_active = false;
        self.rebuild_rows();
    }

    // --- input handling ---------------------------------------------------

    /// Handle one key press. Returns true when the application should quit.
    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        self.status_message.clear();

        if self.overlay.is_some() {
            return self.handle_overlay_key(key);
        }
        if self.search_active {
            self.handle_search_key(key);
            return false;
        }
        if self.inline_active {
            self.handle_inline_key(key);
            return false;
        }
        self.handle_list_key(key, modifiers)
    }

    fn handle_search_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.search.clear();
                self.search_active = false;
            }
            KeyCode::Enter => self.search_active = false,
            KeyCode::Backspace => self.search.backspace(),
            KeyCode::Left => self.search.move_left(),
            KeyCode::Right => self.search.move_right(),
            KeyCode::Char(c) => self.search.insert(c),
            _ => {}
        }
        self.rebuild_rows();
    }

    fn handle_inline_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.cancel_inline_add(),
            KeyCode::Enter => self.commit_inline_add(),
            KeyCode::Backspace => self.inline_input.backspace(),
            KeyCode::Left => self.inline_input.move_left(),
            KeyCode::Right => self.inline_input.move_right(),
            KeyCode::Char(c) => self.inline_input.insert(c),
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyCode, _modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Char('q') => self.overlay = Some(Overlay::ConfirmQuit),
            KeyCode::Char('?') | KeyCode::Char('h') => self.overlay = Some(Overlay::Help),
            KeyCode::Char('/') => self.search_active = true,
            KeyCode::Esc => {
                if !self.search.value.is_empty() {
                    self.search.clear();
                    self.rebuild_rows();
                }
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Enter => match self.current_row() {
                Some(ListRow::Header(_)) => {
                    if let Some(key) = self.current_group_key() {
                        self.grouping.toggle_group(&key);
                        self.rebuild_rows();
                    }
                }
                Some(ListRow::Task { .. }) => self.overlay = Some(Overlay::TaskDetail),
                _ => {}
            },
            KeyCode::Char(' ') => match self.current_row() {
                Some(ListRow::Header(_)) => {
                    if let Some(key) = self.current_group_key() {
                        self.grouping.toggle_group(&key);
                        self.rebuild_rows();
                    }
                }
                Some(ListRow::Task { .. }) => self.toggle_current_task_status(),
                _ => {}
            },
            KeyCode::Char('n') => self.begin_inline_add(),
            KeyCode::Char('N') => {
                self.prompt_input.clear();
                self.overlay = Some(Overlay::NewStatus);
            }
            KeyCode::Char('g') => {
                self.menu_index = GroupField::all()
                    .iter()
                    .position(|f| *f == self.grouping.group_by)
                    .unwrap_or(0);
                self.overlay = Some(Overlay::GroupBy);
            }
            KeyCode::Char('d') => {
                self.grouping.direction = self.grouping.direction.toggled();
                self.set_status_message(format!("Sort: {}", self.grouping.direction.label()));
                self.rebuild_rows();
            }
            KeyCode::Char('c') => {
                let visible =
                    visible_tasks(self.store.tasks(), self.context, &self.search.value, &self.me);
                self.grouping.collapse_all(&visible);
                self.rebuild_rows();
            }
            KeyCode::Char('e') => {
                self.grouping.expand_all();
                self.rebuild_rows();
            }
            KeyCode::Char('J') => self.reorder_current_group(1),
            KeyCode::Char('K') => self.reorder_current_group(-1),
            KeyCode::Char('r') => {
                if self.grouping.group_by == GroupField::Status {
                    if let Some(key) = self.current_group_key() {
                        self.prompt_input.clear();
                        self.overlay = Some(Overlay::RenameGroup { key });
                    }
                } else {
                    self.set_status_message(
                        "Renaming groups requires grouping by status".to_string(),
                    );
                }
            }
            KeyCode::Char('H') => {
                if let Some(key) = self.current_group_key() {
                    self.grouping.hide_group(&key);
                    self.set_status_message(format!("Hid group \"{key}\""));
                    self.rebuild_rows();
                }
            }
            KeyCode::Char('u') => {
                self.grouping.unhide_all();
                self.rebuild_rows();
            }
            KeyCode::Char('C') => {
                self.menu_index = 0;
                self.overlay = Some(Overlay::Columns);
            }
            KeyCode::Char('v') => {
                if let Some(id) = self.current_task_id() {
                    self.view.toggle_selected(id);
                }
            }
            KeyCode::Char('a') => {
                if let Some(gi) = self.current_group_index() {
                    let visible = visible_tasks(
                        self.store.tasks(),
                        self.context,
                        &self.search.value,
                        &self.me,
                    );
                    let groups = self.grouping.grouped(&visible);
                    if let Some(group) = groups.get(gi) {
                        self.view.select_all_in_group(group);
                        let count = self.view.selected().len();
                        let key = group.key.clone();
                        drop(groups);
                        self.set_status_message(format!(
                            "Selected all in \"{key}\" ({count} total)"
                        ));
                    }
                }
            }
            KeyCode::Char('A') => {
                self.view.clear_selection();
                self.set_status_message("Selection cleared".to_string());
            }
            KeyCode::Char('p') => self.cycle_current_task_priority(),
            KeyCode::Char('m') => {
                if self.current_task_id().is_some() {
                    self.menu_index = 0;
                    self.overlay = Some(Overlay::Assignee);
                }
            }
            KeyCode::Char('D') => {
                if self.current_task_id().is_some() {
                    self.prompt_input.clear();
                    self.overlay = Some(Overlay::DueDate);
                }
            }
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char(']') => {
                self.cycle_context(true);
                self.rebuild_rows();
            }
            KeyCode::Char('[') => {
                self.cycle_context(false);
                self.rebuild_rows();
            }
            _ => {}
        }
        false
    }

    /// Handle a key while an overlay is open. Returns true to quit.
    fn handle_overlay_key(&mut self, key: KeyCode) -> bool {
        let Some(overlay) = self.overlay.clone() else {
            return false;
        };
        match overlay {
            Overlay::ConfirmQuit => match key {
                KeyCode::Char('y') | KeyCode::Enter => return true,
                _ => self.overlay = None,
            },
            Overlay::Help | Overlay::TaskDetail => {
                if matches!(key, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                    self.overlay = None;
                }
            }
            Overlay::GroupBy => match key {
                KeyCode::Esc => self.overlay = None,
                KeyCode::Down | KeyCode::Char('j') => {
                    self.menu_index = (self.menu_index + 1) % GroupField::all().len();
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    let len = GroupField::all().len();
                    self.menu_index = (self.menu_index + len - 1) % len;
                }
                KeyCode::Enter => {
                    self.grouping.group_by = GroupField::all()[self.menu_index];
                    self.overlay = None;
                    self.set_status_message(format!(
                        "Group: {}",
                        self.grouping.group_by.label()
                    ));
                    self.rebuild_rows();
                }
                _ => {}
            },
            Overlay::Columns => {
                let labels = column_menu_labels();
                match key {
                    KeyCode::Esc | KeyCode::Enter => self.overlay = None,
                    KeyCode::Down | KeyCode::Char('j') => {
                        self.menu_index = (self.menu_index + 1) % labels.len();
                    }
                    KeyCode::Up | KeyCode::Char('k') => {
                        self.menu_index = (self.menu_index + labels.len() - 1) % labels.len();
                    }
                    KeyCode::Char(' ') => {
                        let label = labels[self.menu_index];
                        if self.view.has_column(label) {
                            self.view.remove_column(label);
                        } else {
                            self.view.add_column(label);
                        }
                        if label == NAME_COLUMN {
                            self.set_status_message(
                                "The Name column cannot be removed".to_string(),
                            );
                        }
                    }
                    _ => {}
                }
            }
            Overlay::Assignee => {
                let users = builtin_users();
                match key {
                    KeyCode::Esc => self.overlay = None,
                    KeyCode::Down | KeyCode::Char('j') => {
                        self.menu_index = (self.menu_index + 1) % users.len();
                    }
                    KeyCode::Up | KeyCode::Char('k') => {
                        self.menu_index = (self.menu_index + users.len() - 1) % users.len();
                    }
                    KeyCode::Enter => {
                        if let Some(id) = self.current_task_id() {
                            let user = users[self.menu_index].clone();
                            let name = user.name.clone();
                            if let Err(e) = self.view.set_assignee(&mut self.store, id, user) {
                                self.set_status_message(e.to_string());
                            } else {
                                self.set_status_message(format!("Assigned to {name}"));
                            }
                        }
                        self.overlay = None;
                        self.rebuild_rows();
                    }
                    _ => {}
                }
            }
            Overlay::DueDate => match key {
                KeyCode::Esc => self.overlay = None,
                KeyCode::Enter => {
                    let value = self.prompt_input.value.trim().to_string();
                    if let Some(id) = self.current_task_id() {
                        if value.is_empty() {
                            let _ = self.view.set_due_date(&mut self.store, id, None);
                            self.set_status_message("Due date cleared".to_string());
                            self.prompt_input.clear();
                            self.overlay = None;
                        } else {
                            match NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
                                Ok(date) => {
                                    let _ =
                                        self.view.set_due_date(&mut self.store, id, Some(date));
                                    self.set_status_message(format!("Due {date}"));
                                    self.prompt_input.clear();
                                    self.overlay = None;
                                }
                                // Keep the typed value so it can be fixed.
                                Err(_) => self.set_status_message(
                                    "Enter a date as YYYY-MM-DD, or leave empty to clear"
                                        .to_string(),
                                ),
                            }
                        }
                    } else {
                        self.overlay = None;
                    }
                    self.rebuild_rows();
                }
                KeyCode::Backspace => self.prompt_input.backspace(),
                KeyCode::Left => self.prompt_input.move_left(),
                KeyCode::Right => self.prompt_input.move_right(),
                KeyCode::Char(c) => self.prompt_input.insert(c),
                _ => {}
            },
            Overlay::NewStatus => match key {
                KeyCode::Esc => self.overlay = None,
                KeyCode::Enter => {
                    let name = self.prompt_input.take();
                    if !name.trim().is_empty() {
                        self.grouping.create_custom_status(&name);
                        self.set_status_message(format!("Created status \"{}\"", name.trim()));
                    }
                    self.overlay = None;
                    self.rebuild_rows();
                }
                KeyCode::Backspace => self.prompt_input.backspace(),
                KeyCode::Left => self.prompt_input.move_left(),
                KeyCode::Right => self.prompt_input.move_right(),
                KeyCode::Char(c) => self.prompt_input.insert(c),
                _ => {}
            },
            Overlay::RenameGroup { key: group_key } => match key {
                KeyCode::Esc => self.overlay = None,
                KeyCode::Enter => {
                    let name = self.prompt_input.take();
                    if !name.trim().is_empty() {
                        self.grouping
                            .rename_status(&mut self.store, &group_key, name.trim());
                        self.set_status_message(format!(
                            "Renamed \"{}\" to \"{}\"",
                            group_key,
                            name.trim()
                        ));
                    }
                    self.overlay = None;
                    self.rebuild_rows();
                }
                KeyCode::Backspace => self.prompt_input.backspace(),
                KeyCode::Left => self.prompt_input.move_left(),
                KeyCode::Right => self.prompt_input.move_right(),
                KeyCode::Char(c) => self.prompt_input.insert(c),
                _ => {}
            },
        }
        false
    }

    // --- rendering --------------------------------------------------------

    fn render(&mut self, f: &mut Frame) {
        self.rebuild_rows();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_list(f, chunks[1]);
        self.render_status_bar(f, chunks[2]);

        match self.overlay.clone() {
            Some(Overlay::GroupBy) => self.render_group_by_menu(f),
            Some(Overlay::Columns) => self.render_columns_menu(f),
            Some(Overlay::Assignee) => self.render_assignee_menu(f),
            Some(Overlay::DueDate) => {
                self.render_prompt(f, "Due date", "YYYY-MM-DD, empty clears")
            }
            Some(Overlay::NewStatus) => self.render_prompt(f, "New status", "Status name"),
            Some(Overlay::RenameGroup { key }) => {
                let title = format!("Rename \"{key}\"");
                self.render_prompt(f, &title, "New name");
            }
            Some(Overlay::TaskDetail) => self.render_task_detail(f),
            Some(Overlay::Help) => self.render_help(f),
            Some(Overlay::ConfirmQuit) => self.render_confirm_quit(f),
            None => {}
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let visible = visible_tasks(self.store.tasks(), self.context, &self.search.value, &self.me);
        let search_display = if self.search_active {
            format!("Search: {}_", self.search.value)
        } else if !self.search.value.is_empty() {
            format!("Search: {}", self.search.value)
        } else {
            "Search: /".to_string()
        };

        let line = Line::from(vec![
            Span::styled("OASIS", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                self.context.label(),
                Style::default().fg(self.theme.fg).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {} tasks", visible.len()),
                Style::default().fg(self.theme.muted),
            ),
            Span::raw("  |  "),
            Span::styled(
                format!(
                    "Group: {} ({})",
                    self.grouping.group_by.label(),
                    self.grouping.direction.label()
                ),
                Style::default().fg(self.theme.muted),
            ),
            Span::raw("  |  "),
            Span::styled(search_display, Style::default().fg(self.theme.muted)),
        ]);

        let header = Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Left);
        f.render_widget(header, area);
    }

    fn render_list(&mut self, f: &mut Frame, area: Rect) {
        let visible = visible_tasks(self.store.tasks(), self.context, &self.search.value, &self.me);

        if visible.is_empty() && self.view.inline_add_group().is_none() {
            let empty = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No tasks found",
                    Style::default().fg(self.theme.fg).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "Try adjusting your search or filters, or press 'n' to add a task.",
                    Style::default().fg(self.theme.muted),
                )),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(empty, area);
            return;
        }

        let groups = self.grouping.grouped(&visible);
        let items: Vec<ListItem> = self
            .rows
            .iter()
            .map(|row| ListItem::new(self.row_line(row, &groups)))
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Tasks ({}/{})",
                visible.len(),
                self.store.len()
            )))
            .highlight_style(
                Style::default()
                    .bg(self.theme.row_highlight_bg)
                    .fg(self.theme.row_highlight_fg),
            );
        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn row_line(&self, row: &ListRow, groups: &[Group<'_>]) -> Line<'static> {
        match row {
            ListRow::Header(gi) => {
                let Some(group) = groups.get(*gi) else {
                    return Line::from("");
                };
                let chevron = if group.expanded { "▾" } else { "▸" };
                let dot_color = if self.grouping.group_by == GroupField::Status {
                    status_color(&group.key)
                } else {
                    ACCENT
                };
                Line::from(vec![
                    Span::styled(
                        format!("{chevron} "),
                        Style::default().fg(self.theme.muted),
                    ),
                    Span::styled("● ", Style::default().fg(dot_color)),
                    Span::styled(
                        group.key.to_uppercase(),
                        Style::default().fg(self.theme.fg).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {}", group.tasks.len()),
                        Style::default().fg(self.theme.muted),
                    ),
                ])
            }
            ListRow::Task { id, .. } => {
                let Some(task) = self.store.get(*id) else {
                    return Line::from("");
                };
                self.task_line(task)
            }
            ListRow::InlineAdd(_) => Line::from(vec![
                Span::styled("    + ", Style::default().fg(ACCENT)),
                Span::styled(
                    format!("{}_", self.inline_input.value),
                    Style::default().fg(self.theme.fg),
                ),
            ]),
        }
    }

    fn task_line(&self, task: &Task) -> Line<'static> {
        let done = task.status == crate::fields::DONE_STATUS;
        let checkbox = if done { "[x]" } else { "[ ]" };
        let marker = if self.view.is_selected(task.id) { "*" } else { " " };

        let base = if done {
            Style::default().fg(self.theme.done)
        } else {
            Style::default().fg(self.theme.fg)
        };

        let mut spans = vec![Span::styled(
            format!("  {marker}{checkbox} "),
            Style::default().fg(self.theme.muted),
        )];

        for column in self.view.columns() {
            let span = match column.as_str() {
                NAME_COLUMN => {
                    let tags = if task.tags.is_empty() {
                        String::new()
                    } else {
                        format!(" [{}]", task.tags.join(","))
                    };
                    Span::styled(
                        format!("{:<38}", truncate(&format!("{}{}", task.title, tags), 38)),
                        base,
                    )
                }
                "Assignee" => Span::styled(
                    format!("{:<16}", truncate(&task.assignee.name, 16)),
                    Style::default().fg(self.theme.muted),
                ),
                "Due date" => Span::styled(
                    format!("{:<12}", date_cell(task.due_date)),
                    Style::default().fg(self.theme.muted),
                ),
                "Start date" => Span::styled(
                    format!("{:<12}", date_cell(task.start_date)),
                    Style::default().fg(self.theme.muted),
                ),
                "Priority" => Span::styled(
                    format!("{:<10}", task.priority.label()),
                    Style::default().fg(priority_color(task.priority)),
                ),
                "Status" => Span::styled(
                    format!("{:<14}", truncate(&task.status, 14)),
                    Style::default().fg(status_color(&task.status)),
                ),
                "Tags" => Span::styled(
                    format!("{:<18}", truncate(&task.tags.join(","), 18)),
                    Style::default().fg(self.theme.muted),
                ),
                _ => Span::raw(""),
            };
            spans.push(span);
        }

        Line::from(spans)
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if self.inline_active {
            "Inline add: type a title, Enter to create, Esc to cancel".to_string()
        } else if self.search_active {
            format!("Search: {} (Enter to apply, Esc to clear)", self.search.value)
        } else {
            let selected = self.view.selected().len();
            if selected > 0 {
                format!("{selected} selected | Press '?' for help")
            } else {
                "Press '?' for help".to_string()
            }
        };
        let bar = Paragraph::new(text)
            .style(Style::default().bg(self.theme.header_bg).fg(self.theme.header_fg));
        f.render_widget(bar, area);
    }

    fn render_menu(&self, f: &mut Frame, title: &str, entries: Vec<Line<'static>>) {
        let area = centered_rect(40, 40, f.area());
        f.render_widget(Clear, area);
        let menu = Paragraph::new(entries)
            .block(Block::default().borders(Borders::ALL).title(title.to_string()));
        f.render_widget(menu, area);
    }

    fn menu_line(&self, index: usize, label: String, note: Option<String>) -> Line<'static> {
        let pointer = if index == self.menu_index { "> " } else { "  " };
        let mut spans = vec![
            Span::styled(pointer.to_string(), Style::default().fg(ACCENT)),
            Span::raw(label),
        ];
        if let Some(note) = note {
            spans.push(Span::styled(
                format!("  {note}"),
                Style::default().fg(self.theme.muted),
            ));
        }
        Line::from(spans)
    }

    fn render_group_by_menu(&self, f: &mut Frame) {
        let entries = GroupField::all()
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let active = if *field == self.grouping.group_by {
                    Some("(current)".to_string())
                } else {
                    None
                };
                self.menu_line(i, field.label().to_string(), active)
            })
            .collect();
        self.render_menu(f, "Group by", entries);
    }

    fn render_columns_menu(&self, f: &mut Frame) {
        let entries = column_menu_labels()
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let mark = if self.view.has_column(label) { "[x]" } else { "[ ]" };
                let note = (*label == NAME_COLUMN).then(|| "(always shown)".to_string());
                self.menu_line(i, format!("{mark} {label}"), note)
            })
            .collect();
        self.render_menu(f, "Columns (Space toggles)", entries);
    }

    fn render_assignee_menu(&self, f: &mut Frame) {
        let entries = builtin_users()
            .iter()
            .enumerate()
            .map(|(i, user)| self.menu_line(i, user.name.clone(), Some(user.role.clone())))
            .collect();
        self.render_menu(f, "Assignee", entries);
    }

    fn render_prompt(&self, f: &mut Frame, title: &str, hint: &str) {
        let area = centered_rect(50, 20, f.area());
        f.render_widget(Clear, area);
        let lines = vec![
            Line::from(format!("{}_", self.prompt_input.value)),
            Line::from(Span::styled(
                hint.to_string(),
                Style::default().fg(self.theme.muted),
            )),
        ];
        let prompt = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title.to_string()));
        f.render_widget(prompt, area);
    }

    fn render_task_detail(&self, f: &mut Frame) {
        let Some(task) = self.current_task_id().and_then(|id| self.store.get(id)) else {
            return;
        };
        let area = centered_rect(70, 70, f.area());
        f.render_widget(Clear, area);

        let muted = Style::default().fg(self.theme.muted);
        let bold = Style::default().fg(self.theme.fg).add_modifier(Modifier::BOLD);
        let mut lines = vec![
            Line::from(Span::styled(task.title.clone(), bold)),
            Line::from(""),
            Line::from(vec![
                Span::styled("Status    ", muted),
                Span::styled(task.status.clone(), Style::default().fg(status_color(&task.status))),
            ]),
            Line::from(vec![
                Span::styled("Priority  ", muted),
                Span::styled(
                    task.priority.label(),
                    Style::default().fg(priority_color(task.priority)),
                ),
            ]),
            Line::from(vec![
                Span::styled("Assignee  ", muted),
                Span::raw(format!("{} ({})", task.assignee.name, task.assignee.role)),
            ]),
            Line::from(vec![
                Span::styled("Start     ", muted),
                Span::raw(date_cell(task.start_date)),
            ]),
            Line::from(vec![
                Span::styled("Due       ", muted),
                Span::raw(date_cell(task.due_date)),
            ]),
            Line::from(vec![
                Span::styled("Tags      ", muted),
                Span::raw(if task.tags.is_empty() {
                    "-".to_string()
                } else {
                    task.tags.join(", ")
                }),
            ]),
        ];
        if !task.description.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(task.description.clone()));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Summary".to_string(), bold)));
        lines.push(Line::from(
            self.summarizer.task_summary(&task.title, &task.description),
        ));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Next steps".to_string(), bold)));
        for step in self.summarizer.next_steps(&task.title).lines() {
            lines.push(Line::from(step.to_string()));
        }

        let detail = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Task"));
        f.render_widget(detail, area);
    }

    fn render_help(&self, f: &mut Frame) {
        let area = centered_rect(60, 80, f.area());
        f.render_widget(Clear, area);
        let entries = [
            ("j/k", "Move between rows"),
            ("Enter", "Toggle group / open task detail"),
            ("Space", "Toggle group / toggle task status"),
            ("/", "Search title or assignee"),
            ("[ ]", "Cycle navigation context"),
            ("g", "Group by field"),
            ("d", "Toggle sort direction"),
            ("J/K", "Move group up/down (status grouping)"),
            ("n", "Add task inline in the current group"),
            ("N", "Create a custom status"),
            ("r", "Rename the current group"),
            ("H", "Hide the current group"),
            ("u", "Unhide all groups"),
            ("c/e", "Collapse / expand all groups"),
            ("v", "Select task"),
            ("a/A", "Select all in group / clear selection"),
            ("p", "Cycle task priority"),
            ("m", "Assign task"),
            ("D", "Edit due date"),
            ("C", "Choose columns"),
            ("t", "Toggle light/dark theme"),
            ("q", "Quit"),
        ];
        let lines: Vec<Line> = entries
            .iter()
            .map(|(keys, what)| {
                Line::from(vec![
                    Span::styled(
                        format!("{keys:<8}"),
                        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(*what),
                ])
            })
            .collect();
        let help = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Help"));
        f.render_widget(help, area);
    }

    fn render_confirm_quit(&self, f: &mut Frame) {
        let area = centered_rect(40, 15, f.area());
        f.render_widget(Clear, area);
        let confirm = Paragraph::new(vec![
            Line::from("Quit oasis? Task changes live only in this session."),
            Line::from(""),
            Line::from(Span::styled(
                "y/Enter to quit, any other key to stay",
                Style::default().fg(self.theme.muted),
            )),
        ])
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Confirm"));
        f.render_widget(confirm, area);
    }

    /// Main event loop: draw, poll, dispatch, until the user quits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if self.handle_key(key.code, key.modifiers) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

fn date_cell(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Centre a rect of the given percentage size inside `r`.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn column_menu_labels() -> Vec<&'static str> {
    let mut labels: Vec<&'static str> = DEFAULT_COLUMNS.to_vec();
    labels.extend(OPTIONAL_COLUMNS);
    labels
}
