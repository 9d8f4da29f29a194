//! The view-state controller.
//!
//! Tracks presentation state coupled to the derived view rather than to any
//! single task: the visible column set (with a non-removable "Name"
//! column), the target group of an in-progress inline task creation, and
//! the task selection set. Typed field setters mediate between the
//! dashboard's pickers and the store's partial update.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::fields::{GroupField, NavContext, Priority};
use crate::group::Group;
use crate::store::{StoreError, TaskStore};
use crate::task::{TaskDraft, TaskPatch, User};

/// The column every layout keeps; it can never be removed.
pub const NAME_COLUMN: &str = "Name";

/// Columns shown until the user customises the layout.
pub const DEFAULT_COLUMNS: [&str; 4] = ["Name", "Assignee", "Due date", "Priority"];

/// Columns offered by the columns menu beyond the defaults.
pub const OPTIONAL_COLUMNS: [&str; 3] = ["Status", "Start date", "Tags"];

/// Ephemeral view state for the list view.
#[derive(Debug, Clone)]
pub struct ViewState {
    active_columns: Vec<String>,
    inline_add_group: Option<String>,
    selected: HashSet<u64>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            active_columns: DEFAULT_COLUMNS.iter().map(|s| s.to_string()).collect(),
            inline_add_group: None,
            selected: HashSet::new(),
        }
    }
}

impl ViewState {
    pub fn columns(&self) -> &[String] {
        &self.active_columns
    }

    pub fn has_column(&self, label: &str) -> bool {
        self.active_columns.iter().any(|c| c == label)
    }

    /// Append a column unless it is already visible.
    pub fn add_column(&mut self, label: &str) {
        if !self.has_column(label) {
            self.active_columns.push(label.to_string());
        }
    }

    /// Remove a column. The "Name" column always stays.
    pub fn remove_column(&mut self, label: &str) {
        if label == NAME_COLUMN {
            return;
        }
        self.active_columns.retain(|c| c != label);
    }

    /// Group key an inline add-task row is currently open under, if any.
    pub fn inline_add_group(&self) -> Option<&str> {
        self.inline_add_group.as_deref()
    }

    /// Open the inline add-task row under a group.
    pub fn begin_inline_add(&mut self, group_key: &str) {
        self.inline_add_group = Some(group_key.to_string());
    }

    /// Close the inline add-task row without creating anything.
    pub fn cancel_inline_add(&mut self) {
        self.inline_add_group = None;
    }

    /// Commit the inline add-task row.
    ///
    /// A blank title is silently discarded: no task is created, no error is
    /// raised, the row just closes. When grouping by status the target
    /// group key becomes the new task's status; under any other grouping
    /// the store default applies. Returns the created task's id.
    pub fn commit_inline_add(
        &mut self,
        store: &mut TaskStore,
        group_by: GroupField,
        context: NavContext,
        title: &str,
    ) -> Option<u64> {
        let target = self.inline_add_group.take()?;
        if title.trim().is_empty() {
            return None;
        }
        let draft = TaskDraft {
            title: title.to_string(),
            status: (group_by == GroupField::Status).then_some(target),
            ..TaskDraft::default()
        };
        store.create(draft, context).ok()
    }

    pub fn selected(&self) -> &HashSet<u64> {
        &self.selected
    }

    pub fn is_selected(&self, id: u64) -> bool {
        self.selected.contains(&id)
    }

    pub fn toggle_selected(&mut self, id: u64) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Add every task in the group to the selection. Already-selected ids
    /// stay selected once.
    pub fn select_all_in_group(&mut self, group: &Group<'_>) {
        self.selected.extend(group.tasks.iter().map(|t| t.id));
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    // Typed field editors, all sugar over the store's partial update.

    pub fn set_assignee(
        &self,
        store: &mut TaskStore,
        id: u64,
        user: User,
    ) -> Result<(), StoreError> {
        store.update(id, TaskPatch::assignee(user)).map(|_| ())
    }

    pub fn set_due_date(
        &self,
        store: &mut TaskStore,
        id: u64,
        date: Option<NaiveDate>,
    ) -> Result<(), StoreError> {
        store.update(id, TaskPatch::due_date(date)).map(|_| ())
    }

    pub fn set_priority(
        &self,
        store: &mut TaskStore,
        id: u64,
        priority: Priority,
    ) -> Result<(), StoreError> {
        store.update(id, TaskPatch::priority(priority)).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupingState;
    use crate::task::builtin_users;

    #[test]
    fn name_column_cannot_be_removed() {
        let mut view = ViewState::default();
        view.remove_column(NAME_COLUMN);
        assert!(view.has_column(NAME_COLUMN));

        view.remove_column("Priority");
        assert!(!view.has_column("Priority"));
    }

    #[test]
    fn add_column_ignores_duplicates_and_preserves_order() {
        let mut view = ViewState::default();
        view.add_column("Tags");
        view.add_column("Tags");
        let tags: Vec<&String> = view.columns().iter().filter(|c| *c == "Tags").collect();
        assert_eq!(tags.len(), 1);
        assert_eq!(view.columns().last().map(|s| s.as_str()), Some("Tags"));
    }

    #[test]
    fn inline_add_commit_assigns_group_status() {
        let mut store = TaskStore::default();
        let mut view = ViewState::default();
        view.begin_inline_add("Blocked");

        let id = view
            .commit_inline_add(
                &mut store,
                GroupField::Status,
                NavContext::Everything,
                "Investigate outage",
            )
            .unwrap();
        assert_eq!(store.get(id).unwrap().status, "Blocked");
        assert!(view.inline_add_group().is_none());
    }

    #[test]
    fn inline_add_blank_title_is_silently_discarded() {
        let mut store = TaskStore::default();
        let mut view = ViewState::default();
        view.begin_inline_add("To Do");

        let result =
            view.commit_inline_add(&mut store, GroupField::Status, NavContext::Everything, "   ");
        assert!(result.is_none());
        assert!(store.is_empty());
        assert!(view.inline_add_group().is_none());
    }

    #[test]
    fn inline_add_under_other_grouping_uses_default_status() {
        let mut store = TaskStore::default();
        let mut view = ViewState::default();
        view.begin_inline_add("Urgent");

        let id = view
            .commit_inline_add(
                &mut store,
                GroupField::Priority,
                NavContext::Everything,
                "New task",
            )
            .unwrap();
        assert_eq!(store.get(id).unwrap().status, "To Do");
    }

    #[test]
    fn select_all_in_group_deduplicates() {
        let mut store = TaskStore::default();
        for title in ["a", "b"] {
            store
                .create(crate::task::TaskDraft::titled(title), NavContext::Everything)
                .unwrap();
        }
        let tasks: Vec<&crate::task::Task> = store.tasks().iter().collect();
        let state = GroupingState::default();
        let groups = state.grouped(&tasks);
        let todo = groups.iter().find(|g| g.key == "To Do").unwrap();

        let mut view = ViewState::default();
        view.toggle_selected(tasks[0].id);
        view.select_all_in_group(todo);
        view.select_all_in_group(todo);
        assert_eq!(view.selected().len(), 2);
    }

    #[test]
    fn typed_setters_mediate_to_update() {
        let mut store = TaskStore::default();
        let id = store
            .create(crate::task::TaskDraft::titled("task"), NavContext::Everything)
            .unwrap();
        let view = ViewState::default();

        let sarah = builtin_users()[1].clone();
        view.set_assignee(&mut store, id, sarah.clone()).unwrap();
        view.set_priority(&mut store, id, Priority::High).unwrap();
        view.set_due_date(&mut store, id, None).unwrap();

        let task = store.get(id).unwrap();
        assert_eq!(task.assignee, sarah);
        assert_eq!(task.priority, Priority::High);
        assert!(task.due_date.is_none());

        assert_eq!(
            view.set_priority(&mut store, 404, Priority::Low),
            Err(StoreError::NotFound(404))
        );
    }
}
