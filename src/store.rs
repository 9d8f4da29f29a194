//! The task store: canonical in-memory task collection and its mutations.
//!
//! This module owns the authoritative `Vec<Task>` plus the two mutation
//! primitives the dashboard needs, create and partial update, with the
//! status toggle as sugar over update. Rejected mutations leave the
//! collection untouched and report a typed error value; nothing here panics.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::Local;
use thiserror::Error;

use crate::fields::{NavContext, Priority, DEFAULT_STATUS, DONE_STATUS};
use crate::task::{builtin_users, Task, TaskDraft, TaskPatch, User};

/// Errors surfaced by store mutations. Callers render these; they are never
/// thrown across the component boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Task creation with an empty or whitespace-only title.
    #[error("task title must not be empty")]
    Validation,
    /// Update or toggle referencing an id no task carries.
    #[error("no task with id {0}")]
    NotFound(u64),
}

/// In-memory store for the task collection.
///
/// Ids are minted sequentially and never reused (there is no delete
/// operation). New tasks are inserted at the front so the collection reads
/// most-recent-first.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
    default_assignee: User,
}

impl Default for TaskStore {
    fn default() -> Self {
        TaskStore::new(Vec::new())
    }
}

impl TaskStore {
    /// Build a store around an existing collection. Id minting continues
    /// above the highest id already present.
    pub fn new(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let default_assignee = builtin_users().remove(0);
        TaskStore {
            tasks,
            next_id,
            default_assignee,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Get a task by id.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Create a task from a draft, defaulting unset fields.
    ///
    /// The final title must be non-empty after trimming or the operation
    /// fails with `StoreError::Validation` and nothing is applied. Tags
    /// default to the active context's inherited tag when it is a space
    /// view. Returns the freshly minted id.
    pub fn create(&mut self, draft: TaskDraft, context: NavContext) -> Result<u64, StoreError> {
        if draft.title.trim().is_empty() {
            return Err(StoreError::Validation);
        }

        let today = Local::now().date_naive();
        let tags = draft.tags.unwrap_or_else(|| {
            context
                .inherited_tag()
                .map(|tag| vec![tag.to_string()])
                .unwrap_or_default()
        });

        let id = self.next_id;
        self.next_id += 1;

        let task = Task {
            id,
            title: draft.title,
            description: draft.description.unwrap_or_default(),
            status: draft.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            priority: draft.priority.unwrap_or(Priority::Normal),
            assignee: draft.assignee.unwrap_or_else(|| self.default_assignee.clone()),
            start_date: draft.start_date.or(Some(today)),
            due_date: draft.due_date.or(Some(today)),
            tags,
        };

        // Most-recent-first ordering.
        self.tasks.insert(0, task);
        Ok(id)
    }

    /// Merge a partial field map into the task with the given id.
    ///
    /// Fails with `StoreError::NotFound` when no task carries the id;
    /// untouched fields keep their values. Returns the updated task.
    pub fn update(&mut self, id: u64, patch: TaskPatch) -> Result<&Task, StoreError> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let task = &mut self.tasks[idx];
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(assignee) = patch.assignee {
            task.assignee = assignee;
        }
        if let Some(start_date) = patch.start_date {
            task.start_date = start_date;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(tags) = patch.tags {
            task.tags = tags;
        }

        Ok(&self.tasks[idx])
    }

    /// Flip a task between "Complete" and "To Do".
    ///
    /// Anything other than "Complete" becomes "Complete"; "Complete" resets
    /// to "To Do". Fails like `update` on an unknown id.
    pub fn toggle_status(&mut self, id: u64) -> Result<&Task, StoreError> {
        let current = self.get(id).ok_or(StoreError::NotFound(id))?;
        let next = if current.status == DONE_STATUS {
            DEFAULT_STATUS
        } else {
            DONE_STATUS
        };
        self.update(id, TaskPatch::status(next))
    }

    /// Rewrite every occurrence of a literal status value. Returns how many
    /// tasks changed. Used by group rename propagation.
    pub fn rename_status(&mut self, old: &str, new: &str) -> usize {
        let mut changed = 0;
        for task in self.tasks.iter_mut() {
            if task.status == old {
                task.status = new.to_string();
                changed += 1;
            }
        }
        changed
    }
}

/// Truncate a string to a maximum width, adding an ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

/// Read a task collection from a JSON file.
///
/// The file is an inbound snapshot, not a database: unreadable or invalid
/// content warns and yields an empty collection rather than aborting.
pub fn load_collection(path: &Path) -> Vec<Task> {
    if !path.exists() {
        eprintln!("Task file {} not found, starting empty", path.display());
        return Vec::new();
    }
    let mut buf = String::new();
    match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
        Ok(_) => match serde_json::from_str(&buf) {
            Ok(tasks) => tasks,
            Err(e) => {
                eprintln!("Error parsing task file, starting empty: {e}");
                Vec::new()
            }
        },
        Err(e) => {
            eprintln!("Error reading task file, starting empty: {e}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(titles_and_statuses: &[(&str, &str)]) -> TaskStore {
        let mut store = TaskStore::default();
        for (title, status) in titles_and_statuses {
            let draft = TaskDraft {
                title: title.to_string(),
                status: Some(status.to_string()),
                ..TaskDraft::default()
            };
            store.create(draft, NavContext::Everything).unwrap();
        }
        store
    }

    #[test]
    fn create_mints_unique_sequential_ids() {
        let mut store = TaskStore::default();
        let a = store.create(TaskDraft::titled("A"), NavContext::Everything).unwrap();
        let b = store.create(TaskDraft::titled("B"), NavContext::Everything).unwrap();
        let c = store.create(TaskDraft::titled("C"), NavContext::Everything).unwrap();
        assert!(a < b && b < c);
        let mut ids: Vec<u64> = store.tasks().iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn create_minting_continues_above_loaded_ids() {
        let mut seeded = TaskStore::default();
        seeded.create(TaskDraft::titled("old"), NavContext::Everything).unwrap();
        let existing = seeded.tasks().to_vec();
        let top = existing.iter().map(|t| t.id).max().unwrap();

        let mut store = TaskStore::new(existing);
        let fresh = store.create(TaskDraft::titled("new"), NavContext::Everything).unwrap();
        assert!(fresh > top);
    }

    #[test]
    fn create_rejects_empty_and_whitespace_titles() {
        let mut store = TaskStore::default();
        assert_eq!(
            store.create(TaskDraft::titled(""), NavContext::Everything),
            Err(StoreError::Validation)
        );
        assert_eq!(
            store.create(TaskDraft::titled("   "), NavContext::Everything),
            Err(StoreError::Validation)
        );
        assert!(store.is_empty());
    }

    #[test]
    fn create_prepends_and_defaults_fields() {
        let mut store = store_with(&[("first", "To Do")]);
        store.create(TaskDraft::titled("second"), NavContext::Everything).unwrap();

        let tasks = store.tasks();
        assert_eq!(tasks[0].title, "second");
        assert_eq!(tasks[1].title, "first");

        let t = &tasks[0];
        assert_eq!(t.status, "To Do");
        assert_eq!(t.priority, Priority::Normal);
        assert_eq!(t.assignee.name, "Alex Rivera");
        assert!(t.start_date.is_some());
        assert!(t.due_date.is_some());
        assert!(t.tags.is_empty());
    }

    #[test]
    fn create_inherits_space_context_tag() {
        let mut store = TaskStore::default();
        let id = store
            .create(TaskDraft::titled("Ship release"), NavContext::Engineering)
            .unwrap();
        let task = store.get(id).unwrap();
        assert_eq!(task.tags, vec!["Engineering".to_string()]);
        assert_eq!(task.status, "To Do");
        assert_eq!(task.priority, Priority::Normal);
    }

    #[test]
    fn create_keeps_explicit_tags_over_context() {
        let mut store = TaskStore::default();
        let draft = TaskDraft {
            title: "tagged".to_string(),
            tags: Some(vec!["Data Viz".to_string()]),
            ..TaskDraft::default()
        };
        let id = store.create(draft, NavContext::Marketing).unwrap();
        assert_eq!(store.get(id).unwrap().tags, vec!["Data Viz".to_string()]);
    }

    #[test]
    fn update_merges_partial_fields_only() {
        let mut store = store_with(&[("task", "In Progress")]);
        let id = store.tasks()[0].id;
        let before = store.get(id).unwrap().clone();

        let updated = store.update(id, TaskPatch::priority(Priority::Urgent)).unwrap();
        assert_eq!(updated.priority, Priority::Urgent);
        assert_eq!(updated.title, before.title);
        assert_eq!(updated.status, before.status);
        assert_eq!(updated.assignee, before.assignee);
    }

    #[test]
    fn update_unknown_id_fails_and_changes_nothing() {
        let mut store = store_with(&[("task", "To Do")]);
        let snapshot: Vec<String> = store.tasks().iter().map(|t| t.title.clone()).collect();

        let result = store.update(9999, TaskPatch::status("Blocked"));
        assert_eq!(result.unwrap_err(), StoreError::NotFound(9999));
        let after: Vec<String> = store.tasks().iter().map(|t| t.title.clone()).collect();
        assert_eq!(snapshot, after);
        assert_eq!(store.tasks()[0].status, "To Do");
    }

    #[test]
    fn toggle_completes_then_resets_to_default() {
        let mut store = store_with(&[("task", "In Progress")]);
        let id = store.tasks()[0].id;

        assert_eq!(store.toggle_status(id).unwrap().status, "Complete");
        // Lossy round trip: the original "In Progress" is not restored.
        assert_eq!(store.toggle_status(id).unwrap().status, "To Do");
        assert_eq!(store.toggle_status(id).unwrap().status, "Complete");
    }

    #[test]
    fn toggle_unknown_id_fails() {
        let mut store = TaskStore::default();
        assert_eq!(store.toggle_status(7), Err(StoreError::NotFound(7)));
    }

    #[test]
    fn rename_status_rewrites_matching_tasks() {
        let mut store = store_with(&[("a", "Review"), ("b", "Review"), ("c", "To Do")]);
        assert_eq!(store.rename_status("Review", "QA"), 2);
        assert_eq!(
            store.tasks().iter().filter(|t| t.status == "QA").count(),
            2
        );
        assert_eq!(store.rename_status("Review", "QA"), 0);
    }

    #[test]
    fn date_clear_via_double_option() {
        let mut store = store_with(&[("task", "To Do")]);
        let id = store.tasks()[0].id;
        assert!(store.get(id).unwrap().due_date.is_some());

        store.update(id, TaskPatch::due_date(None)).unwrap();
        assert!(store.get(id).unwrap().due_date.is_none());
    }
}
