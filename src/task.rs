//! Task and user data structures.
//!
//! This module defines the `Task` record the whole dashboard derives from,
//! the `User` value embedded into each task's assignee field, and the
//! partial-field carriers used for creation (`TaskDraft`) and update
//! (`TaskPatch`).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::Priority;

/// A workspace member. Embedded by value into each assigned task; editing a
/// roster entry does not rewrite tasks that already carry a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub email: String,
}

impl User {
    pub fn new(id: &str, name: &str, role: &str, email: &str) -> Self {
        User {
            id: id.to_string(),
            name: name.to_string(),
            avatar: format!("https://picsum.photos/seed/{}/100", id),
            role: role.to_string(),
            email: email.to_string(),
        }
    }
}

/// Built-in workspace roster. The first entry is the default assignee for
/// newly created tasks.
pub fn builtin_users() -> Vec<User> {
    vec![
        User::new("1", "Alex Rivera", "Full Stack Dev", "alex@example.com"),
        User::new("2", "Sarah Chen", "UI/UX Designer", "sarah@example.com"),
        User::new("3", "Marco Silva", "Product Manager", "marco@example.com"),
        User::new("4", "Elena Petrova", "QA Engineer", "elena@example.com"),
    ]
}

/// Display name of the workspace owner, the default "My Tasks" identity.
pub const DEFAULT_OWNER: &str = "Augusto Silva";

/// A unit of work on the dashboard.
///
/// Identity is immutable: `id` is minted at creation and never reused. All
/// other fields are replaceable through partial update. Status is an open
/// string so user-created statuses can live beside the built-in ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: String,
    pub priority: Priority,
    pub assignee: User,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Optional field overrides supplied at creation time. Anything left unset
/// falls back to the store's defaults.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<Priority>,
    pub assignee: Option<User>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
}

impl TaskDraft {
    /// Draft with only a title, everything else defaulted.
    pub fn titled(title: &str) -> Self {
        TaskDraft {
            title: title.to_string(),
            ..TaskDraft::default()
        }
    }
}

/// Partial field map merged into an existing task. `None` leaves the field
/// untouched; due/start dates use a double `Option` so `Some(None)` can
/// clear a date while `None` keeps it.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<Priority>,
    pub assignee: Option<User>,
    pub start_date: Option<Option<NaiveDate>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub tags: Option<Vec<String>>,
}

impl TaskPatch {
    pub fn status(status: &str) -> Self {
        TaskPatch {
            status: Some(status.to_string()),
            ..TaskPatch::default()
        }
    }

    pub fn priority(priority: Priority) -> Self {
        TaskPatch {
            priority: Some(priority),
            ..TaskPatch::default()
        }
    }

    pub fn assignee(user: User) -> Self {
        TaskPatch {
            assignee: Some(user),
            ..TaskPatch::default()
        }
    }

    pub fn due_date(date: Option<NaiveDate>) -> Self {
        TaskPatch {
            due_date: Some(date),
            ..TaskPatch::default()
        }
    }
}
