//! Enumerations and field vocabulary for the dashboard.
//!
//! This module defines the closed field enumerations (priority, grouping
//! field, sort direction, navigation context) together with the open status
//! vocabulary: the built-in status names, the default persisted group order,
//! and the sentinel group keys used when a task has no tag or no due date.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Built-in status names. The status field itself is an open string so that
/// user-created statuses sit alongside these.
pub const BUILTIN_STATUSES: [&str; 5] = ["To Do", "In Progress", "Review", "Complete", "Blocked"];

/// Status assigned to newly created tasks. Its group is always displayed
/// when grouping by status, even while empty.
pub const DEFAULT_STATUS: &str = "To Do";

/// Terminal-like status toggled by the status checkbox.
pub const DONE_STATUS: &str = "Complete";

/// Default persisted display order for status groups.
pub const DEFAULT_STATUS_ORDER: [&str; 5] =
    ["To Do", "In Progress", "Complete", "Cancelled", "Blocked"];

/// Group key for tasks with an empty tag list.
pub const NO_TAGS_GROUP: &str = "No Tags";

/// Group key for tasks without a due date.
pub const NO_DUE_DATE_GROUP: &str = "No Due Date";

/// Task importance classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Urgent,
    High,
    Normal,
    Low,
    Clear,
}

impl Priority {
    /// Display label, also used as the group key when grouping by priority.
    pub fn label(self) -> &'static str {
        match self {
            Priority::Urgent => "Urgent",
            Priority::High => "High",
            Priority::Normal => "Normal",
            Priority::Low => "Low",
            Priority::Clear => "Clear",
        }
    }

    /// All priorities in picker order.
    pub fn all() -> [Priority; 5] {
        [
            Priority::Urgent,
            Priority::High,
            Priority::Normal,
            Priority::Low,
            Priority::Clear,
        ]
    }
}

/// Field the list view groups tasks by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum GroupField {
    Status,
    Assignee,
    Priority,
    Tags,
    DueDate,
}

impl GroupField {
    pub fn label(self) -> &'static str {
        match self {
            GroupField::Status => "Status",
            GroupField::Assignee => "Assignee",
            GroupField::Priority => "Priority",
            GroupField::Tags => "Tags",
            GroupField::DueDate => "Due date",
        }
    }

    /// All grouping fields in menu order.
    pub fn all() -> [GroupField; 5] {
        [
            GroupField::Status,
            GroupField::Assignee,
            GroupField::Priority,
            GroupField::Tags,
            GroupField::DueDate,
        ]
    }
}

/// Display direction for group keys.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn label(self) -> &'static str {
        match self {
            SortDirection::Ascending => "Ascending",
            SortDirection::Descending => "Descending",
        }
    }

    pub fn toggled(self) -> SortDirection {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Navigation context the dashboard is scoped to.
///
/// Space contexts (Engineering, Design, Marketing, Planner, Teams) narrow
/// the visible tasks by tag membership and stamp their name onto tasks
/// created while active; the remaining contexts pass every task through.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum NavContext {
    Everything,
    Engineering,
    Design,
    Marketing,
    Home,
    Planner,
    Teams,
    MyTasks,
    Pulse,
}

impl NavContext {
    pub fn label(self) -> &'static str {
        match self {
            NavContext::Everything => "Everything",
            NavContext::Engineering => "Engineering",
            NavContext::Design => "Design",
            NavContext::Marketing => "Marketing",
            NavContext::Home => "Home",
            NavContext::Planner => "Planner",
            NavContext::Teams => "Teams",
            NavContext::MyTasks => "My Tasks",
            NavContext::Pulse => "Pulse",
        }
    }

    /// Tag set a task must intersect to be visible in this context, or
    /// `None` when the context does not filter by tags.
    pub fn tag_filter(self) -> Option<&'static [&'static str]> {
        match self {
            NavContext::Engineering => Some(&["Engineering", "Frontend", "AI", "Data Viz"]),
            NavContext::Design => Some(&["Design", "UI/UX"]),
            NavContext::Marketing => Some(&["Marketing"]),
            _ => None,
        }
    }

    /// Tag stamped onto tasks created while this context is active.
    /// The global, home, my-tasks and pulse views stamp nothing.
    pub fn inherited_tag(self) -> Option<&'static str> {
        match self {
            NavContext::Everything
            | NavContext::Home
            | NavContext::MyTasks
            | NavContext::Pulse => None,
            other => Some(other.label()),
        }
    }

    /// All contexts in sidebar order, used for cycling in the dashboard.
    pub fn all() -> [NavContext; 9] {
        [
            NavContext::Everything,
            NavContext::Engineering,
            NavContext::Design,
            NavContext::Marketing,
            NavContext::Home,
            NavContext::Planner,
            NavContext::Teams,
            NavContext::MyTasks,
            NavContext::Pulse,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_contexts_inherit_their_name() {
        assert_eq!(NavContext::Engineering.inherited_tag(), Some("Engineering"));
        assert_eq!(NavContext::Planner.inherited_tag(), Some("Planner"));
        assert_eq!(NavContext::Everything.inherited_tag(), None);
        assert_eq!(NavContext::Home.inherited_tag(), None);
        assert_eq!(NavContext::MyTasks.inherited_tag(), None);
        assert_eq!(NavContext::Pulse.inherited_tag(), None);
    }

    #[test]
    fn only_tag_scoped_contexts_filter() {
        assert!(NavContext::Engineering.tag_filter().is_some());
        assert!(NavContext::Design.tag_filter().is_some());
        assert!(NavContext::Marketing.tag_filter().is_some());
        assert!(NavContext::Everything.tag_filter().is_none());
        assert!(NavContext::Teams.tag_filter().is_none());
    }
}
