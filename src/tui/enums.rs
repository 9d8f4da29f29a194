//! Enumerations for TUI state management.
//!
//! The dashboard shows one screen (the grouped list) with at most one
//! overlay on top at a time. Modelling the overlay as a single tagged union
//! rules out the impossible "two pickers open at once" states; every
//! overlay is dismissible with Escape.

/// The single active overlay, if any.
#[derive(Clone, PartialEq)]
pub enum Overlay {
    /// Grouping field picker.
    GroupBy,
    /// Column visibility menu.
    Columns,
    /// Assignee picker for the selected task.
    Assignee,
    /// Due-date prompt for the selected task (ISO date or empty to clear).
    DueDate,
    /// Prompt for a new user-created status name.
    NewStatus,
    /// Prompt renaming the group the cursor is on.
    RenameGroup { key: String },
    /// Task detail panel with the collaborator summary.
    TaskDetail,
    /// Keyboard reference.
    Help,
    /// Quit confirmation.
    ConfirmQuit,
}

/// One row of the flattened list the cursor walks over.
#[derive(Clone, PartialEq)]
pub enum ListRow {
    /// A group header; the index points into the derived group sequence.
    Header(usize),
    /// A task row inside a group.
    Task { group: usize, id: u64 },
    /// The inline add-task row open under a group.
    InlineAdd(usize),
}
