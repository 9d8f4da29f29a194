//! The grouping and ordering engine.
//!
//! Partitions the filtered task list into named groups keyed by a selected
//! field, computes a stable display order for the group keys, and carries
//! the group-coupled view state: the persisted status order, user-created
//! statuses, hidden keys, and per-group collapse flags.
//!
//! Status is the only field with an independently persisted, manually
//! reorderable order. Keys present in `status_order` always display ahead
//! of keys that are not, in both sort directions; absent keys fall back to
//! lexicographic comparison among themselves.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::fields::{
    GroupField, SortDirection, BUILTIN_STATUSES, DEFAULT_STATUS, DEFAULT_STATUS_ORDER,
    NO_DUE_DATE_GROUP, NO_TAGS_GROUP,
};
use crate::store::TaskStore;
use crate::task::Task;

/// One displayed bucket of tasks. Hidden groups are already excluded from
/// the derived view, so no hidden flag travels with it.
#[derive(Debug)]
pub struct Group<'a> {
    pub key: String,
    pub tasks: Vec<&'a Task>,
    pub expanded: bool,
}

/// Grouping key of a task under the given field.
pub fn group_key(task: &Task, field: GroupField) -> String {
    match field {
        GroupField::Status => task.status.clone(),
        GroupField::Assignee => task.assignee.name.clone(),
        GroupField::Priority => task.priority.label().to_string(),
        GroupField::Tags => task
            .tags
            .first()
            .cloned()
            .unwrap_or_else(|| NO_TAGS_GROUP.to_string()),
        GroupField::DueDate => task
            .due_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| NO_DUE_DATE_GROUP.to_string()),
    }
}

/// Case-insensitive lexicographic comparison with a stable tie-break.
fn lex(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Grouping state for the list view.
#[derive(Debug, Clone)]
pub struct GroupingState {
    pub group_by: GroupField,
    pub direction: SortDirection,
    status_order: Vec<String>,
    custom_statuses: Vec<String>,
    hidden: HashSet<String>,
    collapsed: HashSet<String>,
}

impl Default for GroupingState {
    fn default() -> Self {
        GroupingState {
            group_by: GroupField::Status,
            direction: SortDirection::Ascending,
            status_order: DEFAULT_STATUS_ORDER.iter().map(|s| s.to_string()).collect(),
            custom_statuses: Vec::new(),
            hidden: HashSet::new(),
            collapsed: HashSet::new(),
        }
    }
}

impl GroupingState {
    /// Default state with an explicit grouping field and direction.
    pub fn with_grouping(group_by: GroupField, direction: SortDirection) -> Self {
        GroupingState {
            group_by,
            direction,
            ..GroupingState::default()
        }
    }

    pub fn status_order(&self) -> &[String] {
        &self.status_order
    }

    pub fn custom_statuses(&self) -> &[String] {
        &self.custom_statuses
    }

    pub fn is_hidden(&self, key: &str) -> bool {
        self.hidden.contains(key)
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        // Groups default to expanded on first encounter.
        !self.collapsed.contains(key)
    }

    fn is_custom(&self, key: &str) -> bool {
        self.custom_statuses.iter().any(|s| s == key)
    }

    /// Bucket tasks by the active grouping field, preserving the incoming
    /// task order within each bucket and first-encounter order of buckets.
    fn buckets<'a>(&self, tasks: &[&'a Task]) -> Vec<(String, Vec<&'a Task>)> {
        let mut out: Vec<(String, Vec<&'a Task>)> = Vec::new();
        for &task in tasks {
            let key = group_key(task, self.group_by);
            match out.iter_mut().find(|(k, _)| *k == key) {
                Some((_, bucket)) => bucket.push(task),
                None => out.push((key, vec![task])),
            }
        }
        out
    }

    /// Comparator for status group keys: keys found in the persisted order
    /// sort before keys that are not, in both directions; index order among
    /// the former, lexicographic among the latter, each reversed when
    /// descending.
    fn compare_status_keys(&self, a: &str, b: &str) -> Ordering {
        let pos_a = self.status_order.iter().position(|s| s == a);
        let pos_b = self.status_order.iter().position(|s| s == b);
        match (pos_a, pos_b) {
            (Some(i), Some(j)) => self.directed(i.cmp(&j)),
            // Ordered keys lead in both directions.
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.directed(lex(a, b)),
        }
    }

    fn directed(&self, ord: Ordering) -> Ordering {
        match self.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }

    /// The ordered sequence of group keys the view displays for `tasks`.
    ///
    /// For status grouping this is the union of occupied keys, the built-in
    /// enumeration, custom statuses and the persisted order, minus empty
    /// groups that are neither the default bucket nor custom, minus hidden
    /// keys. For every other field only occupied, non-hidden keys display,
    /// in lexicographic order.
    pub fn display_keys(&self, tasks: &[&Task]) -> Vec<String> {
        let buckets = self.buckets(tasks);
        let occupied: HashSet<&str> = buckets.iter().map(|(k, _)| k.as_str()).collect();

        let mut keys: Vec<String> = Vec::new();
        let mut push_unique = |keys: &mut Vec<String>, key: &str| {
            if !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        };

        match self.group_by {
            GroupField::Status => {
                for (key, _) in &buckets {
                    push_unique(&mut keys, key);
                }
                for key in BUILTIN_STATUSES {
                    push_unique(&mut keys, key);
                }
                for key in &self.custom_statuses {
                    push_unique(&mut keys, key);
                }
                for key in &self.status_order {
                    push_unique(&mut keys, key);
                }
                keys.retain(|key| {
                    occupied.contains(key.as_str())
                        || key == DEFAULT_STATUS
                        || self.is_custom(key)
                });
                keys.sort_by(|a, b| self.compare_status_keys(a, b));
            }
            _ => {
                for (key, _) in &buckets {
                    push_unique(&mut keys, key);
                }
                keys.sort_by(|a, b| self.directed(lex(a, b)));
            }
        }

        keys.retain(|key| !self.hidden.contains(key));
        keys
    }

    /// Derive the full grouped view: ordered `(key, tasks, expanded)`
    /// buckets ready for rendering. Recomputed in full on every relevant
    /// state change.
    pub fn grouped<'a>(&self, tasks: &[&'a Task]) -> Vec<Group<'a>> {
        let mut buckets = self.buckets(tasks);
        self.display_keys(tasks)
            .into_iter()
            .map(|key| {
                let members = buckets
                    .iter_mut()
                    .find(|(k, _)| *k == key)
                    .map(|(_, b)| std::mem::take(b))
                    .unwrap_or_default();
                let expanded = self.is_expanded(&key);
                Group {
                    key,
                    tasks: members,
                    expanded,
                }
            })
            .collect()
    }

    /// Move the group at display position `from` to display position `to`.
    ///
    /// The persisted `status_order` is rewritten by removing the moved key
    /// and reinserting it before the next visible neighbour that is present
    /// in the persisted order, or at the end when the group was dropped
    /// last. Only meaningful when grouping by status; a no-op otherwise and
    /// for out-of-range or equal indices.
    pub fn reorder_group(&mut self, tasks: &[&Task], from: usize, to: usize) {
        if self.group_by != GroupField::Status || from == to {
            return;
        }
        let mut keys = self.display_keys(tasks);
        if from >= keys.len() || to >= keys.len() {
            return;
        }

        let moved = keys.remove(from);
        keys.insert(to, moved.clone());

        self.status_order.retain(|s| *s != moved);
        let anchor = keys[to + 1..]
            .iter()
            .find_map(|key| self.status_order.iter().position(|s| s == key));
        match anchor {
            Some(pos) => self.status_order.insert(pos, moved),
            None => self.status_order.push(moved),
        }
    }

    /// Register a user-created status. Appends to the custom list and the
    /// persisted order when not already present; the new group starts empty
    /// and expanded.
    pub fn create_custom_status(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        if !self.is_custom(name) && !BUILTIN_STATUSES.contains(&name) {
            self.custom_statuses.push(name.to_string());
        }
        if !self.status_order.iter().any(|s| s == name) {
            self.status_order.push(name.to_string());
        }
    }

    /// Rename a status group, propagating the new name everywhere the old
    /// one occurs: member tasks' status fields, the persisted order, the
    /// hidden set, the collapse set and the custom-status list.
    pub fn rename_status(&mut self, store: &mut TaskStore, old: &str, new: &str) {
        let new = new.trim();
        if new.is_empty() || new == old {
            return;
        }

        store.rename_status(old, new);

        for slot in self.status_order.iter_mut().filter(|s| *s == old) {
            *slot = new.to_string();
        }
        if let Some(slot) = self.custom_statuses.iter_mut().find(|s| *s == old) {
            *slot = new.to_string();
        } else if !BUILTIN_STATUSES.contains(&new) {
            // Keep the renamed group alive while empty, like any other
            // user-named status.
            self.custom_statuses.push(new.to_string());
        }
        if self.hidden.remove(old) {
            self.hidden.insert(new.to_string());
        }
        if self.collapsed.remove(old) {
            self.collapsed.insert(new.to_string());
        }
    }

    /// Hide a group key. Unknown keys are simply absent from future output.
    pub fn hide_group(&mut self, key: &str) {
        self.hidden.insert(key.to_string());
    }

    /// Remove every key from the hidden set.
    pub fn unhide_all(&mut self) {
        self.hidden.clear();
    }

    /// Flip a single group between expanded and collapsed.
    pub fn toggle_group(&mut self, key: &str) {
        if !self.collapsed.remove(key) {
            self.collapsed.insert(key.to_string());
        }
    }

    /// Collapse every currently displayed group in one operation.
    pub fn collapse_all(&mut self, tasks: &[&Task]) {
        for key in self.display_keys(tasks) {
            self.collapsed.insert(key);
        }
    }

    /// Expand every group again.
    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{NavContext, Priority};
    use crate::task::{builtin_users, TaskDraft};
    use chrono::NaiveDate;

    fn store_with_statuses(pairs: &[(&str, &str)]) -> TaskStore {
        let mut store = TaskStore::default();
        // Insert in reverse so the store's front-insertion yields the
        // listed order.
        for (title, status) in pairs.iter().rev() {
            let draft = TaskDraft {
                title: title.to_string(),
                status: Some(status.to_string()),
                ..TaskDraft::default()
            };
            store.create(draft, NavContext::Everything).unwrap();
        }
        store
    }

    fn refs(store: &TaskStore) -> Vec<&Task> {
        store.tasks().iter().collect()
    }

    #[test]
    fn status_grouping_scenario_with_default_order() {
        let store = store_with_statuses(&[("A", "To Do"), ("B", "Complete")]);
        let state = GroupingState::default();
        let groups = state.grouped(&refs(&store));

        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["To Do", "Complete"]);
        assert_eq!(groups[0].tasks.len(), 1);
        assert_eq!(groups[0].tasks[0].title, "A");
        assert_eq!(groups[1].tasks[0].title, "B");
    }

    #[test]
    fn empty_collection_shows_default_and_custom_groups_only() {
        let store = TaskStore::default();
        let mut state = GroupingState::default();
        assert_eq!(state.display_keys(&refs(&store)), vec!["To Do"]);

        state.create_custom_status("QA");
        let keys = state.display_keys(&refs(&store));
        assert_eq!(keys, vec!["To Do", "QA"]);
        assert!(state.is_expanded("QA"));
    }

    #[test]
    fn empty_builtin_non_default_groups_are_suppressed() {
        let store = store_with_statuses(&[("A", "Review")]);
        let state = GroupingState::default();
        let keys = state.display_keys(&refs(&store));
        // Review is occupied; To Do always shows; the rest are empty
        // built-ins or order entries and disappear. Review is absent from
        // the persisted order so it trails To Do.
        assert_eq!(keys, vec!["To Do", "Review"]);
    }

    #[test]
    fn keys_outside_status_order_trail_lexicographically() {
        let store = store_with_statuses(&[
            ("a", "Triage"),
            ("b", "Complete"),
            ("c", "Alpha"),
            ("d", "To Do"),
        ]);
        let state = GroupingState::default();
        let keys = state.display_keys(&refs(&store));
        assert_eq!(keys, vec!["To Do", "Complete", "Alpha", "Triage"]);
    }

    #[test]
    fn descending_flips_within_classes_but_ordered_keys_stay_first() {
        let store = store_with_statuses(&[
            ("a", "Triage"),
            ("b", "Complete"),
            ("c", "Alpha"),
            ("d", "To Do"),
        ]);
        let mut state = GroupingState::default();
        state.direction = SortDirection::Descending;
        let keys = state.display_keys(&refs(&store));
        assert_eq!(keys, vec!["Complete", "To Do", "Triage", "Alpha"]);
    }

    #[test]
    fn tasks_keep_insertion_order_within_buckets() {
        let store = store_with_statuses(&[("x", "To Do"), ("y", "To Do"), ("z", "To Do")]);
        let state = GroupingState::default();
        let groups = state.grouped(&refs(&store));
        let titles: Vec<&str> = groups[0].tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["x", "y", "z"]);
    }

    #[test]
    fn reorder_anchors_moved_key_before_its_successor() {
        let store = store_with_statuses(&[
            ("a", "To Do"),
            ("b", "Complete"),
            ("c", "Blocked"),
        ]);
        let mut state = GroupingState::default();
        let tasks = refs(&store);
        assert_eq!(
            state.display_keys(&tasks),
            vec!["To Do", "Complete", "Blocked"]
        );

        // Drag Blocked (index 2) up to index 1; its successor in the new
        // sequence is Complete.
        state.reorder_group(&tasks, 2, 1);
        assert_eq!(
            state.display_keys(&tasks),
            vec!["To Do", "Blocked", "Complete"]
        );
        // The persisted order keeps its suppressed entries; the moved key's
        // absolute index there differs from its display index.
        assert_eq!(
            state.status_order(),
            &["To Do", "In Progress", "Blocked", "Complete", "Cancelled"]
        );
    }

    #[test]
    fn reorder_to_last_appends_to_persisted_order() {
        let store = store_with_statuses(&[("a", "To Do"), ("b", "Complete")]);
        let mut state = GroupingState::default();
        let tasks = refs(&store);

        state.reorder_group(&tasks, 0, 1);
        assert_eq!(state.display_keys(&tasks), vec!["Complete", "To Do"]);
        assert_eq!(
            state.status_order(),
            &["In Progress", "Complete", "Cancelled", "Blocked", "To Do"]
        );
    }

    #[test]
    fn reorder_persists_keys_that_were_not_yet_in_the_order() {
        let store = store_with_statuses(&[("a", "To Do"), ("b", "QA")]);
        let mut state = GroupingState::default();
        let tasks = refs(&store);
        assert_eq!(state.display_keys(&tasks), vec!["To Do", "QA"]);

        state.reorder_group(&tasks, 1, 0);
        assert_eq!(state.display_keys(&tasks), vec!["QA", "To Do"]);
        assert_eq!(state.status_order()[0], "QA");
    }

    #[test]
    fn reorder_is_a_no_op_for_equal_indices_and_other_fields() {
        let store = store_with_statuses(&[("a", "To Do"), ("b", "Complete")]);
        let mut state = GroupingState::default();
        let tasks = refs(&store);
        let before = state.status_order().to_vec();

        state.reorder_group(&tasks, 1, 1);
        assert_eq!(state.status_order(), &before[..]);

        state.group_by = GroupField::Priority;
        state.reorder_group(&tasks, 0, 1);
        assert_eq!(state.status_order(), &before[..]);
    }

    #[test]
    fn hidden_groups_never_display() {
        let store = store_with_statuses(&[("a", "To Do"), ("b", "Complete")]);
        let mut state = GroupingState::default();
        state.hide_group("Complete");
        assert_eq!(state.display_keys(&refs(&store)), vec!["To Do"]);

        state.unhide_all();
        assert_eq!(
            state.display_keys(&refs(&store)),
            vec!["To Do", "Complete"]
        );
    }

    #[test]
    fn collapse_all_then_new_groups_default_expanded() {
        let mut store = store_with_statuses(&[("a", "To Do"), ("b", "Complete")]);
        let mut state = GroupingState::default();
        state.collapse_all(&refs(&store));
        assert!(!state.is_expanded("To Do"));
        assert!(!state.is_expanded("Complete"));

        let draft = TaskDraft {
            title: "c".to_string(),
            status: Some("Review".to_string()),
            ..TaskDraft::default()
        };
        store.create(draft, NavContext::Everything).unwrap();
        let groups = state.grouped(&refs(&store));
        let review = groups.iter().find(|g| g.key == "Review").unwrap();
        assert!(review.expanded);

        state.toggle_group("To Do");
        assert!(state.is_expanded("To Do"));
    }

    #[test]
    fn rename_propagates_to_tasks_order_and_flag_sets() {
        let mut store = store_with_statuses(&[("a", "In Progress"), ("b", "In Progress")]);
        let mut state = GroupingState::default();
        state.toggle_group("In Progress");
        state.hide_group("In Progress");

        state.rename_status(&mut store, "In Progress", "Doing");

        assert!(store.tasks().iter().all(|t| t.status != "In Progress"));
        assert_eq!(
            store.tasks().iter().filter(|t| t.status == "Doing").count(),
            2
        );
        assert!(state.status_order().iter().any(|s| s == "Doing"));
        assert!(!state.status_order().iter().any(|s| s == "In Progress"));
        assert!(state.is_hidden("Doing"));
        assert!(!state.is_hidden("In Progress"));
        assert!(!state.is_expanded("Doing"));
        // The renamed name survives as a user-named status so its group
        // outlives its members.
        assert!(state.custom_statuses().iter().any(|s| s == "Doing"));
    }

    #[test]
    fn assignee_grouping_uses_display_names_lexicographically() {
        let users = builtin_users();
        let mut store = TaskStore::default();
        for (title, user) in [("t1", &users[1]), ("t2", &users[0]), ("t3", &users[1])] {
            let draft = TaskDraft {
                title: title.to_string(),
                assignee: Some(user.clone()),
                ..TaskDraft::default()
            };
            store.create(draft, NavContext::Everything).unwrap();
        }
        let state = GroupingState::with_grouping(GroupField::Assignee, SortDirection::Ascending);
        let groups = state.grouped(&refs(&store));
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Alex Rivera", "Sarah Chen"]);
        assert_eq!(groups[1].tasks.len(), 2);
    }

    #[test]
    fn non_status_direction_toggle_reverses_keys_exactly() {
        let mut store = TaskStore::default();
        for (title, priority) in [
            ("a", Priority::Urgent),
            ("b", Priority::Low),
            ("c", Priority::Normal),
        ] {
            let draft = TaskDraft {
                title: title.to_string(),
                priority: Some(priority),
                ..TaskDraft::default()
            };
            store.create(draft, NavContext::Everything).unwrap();
        }
        let mut state =
            GroupingState::with_grouping(GroupField::Priority, SortDirection::Ascending);
        let ascending = state.display_keys(&refs(&store));
        assert_eq!(ascending, vec!["Low", "Normal", "Urgent"]);

        state.direction = state.direction.toggled();
        let descending = state.display_keys(&refs(&store));
        let mut reversed = ascending.clone();
        reversed.reverse();
        assert_eq!(descending, reversed);
    }

    #[test]
    fn tag_grouping_uses_first_tag_with_sentinel() {
        let mut store = TaskStore::default();
        let drafts = [
            ("a", Some(vec!["Frontend", "AI"])),
            ("b", None),
            ("c", Some(vec!["AI"])),
        ];
        for (title, tags) in drafts {
            let draft = TaskDraft {
                title: title.to_string(),
                tags: tags.map(|v| v.iter().map(|s| s.to_string()).collect()),
                ..TaskDraft::default()
            };
            store.create(draft, NavContext::Everything).unwrap();
        }
        let state = GroupingState::with_grouping(GroupField::Tags, SortDirection::Ascending);
        let keys = state.display_keys(&refs(&store));
        assert_eq!(keys, vec!["AI", "Frontend", "No Tags"]);
    }

    #[test]
    fn due_date_grouping_formats_iso_with_sentinel() {
        let mut store = TaskStore::default();
        let date = NaiveDate::from_ymd_opt(2026, 3, 14);
        for (title, due) in [("a", date), ("b", None)] {
            let draft = TaskDraft {
                title: title.to_string(),
                due_date: due,
                ..TaskDraft::default()
            };
            let id = store.create(draft, NavContext::Everything).unwrap();
            if due.is_none() {
                store
                    .update(id, crate::task::TaskPatch::due_date(None))
                    .unwrap();
            }
        }
        let state = GroupingState::with_grouping(GroupField::DueDate, SortDirection::Ascending);
        let keys = state.display_keys(&refs(&store));
        assert_eq!(keys, vec!["2026-03-14", "No Due Date"]);
    }

    #[test]
    fn non_status_groupings_show_only_occupied_keys() {
        let store = TaskStore::default();
        for field in [
            GroupField::Assignee,
            GroupField::Priority,
            GroupField::Tags,
            GroupField::DueDate,
        ] {
            let state = GroupingState::with_grouping(field, SortDirection::Ascending);
            assert!(state.display_keys(&refs(&store)).is_empty());
        }
    }
}
