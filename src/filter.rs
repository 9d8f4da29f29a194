//! The filter engine: derives the visible task subset.
//!
//! Two predicates applied in order over the store's collection: the active
//! navigation context (tag membership or "My Tasks" identity), then the
//! free-text search over title and assignee name. The stage preserves the
//! store's ordering and never duplicates a task; an empty result is a valid
//! output rendered as an empty state, not an error.

use crate::fields::NavContext;
use crate::task::{Task, User};

/// True when the task is visible in the given navigation context.
fn in_context(task: &Task, context: NavContext, me: &User) -> bool {
    if let Some(wanted) = context.tag_filter() {
        return task.tags.iter().any(|tag| wanted.contains(&tag.as_str()));
    }
    if context == NavContext::MyTasks {
        // Identity matches by id or by display name, whichever hits first.
        return task.assignee.id == me.id || task.assignee.name == me.name;
    }
    true
}

/// True when the task matches the search query (case-insensitive substring
/// over title or assignee name). An empty query matches everything.
fn matches_search(task: &Task, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    task.title.to_lowercase().contains(&needle)
        || task.assignee.name.to_lowercase().contains(&needle)
}

/// Derive the visible subset of `tasks` for the given context, search query
/// and current-user identity, preserving collection order.
pub fn visible_tasks<'a>(
    tasks: &'a [Task],
    context: NavContext,
    query: &str,
    me: &User,
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| in_context(t, context, me) && matches_search(t, query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TaskStore;
    use crate::task::{builtin_users, TaskDraft};

    fn seeded() -> (TaskStore, User) {
        let users = builtin_users();
        let mut store = TaskStore::default();
        let drafts = [
            ("Gemini API Integration", Some(vec!["Engineering", "AI"]), 0),
            ("Design Dashboard Layout", Some(vec!["Design"]), 1),
            ("Q3 Campaign Brief", Some(vec!["Marketing"]), 2),
            ("Fix Chart Tooltips", Some(vec!["Data Viz"]), 0),
            ("Untagged Chore", None, 3),
        ];
        for (title, tags, user_idx) in drafts {
            let draft = TaskDraft {
                title: title.to_string(),
                tags: tags.map(|v| v.iter().map(|s| s.to_string()).collect()),
                assignee: Some(users[user_idx].clone()),
                ..TaskDraft::default()
            };
            store.create(draft, NavContext::Everything).unwrap();
        }
        (store, users[0].clone())
    }

    fn titles(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.title.clone()).collect()
    }

    #[test]
    fn everything_passes_all_tasks_in_store_order() {
        let (store, me) = seeded();
        let visible = visible_tasks(store.tasks(), NavContext::Everything, "", &me);
        assert_eq!(visible.len(), store.len());
        // Most-recent-first store order survives filtering untouched.
        assert_eq!(titles(&visible)[0], "Untagged Chore");
        assert_eq!(titles(&visible)[4], "Gemini API Integration");
    }

    #[test]
    fn context_filters_by_tag_intersection() {
        let (store, me) = seeded();
        let eng = visible_tasks(store.tasks(), NavContext::Engineering, "", &me);
        assert_eq!(
            titles(&eng),
            vec!["Fix Chart Tooltips", "Gemini API Integration"]
        );
        let design = visible_tasks(store.tasks(), NavContext::Design, "", &me);
        assert_eq!(titles(&design), vec!["Design Dashboard Layout"]);
    }

    #[test]
    fn my_tasks_matches_assignee_by_id_or_name() {
        let (store, me) = seeded();
        let mine = visible_tasks(store.tasks(), NavContext::MyTasks, "", &me);
        assert_eq!(
            titles(&mine),
            vec!["Fix Chart Tooltips", "Gemini API Integration"]
        );

        // Identity carrying only a matching name still hits.
        let name_only = User::new("999", "Alex Rivera", "", "");
        let mine = visible_tasks(store.tasks(), NavContext::MyTasks, "", &name_only);
        assert_eq!(mine.len(), 2);
    }

    #[test]
    fn search_matches_title_or_assignee_case_insensitively() {
        let (store, me) = seeded();
        let hits = visible_tasks(store.tasks(), NavContext::Everything, "GEMINI", &me);
        assert_eq!(titles(&hits), vec!["Gemini API Integration"]);

        let hits = visible_tasks(store.tasks(), NavContext::Everything, "sarah", &me);
        assert_eq!(titles(&hits), vec!["Design Dashboard Layout"]);
    }

    #[test]
    fn empty_result_is_valid() {
        let (store, me) = seeded();
        let hits = visible_tasks(store.tasks(), NavContext::Everything, "zzz-no-match", &me);
        assert!(hits.is_empty());
    }

    #[test]
    fn context_and_search_commute() {
        let (store, me) = seeded();
        let both = visible_tasks(store.tasks(), NavContext::Engineering, "chart", &me);

        // Applying the predicates in the opposite order yields the same set.
        let search_first: Vec<&Task> = store
            .tasks()
            .iter()
            .filter(|t| matches_search(t, "chart"))
            .filter(|t| in_context(t, NavContext::Engineering, &me))
            .collect();
        assert_eq!(titles(&both), titles(&search_first));
        assert_eq!(titles(&both), vec!["Fix Chart Tooltips"]);
    }
}
