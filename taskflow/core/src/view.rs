//! Filtering, sorting and searching of the task list for display.

use crate::task::Task;
use std::cmp::Reverse;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which tasks to show by completion state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StatusFilter {
    #[default]
    All,
    Todo,
    Completed,
}

impl StatusFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Todo => !task.completed,
            StatusFilter::Completed => task.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    /// Most urgent first, newest first within the same priority.
    Priority,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ViewOptions {
    pub filter: StatusFilter,
    pub sort: SortOrder,
    /// Case-insensitive text matched against task text and note content.
    pub search: String,
}

/// Produces the list of tasks to render for the given options.
pub fn visible_tasks<'a>(tasks: &'a [Task], options: &ViewOptions) -> Vec<&'a Task> {
    let needle = options.search.trim().to_lowercase();
    let mut visible: Vec<&Task> = tasks
        .iter()
        .filter(|task| options.filter.matches(task))
        .filter(|task| needle.is_empty() || matches_search(task, &needle))
        .collect();

    match options.sort {
        SortOrder::Newest => visible.sort_by_key(|task| Reverse(task.created_at)),
        SortOrder::Oldest => visible.sort_by_key(|task| task.created_at),
        SortOrder::Priority => {
            visible.sort_by_key(|task| (Reverse(task.priority), Reverse(task.created_at)))
        }
    }
    visible
}

fn matches_search(task: &Task, needle: &str) -> bool {
    task.text.to_lowercase().contains(needle)
        || task
            .notes
            .iter()
            .any(|note| note.content.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Note, Priority};
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    fn task(text: &str, minutes: i64, priority: Priority, completed: bool) -> Task {
        Task {
            id: Uuid::new_v4(),
            text: text.to_string(),
            completed,
            priority,
            created_at: Utc.with_ymd_and_hms(2025, 10, 1, 9, 0, 0).unwrap()
                + Duration::minutes(minutes),
            notes: Vec::new(),
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task("Design landing page", 0, Priority::Low, false),
            task("Write API docs", 10, Priority::High, true),
            task("Prepare sprint demo", 20, Priority::Medium, false),
            task("Fix login bug", 30, Priority::High, false),
        ]
    }

    fn texts(tasks: Vec<&Task>) -> Vec<&str> {
        tasks.into_iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn can_show_all_newest_first_by_default() {
        let tasks = sample();

        let visible = visible_tasks(&tasks, &ViewOptions::default());

        assert_eq!(
            texts(visible),
            vec![
                "Fix login bug",
                "Prepare sprint demo",
                "Write API docs",
                "Design landing page"
            ]
        );
    }

    #[test]
    fn can_filter_by_status() {
        let tasks = sample();
        let todo = ViewOptions {
            filter: StatusFilter::Todo,
            ..Default::default()
        };
        let completed = ViewOptions {
            filter: StatusFilter::Completed,
            ..Default::default()
        };

        assert_eq!(visible_tasks(&tasks, &todo).len(), 3);
        assert_eq!(texts(visible_tasks(&tasks, &completed)), vec!["Write API docs"]);
    }

    #[test]
    fn can_sort_oldest_first() {
        let tasks = sample();
        let options = ViewOptions {
            sort: SortOrder::Oldest,
            ..Default::default()
        };

        let visible = visible_tasks(&tasks, &options);

        assert_eq!(visible.first().unwrap().text, "Design landing page");
        assert_eq!(visible.last().unwrap().text, "Fix login bug");
    }

    #[test]
    fn can_sort_by_priority_then_newest() {
        let tasks = sample();
        let options = ViewOptions {
            sort: SortOrder::Priority,
            ..Default::default()
        };

        assert_eq!(
            texts(visible_tasks(&tasks, &options)),
            vec![
                "Fix login bug",
                "Write API docs",
                "Prepare sprint demo",
                "Design landing page"
            ]
        );
    }

    #[test]
    fn can_search_text_and_notes_case_insensitively() {
        let mut tasks = sample();
        let demo_id = tasks[2].id;
        tasks[2].notes.push(Note {
            id: Uuid::new_v4(),
            task_id: demo_id,
            content: "Book the LARGE meeting room".to_string(),
            created_at: Utc::now(),
        });

        let by_text = ViewOptions {
            search: "  api ".to_string(),
            ..Default::default()
        };
        let by_note = ViewOptions {
            search: "large".to_string(),
            ..Default::default()
        };

        assert_eq!(texts(visible_tasks(&tasks, &by_text)), vec!["Write API docs"]);
        assert_eq!(
            texts(visible_tasks(&tasks, &by_note)),
            vec!["Prepare sprint demo"]
        );
    }

    #[test]
    fn can_combine_filter_and_search() {
        let tasks = sample();
        let options = ViewOptions {
            filter: StatusFilter::Todo,
            sort: SortOrder::Newest,
            search: "i".to_string(),
        };

        assert_eq!(
            texts(visible_tasks(&tasks, &options)),
            vec!["Fix login bug", "Prepare sprint demo", "Design landing page"]
        );
    }
}
