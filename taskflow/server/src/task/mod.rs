use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskflow_core::Task;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::note::NoteJson;

pub mod api;

/// JSON representation of a Task for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskJson {
    /// Server-generated identifier
    pub id: Uuid,
    /// What needs doing
    pub text: String,
    pub completed: bool,
    /// One of `low`, `medium` or `high`
    pub priority: String,
    pub created_at: DateTime<Utc>,
    /// Notes on this task, oldest first
    pub notes: Vec<NoteJson>,
}

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            text: task.text,
            completed: task.completed,
            priority: task.priority.as_str().to_string(),
            created_at: task.created_at,
            notes: task.notes.into_iter().map(NoteJson::from).collect(),
        }
    }
}

/// API response for listing all tasks.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TasksResponse {
    /// Tasks, newest first
    pub tasks: Vec<TaskJson>,
    /// Total number of tasks
    pub count: usize,
}
