//! Persistence for tasks and their notes.
//!
//! [`TaskStore`] is the row-level client every caller goes through: the JSON
//! API handlers and the client [`crate::session::TaskSession`] alike. Each
//! successful mutation is announced on a [`ChangeNotifier`] so that caches can
//! refetch.

use async_trait::async_trait;
use taskflow_core::{NewNote, NewTask, Note, Task};
use tokio::sync::broadcast;
use uuid::Uuid;

pub mod database;
pub mod notifier;

pub use database::DatabaseTaskStore;
pub use notifier::{ChangeNotifier, StoreChange};

/// Error type for TaskStore operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Represents a database error, including constraint violations.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    /// No task row matched the given ID.
    #[error("Task with ID {0} not found")]
    TaskNotFound(Uuid),
    /// No note row matched the given ID.
    #[error("Note with ID {0} not found")]
    NoteNotFound(Uuid),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Returns every task, newest first, each with its notes oldest first.
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError>;

    /// Inserts an uncompleted task and returns the stored row.
    async fn insert_task(&self, new_task: NewTask) -> Result<Task, StoreError>;

    async fn set_completed(&self, id: Uuid, completed: bool) -> Result<(), StoreError>;

    async fn update_text(&self, id: Uuid, text: String) -> Result<(), StoreError>;

    /// Deletes a task. Its notes go with it.
    async fn delete_task(&self, id: Uuid) -> Result<(), StoreError>;

    /// Inserts a note. The store does not cap the number of notes per task.
    async fn insert_note(&self, new_note: NewNote) -> Result<Note, StoreError>;

    async fn delete_note(&self, id: Uuid) -> Result<(), StoreError>;

    /// Subscribes to change events for mutations made after this call.
    fn subscribe(&self) -> broadcast::Receiver<StoreChange>;
}
