//! Client-side task session.
//!
//! A session owns the [`TaskBoard`] a user interface renders from. Every
//! user action goes to the store first and is applied to the board only once
//! the store confirms it. Failures are logged and leave the board untouched.
//! Change events from the store trigger a full refetch.

use std::sync::Arc;
use taskflow_core::{
    BoardMessage, NewNote, NewTask, Note, Priority, Task, TaskBoard, TaskError, ViewOptions,
    validate_text, visible_tasks,
};
use tokio::sync::broadcast::{self, error::TryRecvError};
use uuid::Uuid;

use crate::enhancement::TitleEnhancer;
use crate::store::{StoreChange, StoreError, TaskStore};

/// Error type for session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The user input was rejected before reaching the store.
    #[error("Invalid input: {0}")]
    Validation(#[from] TaskError),
    /// The store rejected or failed the operation.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub struct TaskSession {
    store: Arc<dyn TaskStore>,
    enhancer: Option<Arc<dyn TitleEnhancer>>,
    board: TaskBoard,
    changes: broadcast::Receiver<StoreChange>,
}

impl TaskSession {
    /// Creates a session with an empty board, subscribed to store changes.
    pub fn new(store: Arc<dyn TaskStore>, enhancer: Option<Arc<dyn TitleEnhancer>>) -> Self {
        let changes = store.subscribe();
        Self {
            store,
            enhancer,
            board: TaskBoard::new(),
            changes,
        }
    }

    pub fn board(&self) -> &TaskBoard {
        &self.board
    }

    /// Tasks to render for the given filter, sort and search.
    pub fn visible(&self, options: &ViewOptions) -> Vec<&Task> {
        visible_tasks(self.board.tasks(), options)
    }

    /// Replaces the board with the store's current contents.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<(), SessionError> {
        let tasks = self.store.list_tasks().await.inspect_err(|e| {
            tracing::error!("Failed to fetch tasks: {}", e);
        })?;
        tracing::debug!("Fetched {} task(s)", tasks.len());
        self.board.apply(BoardMessage::Refetched(tasks));
        Ok(())
    }

    /// Drains pending change events and refetches if there were any.
    ///
    /// Returns whether a refetch happened.
    pub async fn sync_changes(&mut self) -> Result<bool, SessionError> {
        let mut changed = false;
        loop {
            match self.changes.try_recv() {
                Ok(change) => {
                    tracing::debug!("Observed store change {:?}", change);
                    changed = true;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("Missed {} store change(s)", skipped);
                    changed = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if changed {
            self.refresh().await?;
        }
        Ok(changed)
    }

    /// Waits for the next change event and refetches.
    ///
    /// Returns `Ok(false)` once the store has shut down its change feed.
    pub async fn wait_for_change(&mut self) -> Result<bool, SessionError> {
        match self.changes.recv().await {
            Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                self.refresh().await?;
                Ok(true)
            }
            Err(broadcast::error::RecvError::Closed) => Ok(false),
        }
    }

    /// Creates a task, optionally rewriting its title through the enhancer.
    ///
    /// An enhancement failure never fails the call: the original text is
    /// stored instead.
    #[tracing::instrument(skip(self))]
    pub async fn add_task(
        &mut self,
        text: &str,
        priority: Option<Priority>,
        should_enhance: bool,
    ) -> Result<Task, SessionError> {
        let mut new_task = NewTask::new(text, priority)?;
        if should_enhance {
            new_task.text = self.enhanced_text(&new_task).await;
        }

        let task = self.store.insert_task(new_task).await.inspect_err(|e| {
            tracing::error!("Failed to add task: {}", e);
        })?;
        self.board.apply(BoardMessage::Inserted(task.clone()));
        Ok(task)
    }

    async fn enhanced_text(&self, new_task: &NewTask) -> String {
        let Some(enhancer) = &self.enhancer else {
            tracing::warn!("Enhancement requested but no webhook is configured");
            return new_task.text.clone();
        };
        match enhancer.enhance(&new_task.text, new_task.priority).await {
            Ok(enhanced) => match validate_text(&enhanced) {
                Ok(enhanced) => enhanced,
                Err(_) => new_task.text.clone(),
            },
            Err(e) => {
                tracing::warn!("Enhancement failed, keeping original title: {}", e);
                new_task.text.clone()
            }
        }
    }

    /// Flips a task's completion flag.
    ///
    /// Returns the new value, or `None` when the task is not on the board, in
    /// which case the store is not contacted.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_task(&mut self, id: Uuid) -> Result<Option<bool>, SessionError> {
        let Some(task) = self.board.get(id) else {
            tracing::error!("Cannot toggle task {}: not found", id);
            return Ok(None);
        };
        let completed = !task.completed;

        self.store
            .set_completed(id, completed)
            .await
            .inspect_err(|e| tracing::error!("Failed to toggle task {}: {}", id, e))?;
        self.board
            .apply(BoardMessage::CompletionChanged { id, completed });
        Ok(Some(completed))
    }

    #[tracing::instrument(skip(self))]
    pub async fn edit_task(&mut self, id: Uuid, text: &str) -> Result<(), SessionError> {
        let text = validate_text(text)?;

        self.store
            .update_text(id, text.clone())
            .await
            .inspect_err(|e| tracing::error!("Failed to edit task {}: {}", id, e))?;
        self.board.apply(BoardMessage::TextChanged { id, text });
        Ok(())
    }

    /// Deletes a task.
    ///
    /// Returns `false` without contacting the store when the task is not on
    /// the board.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task(&mut self, id: Uuid) -> Result<bool, SessionError> {
        if self.board.get(id).is_none() {
            tracing::warn!("Ignoring delete of task {}: not found", id);
            return Ok(false);
        }

        self.store
            .delete_task(id)
            .await
            .inspect_err(|e| tracing::error!("Failed to delete task {}: {}", id, e))?;
        self.board.apply(BoardMessage::Removed(id));
        Ok(true)
    }

    #[tracing::instrument(skip(self))]
    pub async fn add_note(&mut self, task_id: Uuid, content: &str) -> Result<Note, SessionError> {
        let new_note = NewNote::new(task_id, content)?;

        let note = self
            .store
            .insert_note(new_note)
            .await
            .inspect_err(|e| tracing::error!("Failed to add note to task {}: {}", task_id, e))?;
        self.board.apply(BoardMessage::NoteAdded(note.clone()));
        Ok(note)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_note(&mut self, note_id: Uuid) -> Result<(), SessionError> {
        self.store
            .delete_note(note_id)
            .await
            .inspect_err(|e| tracing::error!("Failed to delete note {}: {}", note_id, e))?;
        self.board.apply(BoardMessage::NoteRemoved(note_id));
        Ok(())
    }
}
