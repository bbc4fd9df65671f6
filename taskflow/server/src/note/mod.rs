use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskflow_core::Note;
use utoipa::ToSchema;
use uuid::Uuid;

pub mod api;

/// JSON representation of a Note for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NoteJson {
    pub id: Uuid,
    /// Task this note belongs to
    pub task_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Note> for NoteJson {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            task_id: note.task_id,
            content: note.content,
            created_at: note.created_at,
        }
    }
}
