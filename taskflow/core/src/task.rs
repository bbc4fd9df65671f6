use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Urgency of a task. Ordered from least to most urgent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Returns the lowercase name used on the wire and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Normalises a stored priority value.
    ///
    /// Rows written outside of this crate may carry a null or unknown
    /// priority; those are read back as [`Priority::Medium`].
    pub fn from_stored(value: Option<&str>) -> Self {
        value
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(TaskError::InvalidPriority(s.to_string())),
        }
    }
}

/// A free-text annotation attached to exactly one task.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Note {
    pub id: Uuid,
    pub task_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A to-do item together with its notes, oldest note first.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Task {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub notes: Vec<Note>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task text is required")]
    EmptyText,
    #[error("Note content is required")]
    EmptyContent,
    #[error("Unknown priority '{0}', expected one of low, medium, high")]
    InvalidPriority(String),
}

/// Validated input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub text: String,
    pub priority: Priority,
}

impl NewTask {
    /// Trims `text` and rejects it when nothing is left.
    /// A missing priority becomes [`Priority::Medium`].
    pub fn new(text: &str, priority: Option<Priority>) -> Result<Self, TaskError> {
        Ok(Self {
            text: validate_text(text)?,
            priority: priority.unwrap_or_default(),
        })
    }
}

/// Validated input for attaching a note to a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub task_id: Uuid,
    pub content: String,
}

impl NewNote {
    pub fn new(task_id: Uuid, content: &str) -> Result<Self, TaskError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(TaskError::EmptyContent);
        }
        Ok(Self {
            task_id,
            content: content.to_string(),
        })
    }
}

/// Trims task text, failing with [`TaskError::EmptyText`] if it is blank.
pub fn validate_text(text: &str) -> Result<String, TaskError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TaskError::EmptyText);
    }
    Ok(text.to_string())
}
