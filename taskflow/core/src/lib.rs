//! Core domain models and board logic for TaskFlow.
pub mod board;
pub mod task;
pub mod view;

pub use board::{BoardMessage, MAX_NOTES_PER_TASK, TaskBoard};
pub use task::{NewNote, NewTask, Note, Priority, Task, TaskError, validate_text};
pub use view::{SortOrder, StatusFilter, ViewOptions, visible_tasks};
