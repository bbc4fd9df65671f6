//! In-memory cache of the task list.
//!
//! The board is the single render source for a client session. It only
//! changes through the operations below, and a refetch replaces its contents
//! wholesale. Tasks are kept newest first; each task's notes oldest first.

use crate::task::{Note, Task};
use uuid::Uuid;

/// Number of notes after which the add-note input is hidden.
///
/// Only the presentation layer honours this; the store accepts more.
pub const MAX_NOTES_PER_TASK: usize = 5;

/// A change to apply to a [`TaskBoard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardMessage {
    Inserted(Task),
    CompletionChanged { id: Uuid, completed: bool },
    TextChanged { id: Uuid, text: String },
    Removed(Uuid),
    NoteAdded(Note),
    NoteRemoved(Uuid),
    /// A full refetch from the store. Replaces everything.
    Refetched(Vec<Task>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskBoard {
    tasks: Vec<Task>,
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut board = Self::new();
        board.replace_all(tasks);
        board
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    fn get_mut(&mut self, id: Uuid) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    /// Inserts a task ahead of every task that is not newer than it.
    ///
    /// A task already on the board with the same id is replaced, so a refetch
    /// racing an optimistic insert never produces duplicates.
    pub fn insert(&mut self, mut task: Task) {
        self.tasks.retain(|existing| existing.id != task.id);
        task.notes.sort_by_key(|note| note.created_at);
        let position = self
            .tasks
            .iter()
            .position(|existing| existing.created_at <= task.created_at)
            .unwrap_or(self.tasks.len());
        self.tasks.insert(position, task);
    }

    /// Sets the completion flag. Returns `false` if the task is not on the board.
    pub fn set_completed(&mut self, id: Uuid, completed: bool) -> bool {
        match self.get_mut(id) {
            Some(task) => {
                task.completed = completed;
                true
            }
            None => false,
        }
    }

    /// Replaces the task text. Returns `false` if the task is not on the board.
    pub fn set_text(&mut self, id: Uuid, text: String) -> bool {
        match self.get_mut(id) {
            Some(task) => {
                task.text = text;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Appends a note to its owning task.
    /// Returns `false` when the owning task is not on the board.
    pub fn add_note(&mut self, note: Note) -> bool {
        let Some(task) = self.get_mut(note.task_id) else {
            return false;
        };
        task.notes.retain(|existing| existing.id != note.id);
        let position = task
            .notes
            .iter()
            .position(|existing| existing.created_at > note.created_at)
            .unwrap_or(task.notes.len());
        task.notes.insert(position, note);
        true
    }

    pub fn remove_note(&mut self, note_id: Uuid) -> Option<Note> {
        self.tasks.iter_mut().find_map(|task| {
            let index = task.notes.iter().position(|note| note.id == note_id)?;
            Some(task.notes.remove(index))
        })
    }

    pub fn replace_all(&mut self, mut tasks: Vec<Task>) {
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        for task in &mut tasks {
            task.notes.sort_by_key(|note| note.created_at);
        }
        self.tasks = tasks;
    }

    /// Whether the add-note input should be offered for a task.
    pub fn can_add_note(&self, task_id: Uuid) -> bool {
        self.get(task_id)
            .is_some_and(|task| task.notes.len() < MAX_NOTES_PER_TASK)
    }

    pub fn apply(&mut self, message: BoardMessage) {
        match message {
            BoardMessage::Inserted(task) => self.insert(task),
            BoardMessage::CompletionChanged { id, completed } => {
                self.set_completed(id, completed);
            }
            BoardMessage::TextChanged { id, text } => {
                self.set_text(id, text);
            }
            BoardMessage::Removed(id) => {
                self.remove(id);
            }
            BoardMessage::NoteAdded(note) => {
                self.add_note(note);
            }
            BoardMessage::NoteRemoved(note_id) => {
                self.remove_note(note_id);
            }
            BoardMessage::Refetched(tasks) => self.replace_all(tasks),
        }
    }
}
