pub use super::task::Entity as Task;
pub use super::task_note::Entity as TaskNote;
