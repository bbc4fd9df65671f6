//! `SeaORM` Entity, written to match the migrations in `migration/`.

pub mod prelude;

pub mod task;
pub mod task_note;
