use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;
use std::collections::HashMap;
use taskflow_core::{NewNote, NewTask, Note, Priority, Task};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::entities::{task, task_note};
use crate::store::{ChangeNotifier, StoreChange, StoreError, TaskStore};

impl From<task::Model> for Task {
    fn from(model: task::Model) -> Self {
        Task {
            id: model.id,
            text: model.text,
            completed: model.completed,
            priority: Priority::from_stored(model.priority.as_deref()),
            created_at: model.created_at,
            notes: Vec::new(),
        }
    }
}

impl From<task_note::Model> for Note {
    fn from(model: task_note::Model) -> Self {
        Note {
            id: model.id,
            task_id: model.task_id,
            content: model.content,
            created_at: model.created_at,
        }
    }
}

/// [`TaskStore`] backed by a SeaORM database connection.
///
/// Identifiers and creation timestamps are assigned here, not by callers.
#[derive(Clone, Debug)]
pub struct DatabaseTaskStore {
    db: DatabaseConnection,
    notifier: ChangeNotifier,
}

impl DatabaseTaskStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_notifier(db, ChangeNotifier::default())
    }

    pub fn with_notifier(db: DatabaseConnection, notifier: ChangeNotifier) -> Self {
        Self { db, notifier }
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }
}

#[async_trait]
impl TaskStore for DatabaseTaskStore {
    #[tracing::instrument(skip(self))]
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let task_models = task::Entity::find()
            .order_by_desc(task::Column::CreatedAt)
            .all(&self.db)
            .await?;
        let note_models = task_note::Entity::find()
            .order_by_asc(task_note::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut notes_by_task: HashMap<Uuid, Vec<Note>> = HashMap::new();
        for model in note_models {
            notes_by_task
                .entry(model.task_id)
                .or_default()
                .push(Note::from(model));
        }

        let tasks = task_models
            .into_iter()
            .map(|model| {
                let mut task = Task::from(model);
                task.notes = notes_by_task.remove(&task.id).unwrap_or_default();
                task
            })
            .collect();
        Ok(tasks)
    }

    #[tracing::instrument(skip(self))]
    async fn insert_task(&self, new_task: NewTask) -> Result<Task, StoreError> {
        let active_model = task::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            text: ActiveValue::Set(new_task.text),
            completed: ActiveValue::Set(false),
            priority: ActiveValue::Set(Some(new_task.priority.as_str().to_string())),
            created_at: ActiveValue::Set(Utc::now()),
        };
        let created_model = active_model.insert(&self.db).await?;
        self.notifier
            .publish(StoreChange::TaskInserted(created_model.id));
        Ok(Task::from(created_model))
    }

    #[tracing::instrument(skip(self))]
    async fn set_completed(&self, id: Uuid, completed: bool) -> Result<(), StoreError> {
        let result = task::Entity::update_many()
            .col_expr(task::Column::Completed, Expr::value(completed))
            .filter(task::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(StoreError::TaskNotFound(id));
        }
        self.notifier.publish(StoreChange::TaskUpdated(id));
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn update_text(&self, id: Uuid, text: String) -> Result<(), StoreError> {
        let result = task::Entity::update_many()
            .col_expr(task::Column::Text, Expr::value(text))
            .filter(task::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(StoreError::TaskNotFound(id));
        }
        self.notifier.publish(StoreChange::TaskUpdated(id));
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_task(&self, id: Uuid) -> Result<(), StoreError> {
        let result = task::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::TaskNotFound(id));
        }
        self.notifier.publish(StoreChange::TaskDeleted(id));
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn insert_note(&self, new_note: NewNote) -> Result<Note, StoreError> {
        let active_model = task_note::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            task_id: ActiveValue::Set(new_note.task_id),
            content: ActiveValue::Set(new_note.content),
            created_at: ActiveValue::Set(Utc::now()),
        };
        let created_model = active_model.insert(&self.db).await?;
        self.notifier.publish(StoreChange::NoteInserted {
            task_id: created_model.task_id,
            note_id: created_model.id,
        });
        Ok(Note::from(created_model))
    }

    #[tracing::instrument(skip(self))]
    async fn delete_note(&self, id: Uuid) -> Result<(), StoreError> {
        let result = task_note::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NoteNotFound(id));
        }
        self.notifier.publish(StoreChange::NoteDeleted(id));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.notifier.subscribe()
    }
}
