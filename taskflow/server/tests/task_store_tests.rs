use sea_orm::{ActiveModelTrait, ActiveValue, EntityTrait};
use std::time::Duration;
use taskflow_core::{MAX_NOTES_PER_TASK, NewNote, NewTask, Priority, TaskBoard};
use taskflow_server::entities::prelude::Task as TaskEntity;
use taskflow_server::entities::task;
use taskflow_server::store::{StoreChange, StoreError, TaskStore};
use uuid::Uuid;

mod common;

#[tokio::test]
async fn can_insert_task_with_default_priority() {
    let ctx = common::setup().await.expect("Failed to setup test context");

    let task = ctx
        .store
        .insert_task(NewTask::new("Buy milk", None).unwrap())
        .await
        .expect("Failed to insert task");

    assert_eq!(task.text, "Buy milk");
    assert_eq!(task.priority, Priority::Medium);
    assert!(!task.completed);
    assert!(task.notes.is_empty());

    let stored = TaskEntity::find_by_id(task.id)
        .one(&ctx.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.priority.as_deref(), Some("medium"));
}

#[tokio::test]
async fn can_list_tasks_newest_first_with_notes_oldest_first() {
    let ctx = common::setup().await.expect("Failed to setup test context");
    let older = ctx
        .store
        .insert_task(NewTask::new("Write report", Some(Priority::High)).unwrap())
        .await
        .unwrap();
    std::thread::sleep(Duration::from_millis(2));
    let newer = ctx
        .store
        .insert_task(NewTask::new("Buy milk", None).unwrap())
        .await
        .unwrap();
    let first = ctx
        .store
        .insert_note(NewNote::new(older.id, "Outline").unwrap())
        .await
        .unwrap();
    std::thread::sleep(Duration::from_millis(2));
    let second = ctx
        .store
        .insert_note(NewNote::new(older.id, "Draft").unwrap())
        .await
        .unwrap();

    let tasks = ctx.store.list_tasks().await.unwrap();

    assert_eq!(
        tasks.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![newer.id, older.id]
    );
    assert_eq!(tasks[1].notes, vec![first, second]);
    assert!(tasks[0].notes.is_empty());
}

#[tokio::test]
async fn can_normalise_missing_stored_priority() {
    let ctx = common::setup().await.expect("Failed to setup test context");
    let id = Uuid::new_v4();
    task::ActiveModel {
        id: ActiveValue::Set(id),
        text: ActiveValue::Set("Imported".to_string()),
        completed: ActiveValue::Set(false),
        priority: ActiveValue::Set(None),
        created_at: ActiveValue::Set(chrono::Utc::now()),
    }
    .insert(&ctx.db)
    .await
    .unwrap();

    let tasks = ctx.store.list_tasks().await.unwrap();

    assert_eq!(tasks[0].id, id);
    assert_eq!(tasks[0].priority, Priority::Medium);
}

#[tokio::test]
async fn can_update_completion_and_text() {
    let ctx = common::setup().await.expect("Failed to setup test context");
    let task = ctx
        .store
        .insert_task(NewTask::new("Buy milk", None).unwrap())
        .await
        .unwrap();

    ctx.store.set_completed(task.id, true).await.unwrap();
    ctx.store
        .update_text(task.id, "Buy oat milk".to_string())
        .await
        .unwrap();

    let tasks = ctx.store.list_tasks().await.unwrap();
    assert!(tasks[0].completed);
    assert_eq!(tasks[0].text, "Buy oat milk");
}

#[tokio::test]
async fn can_report_missing_rows() {
    let ctx = common::setup().await.expect("Failed to setup test context");
    let id = Uuid::new_v4();

    assert!(matches!(
        ctx.store.set_completed(id, true).await,
        Err(StoreError::TaskNotFound(missing)) if missing == id
    ));
    assert!(matches!(
        ctx.store.delete_task(id).await,
        Err(StoreError::TaskNotFound(_))
    ));
    assert!(matches!(
        ctx.store.delete_note(id).await,
        Err(StoreError::NoteNotFound(_))
    ));
}

#[tokio::test]
async fn can_cascade_task_delete_to_notes() {
    let ctx = common::setup().await.expect("Failed to setup test context");
    let task = ctx
        .store
        .insert_task(NewTask::new("Plan trip", None).unwrap())
        .await
        .unwrap();
    let note = ctx
        .store
        .insert_note(NewNote::new(task.id, "Book flights").unwrap())
        .await
        .unwrap();

    ctx.store.delete_task(task.id).await.unwrap();

    assert!(ctx.store.list_tasks().await.unwrap().is_empty());
    assert!(matches!(
        ctx.store.delete_note(note.id).await,
        Err(StoreError::NoteNotFound(_))
    ));
}

#[tokio::test]
async fn can_reject_note_for_unknown_task() {
    let ctx = common::setup().await.expect("Failed to setup test context");

    let result = ctx
        .store
        .insert_note(NewNote::new(Uuid::new_v4(), "Orphan").unwrap())
        .await;

    assert!(matches!(result, Err(StoreError::Database(_))));
}

#[tokio::test]
async fn can_store_more_notes_than_board_allows() {
    let ctx = common::setup().await.expect("Failed to setup test context");
    let task = ctx
        .store
        .insert_task(NewTask::new("Busy task", None).unwrap())
        .await
        .unwrap();

    for i in 0..=MAX_NOTES_PER_TASK {
        ctx.store
            .insert_note(NewNote::new(task.id, &format!("Note {}", i)).unwrap())
            .await
            .unwrap();
    }

    let board = TaskBoard::from_tasks(ctx.store.list_tasks().await.unwrap());
    assert_eq!(board.get(task.id).unwrap().notes.len(), MAX_NOTES_PER_TASK + 1);
    assert!(!board.can_add_note(task.id));
}

#[tokio::test]
async fn can_publish_changes_for_mutations() {
    let ctx = common::setup().await.expect("Failed to setup test context");
    let mut changes = ctx.store.subscribe();

    let task = ctx
        .store
        .insert_task(NewTask::new("Buy milk", None).unwrap())
        .await
        .unwrap();
    let note = ctx
        .store
        .insert_note(NewNote::new(task.id, "Semi-skimmed").unwrap())
        .await
        .unwrap();
    ctx.store.set_completed(task.id, true).await.unwrap();
    ctx.store.delete_note(note.id).await.unwrap();
    ctx.store.delete_task(task.id).await.unwrap();

    let mut received = Vec::new();
    while let Ok(change) = changes.try_recv() {
        received.push(change);
    }
    assert_eq!(
        received,
        vec![
            StoreChange::TaskInserted(task.id),
            StoreChange::NoteInserted {
                task_id: task.id,
                note_id: note.id
            },
            StoreChange::TaskUpdated(task.id),
            StoreChange::NoteDeleted(note.id),
            StoreChange::TaskDeleted(task.id),
        ]
    );
}
