use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

use crate::m20251017_000001_create_tasks_table::Tasks;

#[derive(DeriveMigrationName)]
pub struct Migration;

const FK_TASK_NOTES_TO_TASKS: &str = "fk-task_notes-task_id";
const IDX_TASK_NOTES_TASK_ID: &str = "idx-task_notes-task_id";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TaskNotes::Table)
                    .if_not_exists()
                    .col(pk_uuid(TaskNotes::Id))
                    .col(uuid(TaskNotes::TaskId))
                    .col(text(TaskNotes::Content))
                    .col(
                        timestamp_with_time_zone(TaskNotes::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_TASK_NOTES_TO_TASKS)
                            .from(TaskNotes::Table, TaskNotes::TaskId)
                            .to(Tasks::Table, Tasks::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_TASK_NOTES_TASK_ID)
                    .table(TaskNotes::Table)
                    .col(TaskNotes::TaskId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TaskNotes::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TaskNotes {
    Table,
    Id,
    TaskId,
    Content,
    CreatedAt,
}
