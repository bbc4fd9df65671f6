use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    pub completed: bool,
    pub priority: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::task_note::Entity")]
    TaskNote,
}

impl Related<super::task_note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaskNote.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
