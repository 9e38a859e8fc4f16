use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::Set;
use serde::Serialize;

/// Per-class bucket of submissions for one assignment. The class id is a
/// plain column, not a foreign key, so the bucket and its submissions survive
/// the class being deleted later.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "submission_groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub class_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignment::Entity",
        from = "Column::AssignmentId",
        to = "super::assignment::Column::Id"
    )]
    Assignment,
    #[sea_orm(has_many = "super::student_submission::Entity")]
    Submissions,
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::student_submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Idempotent fetch-or-create keyed by the (assignment, class) unique
    /// index. A concurrent insert losing the race falls through to the fetch.
    pub async fn ensure(
        db: &DatabaseConnection,
        assignment_id: i64,
        class_id: i64,
    ) -> Result<Self, DbErr> {
        let insert = Entity::insert(ActiveModel {
            assignment_id: Set(assignment_id),
            class_id: Set(class_id),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::columns([Column::AssignmentId, Column::ClassId])
                .do_nothing()
                .to_owned(),
        )
        .exec(db)
        .await;

        match insert {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }

        Self::find_for(db, assignment_id, class_id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("submission group vanished after upsert".into()))
    }

    pub async fn find_for(
        db: &DatabaseConnection,
        assignment_id: i64,
        class_id: i64,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::ClassId.eq(class_id))
            .one(db)
            .await
    }
}
