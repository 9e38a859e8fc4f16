use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One student's slot in a submission group. Rows are created in bulk when an
/// assignment is distributed, so a row existing does not mean work was handed
/// in; the nullable columns carry the lifecycle.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "student_submissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub group_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: i64,
    pub submitted_at: Option<DateTime<Utc>>,
    pub file: Option<String>,
    pub grade: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::submission_group::Entity",
        from = "Column::GroupId",
        to = "super::submission_group::Column::Id"
    )]
    Group,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,
}

impl Related<super::submission_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Group.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Lifecycle state derived from the nullable columns, never stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Submitted,
    Graded,
}

impl Model {
    pub fn status(&self) -> SubmissionStatus {
        if self.grade.is_some() {
            SubmissionStatus::Graded
        } else if self.submitted_at.is_some() {
            SubmissionStatus::Submitted
        } else {
            SubmissionStatus::Pending
        }
    }
}
