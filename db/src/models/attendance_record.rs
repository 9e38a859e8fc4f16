use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{IntoActiveModel, QueryOrder, Set, TransactionTrait};
use serde::{Deserialize, Serialize};

use super::{attendance_entry, class_session};
use crate::error::DomainError;
use attendance_entry::AttendanceStatus;

/// One attendance sheet: a class, a calendar date, the topic taught, and a
/// status per student. At most one record exists per (class, date).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub date: Date,
    pub topic: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class_session::Entity",
        from = "Column::ClassId",
        to = "super::class_session::Column::Id"
    )]
    Class,
    #[sea_orm(has_many = "super::attendance_entry::Entity")]
    Entries,
}

impl Related<super::class_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::attendance_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Per-student status as supplied by the caller.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EntrySpec {
    pub student_id: i64,
    pub status: AttendanceStatus,
}

impl Model {
    /// Marks attendance for a class on a calendar date.
    ///
    /// Entries for students outside the roster are silently dropped (partial
    /// rosters are common during data entry). Upsert keyed by
    /// (class_id, date): when a record for the date already exists its entry
    /// list is replaced wholesale with the filtered entries - resubmitting a
    /// date discards anything not resubmitted, and the stored topic is left
    /// untouched. Returns the class's full attendance listing.
    pub async fn mark(
        db: &DatabaseConnection,
        class_id: i64,
        date: Date,
        topic: &str,
        entries: &[EntrySpec],
    ) -> Result<Vec<(Self, Vec<attendance_entry::Model>)>, DomainError> {
        if class_session::Entity::find_by_id(class_id)
            .one(db)
            .await?
            .is_none()
        {
            return Err(DomainError::not_found("Class not found"));
        }

        let roster: HashSet<i64> = class_session::Model::roster(db, class_id)
            .await?
            .into_iter()
            .collect();
        if roster.is_empty() {
            return Err(DomainError::invalid_input(
                "Class has no students, cannot mark attendance",
            ));
        }

        // last status wins when a student appears more than once
        let mut valid: Vec<(i64, AttendanceStatus)> = Vec::new();
        for entry in entries {
            if !roster.contains(&entry.student_id) {
                continue;
            }
            if let Some(slot) = valid.iter_mut().find(|(id, _)| *id == entry.student_id) {
                slot.1 = entry.status;
            } else {
                valid.push((entry.student_id, entry.status));
            }
        }
        if valid.is_empty() {
            return Err(DomainError::invalid_input(
                "No valid students found in the class",
            ));
        }

        let txn = db.begin().await?;

        let existing = Entity::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Date.eq(date))
            .one(&txn)
            .await?;

        let record = match existing {
            Some(record) => {
                attendance_entry::Entity::delete_many()
                    .filter(attendance_entry::Column::RecordId.eq(record.id))
                    .exec(&txn)
                    .await?;
                let mut active = record.into_active_model();
                active.updated_at = Set(Utc::now());
                active.update(&txn).await?
            }
            None => {
                ActiveModel {
                    class_id: Set(class_id),
                    date: Set(date),
                    topic: Set(topic.to_string()),
                    created_at: Set(Utc::now()),
                    updated_at: Set(Utc::now()),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };

        for (student_id, status) in valid {
            attendance_entry::ActiveModel {
                record_id: Set(record.id),
                student_id: Set(student_id),
                status: Set(status),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        Self::list_for_class(db, class_id).await.map_err(Into::into)
    }

    /// All attendance records for a class with their entries, oldest first.
    pub async fn list_for_class(
        db: &DatabaseConnection,
        class_id: i64,
    ) -> Result<Vec<(Self, Vec<attendance_entry::Model>)>, DbErr> {
        Entity::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::Date)
            .find_with_related(attendance_entry::Entity)
            .all(db)
            .await
    }
}
