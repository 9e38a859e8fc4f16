use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{IntoActiveModel, QueryOrder, Set, TransactionTrait};
use serde::{Deserialize, Serialize};

use super::{class_slot, class_student};
use crate::error::DomainError;
use class_slot::SlotSpec;

/// A scheduled, recurring class: one unit, one teacher, a set of weekly
/// slots, an enrolled roster and its attendance records.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "class_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub unit_id: i64,
    pub teacher_id: i64,
    pub name: String,
    pub year: i32,
    pub semester: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::unit::Entity",
        from = "Column::UnitId",
        to = "super::unit::Column::Id"
    )]
    Unit,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TeacherId",
        to = "super::user::Column::Id"
    )]
    Teacher,
    #[sea_orm(has_many = "super::class_slot::Entity")]
    Slots,
    #[sea_orm(has_many = "super::class_student::Entity")]
    Roster,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    Attendance,
}

impl Related<super::unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unit.def()
    }
}

impl Related<super::class_slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Slots.def()
    }
}

impl Related<super::class_student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Roster.def()
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Creates a class after running the schedule conflict detector.
    ///
    /// All sessions of the candidate's `(year, semester)` window are loaded
    /// with their slots and compared by exact `(day, time)` token equality;
    /// the same teacher appearing anywhere in that window is a conflict
    /// regardless of slot overlap. The first conflict found aborts. On
    /// success the session, its slots and the optional initial roster are
    /// written in one transaction; attendance starts empty.
    pub async fn create_checked(
        db: &DatabaseConnection,
        unit_id: i64,
        teacher_id: i64,
        name: &str,
        year: i32,
        semester: i32,
        slots: &[SlotSpec],
        student_ids: &[i64],
    ) -> Result<Self, DomainError> {
        if slots.is_empty() {
            return Err(DomainError::invalid_input(
                "Class must have at least one weekly slot",
            ));
        }

        let existing = Entity::find()
            .filter(Column::Year.eq(year))
            .filter(Column::Semester.eq(semester))
            .find_with_related(class_slot::Entity)
            .all(db)
            .await?;

        for (session, session_slots) in &existing {
            if let Some(hit) = session_slots
                .iter()
                .find(|s| slots.iter().any(|candidate| candidate.matches(s)))
            {
                return Err(DomainError::conflict(format!(
                    "Class {} already has a schedule on {} {}",
                    session.name,
                    hit.day.as_str(),
                    hit.time
                )));
            }
            if session.teacher_id == teacher_id {
                return Err(DomainError::conflict(format!(
                    "Teacher already has a class {} in {} semester {}",
                    session.name, year, semester
                )));
            }
        }

        let txn = db.begin().await?;

        let session = ActiveModel {
            unit_id: Set(unit_id),
            teacher_id: Set(teacher_id),
            name: Set(name.to_string()),
            year: Set(year),
            semester: Set(semester),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut seen_slots: Vec<&SlotSpec> = Vec::new();
        for slot in slots {
            if seen_slots.iter().any(|s| **s == *slot) {
                continue;
            }
            seen_slots.push(slot);
            class_slot::ActiveModel {
                class_id: Set(session.id),
                day: Set(slot.day),
                time: Set(slot.time.clone()),
            }
            .insert(&txn)
            .await?;
        }

        let mut seen_students: Vec<i64> = Vec::new();
        for student_id in student_ids {
            if seen_students.contains(student_id) {
                continue;
            }
            seen_students.push(*student_id);
            class_student::ActiveModel {
                class_id: Set(session.id),
                student_id: Set(*student_id),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(session)
    }

    pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// Filter classes by optional year, semester, unit and name search.
    pub async fn filter(
        db: &DatabaseConnection,
        year: Option<i32>,
        semester: Option<i32>,
        unit_id: Option<i64>,
        search: Option<&str>,
    ) -> Result<Vec<Self>, DbErr> {
        let mut query = Entity::find();
        if let Some(y) = year {
            query = query.filter(Column::Year.eq(y));
        }
        if let Some(s) = semester {
            query = query.filter(Column::Semester.eq(s));
        }
        if let Some(u) = unit_id {
            query = query.filter(Column::UnitId.eq(u));
        }
        if let Some(q) = search {
            query = query.filter(Column::Name.contains(q));
        }
        query.order_by_asc(Column::Id).all(db).await
    }

    /// Student ids currently enrolled in the class.
    pub async fn roster(db: &DatabaseConnection, class_id: i64) -> Result<Vec<i64>, DbErr> {
        let rows = class_student::Entity::find()
            .filter(class_student::Column::ClassId.eq(class_id))
            .all(db)
            .await?;
        Ok(rows.into_iter().map(|r| r.student_id).collect())
    }

    pub async fn slots(db: &DatabaseConnection, class_id: i64) -> Result<Vec<class_slot::Model>, DbErr> {
        class_slot::Entity::find()
            .filter(class_slot::Column::ClassId.eq(class_id))
            .all(db)
            .await
    }

    /// Adds students to the roster; already-enrolled students are skipped.
    pub async fn enroll(
        db: &DatabaseConnection,
        class_id: i64,
        student_ids: &[i64],
    ) -> Result<(), DomainError> {
        if Entity::find_by_id(class_id).one(db).await?.is_none() {
            return Err(DomainError::not_found("Class not found"));
        }
        let current = Self::roster(db, class_id).await?;
        for student_id in student_ids {
            if current.contains(student_id) {
                continue;
            }
            class_student::ActiveModel {
                class_id: Set(class_id),
                student_id: Set(*student_id),
            }
            .insert(db)
            .await?;
        }
        Ok(())
    }

    /// Updates class metadata. Roster and attendance are preserved; slots are
    /// replaced only when a new set is supplied. No conflict re-check is
    /// performed on update.
    pub async fn update_details(
        db: &DatabaseConnection,
        id: i64,
        unit_id: Option<i64>,
        teacher_id: Option<i64>,
        name: Option<&str>,
        year: Option<i32>,
        semester: Option<i32>,
        slots: Option<&[SlotSpec]>,
    ) -> Result<Self, DomainError> {
        let Some(session) = Entity::find_by_id(id).one(db).await? else {
            return Err(DomainError::not_found("Class not found"));
        };

        let txn = db.begin().await?;

        let mut active = session.into_active_model();
        if let Some(u) = unit_id {
            active.unit_id = Set(u);
        }
        if let Some(t) = teacher_id {
            active.teacher_id = Set(t);
        }
        if let Some(n) = name {
            active.name = Set(n.to_string());
        }
        if let Some(y) = year {
            active.year = Set(y);
        }
        if let Some(s) = semester {
            active.semester = Set(s);
        }
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        if let Some(new_slots) = slots {
            class_slot::Entity::delete_many()
                .filter(class_slot::Column::ClassId.eq(id))
                .exec(&txn)
                .await?;
            let mut seen: Vec<&SlotSpec> = Vec::new();
            for slot in new_slots {
                if seen.iter().any(|s| **s == *slot) {
                    continue;
                }
                seen.push(slot);
                class_slot::ActiveModel {
                    class_id: Set(id),
                    day: Set(slot.day),
                    time: Set(slot.time.clone()),
                }
                .insert(&txn)
                .await?;
            }
        }

        txn.commit().await?;
        Ok(updated)
    }

    /// Hard delete; slots, roster and attendance cascade with the row.
    pub async fn delete_by_id(db: &DatabaseConnection, id: i64) -> Result<bool, DbErr> {
        let result = Entity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }
}
