//! Student-centric read queries that cut across the class, attendance and
//! course tables.

use sea_orm::entity::prelude::*;
use serde::Serialize;

use crate::error::DomainError;
use crate::models::{
    attendance_entry, attendance_record, class_session, class_student, course, unit,
};
use attendance_entry::AttendanceStatus;

/// One line of a student's attendance history: when, which unit, and whether
/// they were there.
#[derive(Clone, Debug, Serialize)]
pub struct AttendanceHistoryEntry {
    pub date: Date,
    pub subject: String,
    pub status: AttendanceStatus,
}

/// Classes the student is enrolled in, optionally narrowed to a term.
pub async fn classes_for_student(
    db: &DatabaseConnection,
    student_id: i64,
    year: Option<i32>,
    semester: Option<i32>,
) -> Result<Vec<class_session::Model>, DbErr> {
    let class_ids: Vec<i64> = class_student::Entity::find()
        .filter(class_student::Column::StudentId.eq(student_id))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.class_id)
        .collect();
    if class_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = class_session::Entity::find()
        .filter(class_session::Column::Id.is_in(class_ids));
    if let Some(y) = year {
        query = query.filter(class_session::Column::Year.eq(y));
    }
    if let Some(s) = semester {
        query = query.filter(class_session::Column::Semester.eq(s));
    }
    query.all(db).await
}

/// Units the student takes at least one class in, deduplicated.
pub async fn units_for_student(
    db: &DatabaseConnection,
    student_id: i64,
) -> Result<Vec<unit::Model>, DbErr> {
    let classes = classes_for_student(db, student_id, None, None).await?;
    let mut unit_ids: Vec<i64> = classes.into_iter().map(|c| c.unit_id).collect();
    unit_ids.sort_unstable();
    unit_ids.dedup();
    if unit_ids.is_empty() {
        return Ok(Vec::new());
    }
    unit::Entity::find()
        .filter(unit::Column::Id.is_in(unit_ids))
        .all(db)
        .await
}

/// Courses the student's units belong to, deduplicated.
pub async fn courses_for_student(
    db: &DatabaseConnection,
    student_id: i64,
) -> Result<Vec<course::Model>, DbErr> {
    let units = units_for_student(db, student_id).await?;
    let mut course_ids: Vec<i64> = units.into_iter().map(|u| u.course_id).collect();
    course_ids.sort_unstable();
    course_ids.dedup();
    if course_ids.is_empty() {
        return Ok(Vec::new());
    }
    course::Entity::find()
        .filter(course::Column::Id.is_in(course_ids))
        .all(db)
        .await
}

/// Full attendance history of a student across every class they belong to,
/// oldest first. A student with no enrolments at all is NotFound rather than
/// an empty list.
pub async fn student_attendance_history(
    db: &DatabaseConnection,
    student_id: i64,
) -> Result<Vec<AttendanceHistoryEntry>, DomainError> {
    let classes = classes_for_student(db, student_id, None, None).await?;
    if classes.is_empty() {
        return Err(DomainError::not_found("Student not found in any class"));
    }

    let mut history = Vec::new();
    for class in &classes {
        let subject = unit::Entity::find_by_id(class.unit_id)
            .one(db)
            .await?
            .map(|u| u.name)
            .unwrap_or_else(|| class.name.clone());

        let records = attendance_record::Model::list_for_class(db, class.id).await?;
        for (record, entries) in records {
            if let Some(entry) = entries.iter().find(|e| e.student_id == student_id) {
                history.push(AttendanceHistoryEntry {
                    date: record.date,
                    subject: subject.clone(),
                    status: entry.status,
                });
            }
        }
    }

    history.sort_by_key(|e| e.date);
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::models::{
        attendance_record::EntrySpec,
        class_slot::{SlotSpec, Weekday},
        user::{self, Role},
    };
    use crate::test_utils::setup_test_db;

    async fn seed_class(
        db: &DatabaseConnection,
        unit_name: &str,
        teacher: i64,
        year: i32,
        semester: i32,
        day: Weekday,
        students: &[i64],
    ) -> class_session::Model {
        let c = course::Model::create(db, &format!("Course for {unit_name}"), None)
            .await
            .unwrap();
        let u = unit::Model::create(db, c.id, "U1", unit_name).await.unwrap();
        class_session::Model::create_checked(
            db,
            u.id,
            teacher,
            &format!("{unit_name} A"),
            year,
            semester,
            &[SlotSpec {
                day,
                time: "08:00 AM - 10:00 AM".to_string(),
            }],
            students,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_history_spans_classes_and_sorts_by_date() {
        let db = setup_test_db().await;
        let t1 = user::Model::create(&db, "teach1", "t1@test.com", Role::Teacher)
            .await
            .unwrap();
        let t2 = user::Model::create(&db, "teach2", "t2@test.com", Role::Teacher)
            .await
            .unwrap();
        let s = user::Model::create(&db, "stud1", "s1@test.com", Role::Student)
            .await
            .unwrap();

        let algos =
            seed_class(&db, "Algorithms", t1.id, 2026, 1, Weekday::Monday, &[s.id]).await;
        let nets =
            seed_class(&db, "Networks", t2.id, 2026, 1, Weekday::Tuesday, &[s.id]).await;

        let later = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        let earlier = NaiveDate::from_ymd_opt(2026, 3, 3).unwrap();
        attendance_record::Model::mark(
            &db,
            algos.id,
            later,
            "Sorting",
            &[EntrySpec {
                student_id: s.id,
                status: AttendanceStatus::Present,
            }],
        )
        .await
        .unwrap();
        attendance_record::Model::mark(
            &db,
            nets.id,
            earlier,
            "TCP",
            &[EntrySpec {
                student_id: s.id,
                status: AttendanceStatus::Absent,
            }],
        )
        .await
        .unwrap();

        let history = student_attendance_history(&db, s.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].date, earlier);
        assert_eq!(history[0].subject, "Networks");
        assert_eq!(history[0].status, AttendanceStatus::Absent);
        assert_eq!(history[1].subject, "Algorithms");
    }

    #[tokio::test]
    async fn test_unenrolled_student_history_is_not_found() {
        let db = setup_test_db().await;
        let s = user::Model::create(&db, "stud1", "s1@test.com", Role::Student)
            .await
            .unwrap();
        let err = student_attendance_history(&db, s.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_rollups_deduplicate_units_and_courses() {
        let db = setup_test_db().await;
        let t1 = user::Model::create(&db, "teach1", "t1@test.com", Role::Teacher)
            .await
            .unwrap();
        let t2 = user::Model::create(&db, "teach2", "t2@test.com", Role::Teacher)
            .await
            .unwrap();
        let s = user::Model::create(&db, "stud1", "s1@test.com", Role::Student)
            .await
            .unwrap();

        // two classes of the same unit in different terms
        let c = course::Model::create(&db, "BSc Computer Science", None)
            .await
            .unwrap();
        let u = unit::Model::create(&db, c.id, "ALG214", "Algorithms").await.unwrap();
        for (teacher, semester) in [(t1.id, 1), (t2.id, 2)] {
            class_session::Model::create_checked(
                &db,
                u.id,
                teacher,
                &format!("Algorithms S{semester}"),
                2026,
                semester,
                &[SlotSpec {
                    day: Weekday::Monday,
                    time: "08:00 AM - 10:00 AM".to_string(),
                }],
                &[s.id],
            )
            .await
            .unwrap();
        }

        assert_eq!(classes_for_student(&db, s.id, None, None).await.unwrap().len(), 2);
        assert_eq!(
            classes_for_student(&db, s.id, Some(2026), Some(1)).await.unwrap().len(),
            1
        );
        assert_eq!(units_for_student(&db, s.id).await.unwrap().len(), 1);
        assert_eq!(courses_for_student(&db, s.id).await.unwrap().len(), 1);
    }
}
