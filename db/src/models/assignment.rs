use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{IntoActiveModel, QueryOrder, Set, TransactionTrait};
use serde::{Deserialize, Serialize};

use super::{class_session, student_submission, submission_group};
use crate::error::DomainError;

/// A piece of coursework attached to a unit and distributed to classes.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub unit_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub start_day: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub max_marks: f64,
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
    #[sea_orm(has_many = "super::submission_group::Entity")]
    Groups,
}

impl Related<super::unit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unit.def()
    }
}

impl Related<super::submission_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// One grade to apply, as supplied by the caller.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GradeSpec {
    pub student_id: i64,
    pub grade: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct SkippedGrade {
    pub student_id: i64,
    pub reason: String,
}

/// What a bulk grading pass actually did.
#[derive(Clone, Debug, Serialize)]
pub struct GradeOutcome {
    pub applied: usize,
    pub skipped: Vec<SkippedGrade>,
}

impl Model {
    /// Creates an assignment and distributes it to the target classes.
    ///
    /// Unknown and duplicate class ids are dropped; if nothing remains the
    /// whole operation is NotFound. For each surviving class a submission
    /// group is created and every student on the roster at this moment gets
    /// a pending skeleton row. Later roster changes do not touch the groups.
    pub async fn create_distributed(
        db: &DatabaseConnection,
        unit_id: i64,
        title: &str,
        description: &str,
        start_day: DateTime<Utc>,
        deadline: DateTime<Utc>,
        max_marks: f64,
        target_class_ids: &[i64],
    ) -> Result<Self, DomainError> {
        if deadline < start_day {
            return Err(DomainError::invalid_input(
                "Deadline cannot be before the start day",
            ));
        }
        if max_marks <= 0.0 {
            return Err(DomainError::invalid_input("Max marks must be positive"));
        }

        // roster snapshot is taken now; later enrolments do not join the group
        let mut classes: Vec<(i64, Vec<i64>)> = Vec::new();
        let mut seen: HashSet<i64> = HashSet::new();
        for class_id in target_class_ids {
            if !seen.insert(*class_id) {
                continue;
            }
            if class_session::Model::get_by_id(db, *class_id).await?.is_some() {
                let roster = class_session::Model::roster(db, *class_id).await?;
                classes.push((*class_id, roster));
            }
        }
        if classes.is_empty() {
            return Err(DomainError::not_found("No valid classes found"));
        }

        let txn = db.begin().await?;

        let assignment = ActiveModel {
            unit_id: Set(unit_id),
            title: Set(title.to_string()),
            description: Set(description.to_string()),
            start_day: Set(start_day),
            deadline: Set(deadline),
            max_marks: Set(max_marks),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for (class_id, roster) in &classes {
            let group = submission_group::ActiveModel {
                assignment_id: Set(assignment.id),
                class_id: Set(*class_id),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            for student_id in roster {
                student_submission::ActiveModel {
                    group_id: Set(group.id),
                    student_id: Set(*student_id),
                    submitted_at: Set(None),
                    file: Set(None),
                    grade: Set(None),
                }
                .insert(&txn)
                .await?;
            }
        }

        txn.commit().await?;
        Ok(assignment)
    }

    /// Records a student's hand-in.
    ///
    /// Rejected after the deadline no matter how often it is retried. A
    /// student who already has a submitted row keeps the original file and
    /// timestamp; the retry is a conflict. A pending skeleton row is
    /// completed in place; a student with no row at all (enrolled after
    /// distribution) gets a fresh one.
    pub async fn submit(
        db: &DatabaseConnection,
        assignment_id: i64,
        class_id: i64,
        student_id: i64,
        file: &str,
    ) -> Result<student_submission::Model, DomainError> {
        let Some(assignment) = Entity::find_by_id(assignment_id).one(db).await? else {
            return Err(DomainError::not_found("Assignment not found"));
        };
        if Utc::now() > assignment.deadline {
            return Err(DomainError::DeadlineExceeded);
        }

        let group = submission_group::Model::ensure(db, assignment_id, class_id).await?;

        let existing = student_submission::Entity::find_by_id((group.id, student_id))
            .one(db)
            .await?;

        match existing {
            Some(row) if row.submitted_at.is_some() => Err(DomainError::conflict(
                "Student has already submitted this assignment",
            )),
            Some(row) => {
                let mut active = row.into_active_model();
                active.submitted_at = Set(Some(Utc::now()));
                active.file = Set(Some(file.to_string()));
                Ok(active.update(db).await?)
            }
            None => {
                let row = student_submission::ActiveModel {
                    group_id: Set(group.id),
                    student_id: Set(student_id),
                    submitted_at: Set(Some(Utc::now())),
                    file: Set(Some(file.to_string())),
                    grade: Set(None),
                }
                .insert(db)
                .await?;
                Ok(row)
            }
        }
    }

    /// Applies a batch of grades to one class's submission group.
    ///
    /// Each grade is checked independently: out-of-range grades are reported
    /// in `skipped` and the rest still apply. Students with no row in the
    /// group are skipped too. Regrading overwrites, so the last accepted
    /// grade wins.
    pub async fn grade_many(
        db: &DatabaseConnection,
        assignment_id: i64,
        class_id: i64,
        grades: &[GradeSpec],
    ) -> Result<GradeOutcome, DomainError> {
        let Some(assignment) = Entity::find_by_id(assignment_id).one(db).await? else {
            return Err(DomainError::not_found("Assignment not found"));
        };
        let Some(group) = submission_group::Model::find_for(db, assignment_id, class_id).await?
        else {
            return Err(DomainError::not_found("Class submission not found"));
        };

        let mut outcome = GradeOutcome {
            applied: 0,
            skipped: Vec::new(),
        };

        for spec in grades {
            if spec.grade < 0.0 || spec.grade > assignment.max_marks {
                outcome.skipped.push(SkippedGrade {
                    student_id: spec.student_id,
                    reason: DomainError::OutOfRange {
                        grade: spec.grade,
                        max_marks: assignment.max_marks,
                    }
                    .to_string(),
                });
                continue;
            }
            let row = student_submission::Entity::find_by_id((group.id, spec.student_id))
                .one(db)
                .await?;
            let Some(row) = row else {
                outcome.skipped.push(SkippedGrade {
                    student_id: spec.student_id,
                    reason: "No submission entry for student".to_string(),
                });
                continue;
            };
            let mut active = row.into_active_model();
            active.grade = Set(Some(spec.grade));
            active.update(db).await?;
            outcome.applied += 1;
        }

        Ok(outcome)
    }

    pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn get_all(db: &DatabaseConnection) -> Result<Vec<Self>, DbErr> {
        Entity::find().order_by_asc(Column::Id).all(db).await
    }

    pub async fn by_unit(db: &DatabaseConnection, unit_id: i64) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::UnitId.eq(unit_id))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// Assignments distributed to a given class, via its submission groups.
    pub async fn by_class(db: &DatabaseConnection, class_id: i64) -> Result<Vec<Self>, DbErr> {
        let groups = submission_group::Entity::find()
            .filter(submission_group::Column::ClassId.eq(class_id))
            .all(db)
            .await?;
        let ids: Vec<i64> = groups.into_iter().map(|g| g.assignment_id).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Entity::find()
            .filter(Column::Id.is_in(ids))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// All submission groups of an assignment with their submission rows.
    pub async fn groups_with_submissions(
        db: &DatabaseConnection,
        assignment_id: i64,
    ) -> Result<Vec<(submission_group::Model, Vec<student_submission::Model>)>, DbErr> {
        submission_group::Entity::find()
            .filter(submission_group::Column::AssignmentId.eq(assignment_id))
            .order_by_asc(submission_group::Column::Id)
            .find_with_related(student_submission::Entity)
            .all(db)
            .await
    }

    /// Edits assignment metadata. Groups and submissions are untouched, even
    /// when the deadline moves.
    pub async fn edit(
        db: &DatabaseConnection,
        id: i64,
        title: Option<&str>,
        description: Option<&str>,
        start_day: Option<DateTime<Utc>>,
        deadline: Option<DateTime<Utc>>,
        max_marks: Option<f64>,
    ) -> Result<Self, DomainError> {
        let Some(assignment) = Entity::find_by_id(id).one(db).await? else {
            return Err(DomainError::not_found("Assignment not found"));
        };

        let new_start = start_day.unwrap_or(assignment.start_day);
        let new_deadline = deadline.unwrap_or(assignment.deadline);
        if new_deadline < new_start {
            return Err(DomainError::invalid_input(
                "Deadline cannot be before the start day",
            ));
        }
        if let Some(m) = max_marks {
            if m <= 0.0 {
                return Err(DomainError::invalid_input("Max marks must be positive"));
            }
        }

        let mut active = assignment.into_active_model();
        if let Some(t) = title {
            active.title = Set(t.to_string());
        }
        if let Some(d) = description {
            active.description = Set(d.to_string());
        }
        active.start_day = Set(new_start);
        active.deadline = Set(new_deadline);
        if let Some(m) = max_marks {
            active.max_marks = Set(m);
        }
        active.updated_at = Set(Utc::now());
        Ok(active.update(db).await?)
    }

    /// Hard delete; groups and submissions cascade with the row.
    pub async fn delete_by_id(db: &DatabaseConnection, id: i64) -> Result<bool, DbErr> {
        let result = Entity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::error::DomainError;
    use crate::models::{
        class_slot::{SlotSpec, Weekday},
        course, unit,
        user::{self, Role},
    };
    use crate::test_utils::setup_test_db;
    use student_submission::SubmissionStatus;

    struct Fixture {
        unit_id: i64,
        class_id: i64,
        student_ids: Vec<i64>,
    }

    async fn seed(db: &DatabaseConnection, students: usize) -> Fixture {
        let c = course::Model::create(db, "BSc Computer Science", None)
            .await
            .unwrap();
        let u = unit::Model::create(db, c.id, "ALG214", "Algorithms").await.unwrap();
        let t = user::Model::create(db, "teach1", "t1@test.com", Role::Teacher)
            .await
            .unwrap();

        let mut student_ids = Vec::new();
        for i in 0..students {
            let s = user::Model::create(
                db,
                &format!("stud{i}"),
                &format!("s{i}@test.com"),
                Role::Student,
            )
            .await
            .unwrap();
            student_ids.push(s.id);
        }

        let class = class_session::Model::create_checked(
            db,
            u.id,
            t.id,
            "Algorithms A",
            2026,
            1,
            &[SlotSpec {
                day: Weekday::Monday,
                time: "08:00 AM - 10:00 AM".to_string(),
            }],
            &student_ids,
        )
        .await
        .unwrap();

        Fixture {
            unit_id: u.id,
            class_id: class.id,
            student_ids,
        }
    }

    async fn open_assignment(db: &DatabaseConnection, fx: &Fixture, max_marks: f64) -> Model {
        Model::create_distributed(
            db,
            fx.unit_id,
            "Prac 1",
            "Implement a sorting visualiser",
            Utc::now() - Duration::days(1),
            Utc::now() + Duration::days(7),
            max_marks,
            &[fx.class_id],
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_distribution_creates_pending_skeleton() {
        let db = setup_test_db().await;
        let fx = seed(&db, 2).await;
        let assignment = open_assignment(&db, &fx, 100.0).await;

        let groups = Model::groups_with_submissions(&db, assignment.id).await.unwrap();
        assert_eq!(groups.len(), 1);
        let (group, rows) = &groups[0];
        assert_eq!(group.class_id, fx.class_id);
        assert_eq!(rows.len(), 2);
        for row in rows {
            assert_eq!(row.status(), SubmissionStatus::Pending);
            assert!(row.submitted_at.is_none());
            assert!(row.file.is_none());
            assert!(row.grade.is_none());
        }
    }

    #[tokio::test]
    async fn test_unknown_and_duplicate_classes_dropped() {
        let db = setup_test_db().await;
        let fx = seed(&db, 1).await;

        let assignment = Model::create_distributed(
            &db,
            fx.unit_id,
            "Prac 1",
            "desc",
            Utc::now(),
            Utc::now() + Duration::days(7),
            50.0,
            &[fx.class_id, fx.class_id, 999],
        )
        .await
        .unwrap();

        let groups = Model::groups_with_submissions(&db, assignment.id).await.unwrap();
        assert_eq!(groups.len(), 1);
    }

    #[tokio::test]
    async fn test_no_valid_classes_is_not_found() {
        let db = setup_test_db().await;
        let fx = seed(&db, 0).await;

        let err = Model::create_distributed(
            &db,
            fx.unit_id,
            "Prac 1",
            "desc",
            Utc::now(),
            Utc::now() + Duration::days(7),
            50.0,
            &[998, 999],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_deadline_before_start_rejected() {
        let db = setup_test_db().await;
        let fx = seed(&db, 0).await;

        let err = Model::create_distributed(
            &db,
            fx.unit_id,
            "Prac 1",
            "desc",
            Utc::now(),
            Utc::now() - Duration::days(1),
            50.0,
            &[fx.class_id],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_submit_completes_pending_row_in_place() {
        let db = setup_test_db().await;
        let fx = seed(&db, 2).await;
        let assignment = open_assignment(&db, &fx, 100.0).await;

        let row = Model::submit(&db, assignment.id, fx.class_id, fx.student_ids[0], "prac1.zip")
            .await
            .unwrap();
        assert_eq!(row.status(), SubmissionStatus::Submitted);
        assert_eq!(row.file.as_deref(), Some("prac1.zip"));

        // still exactly one row per rostered student
        let groups = Model::groups_with_submissions(&db, assignment.id).await.unwrap();
        assert_eq!(groups[0].1.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_submission_keeps_original() {
        let db = setup_test_db().await;
        let fx = seed(&db, 1).await;
        let assignment = open_assignment(&db, &fx, 100.0).await;
        let student = fx.student_ids[0];

        let first = Model::submit(&db, assignment.id, fx.class_id, student, "v1.zip")
            .await
            .unwrap();
        let err = Model::submit(&db, assignment.id, fx.class_id, student, "v2.zip")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let group = submission_group::Model::find_for(&db, assignment.id, fx.class_id)
            .await
            .unwrap()
            .unwrap();
        let row = student_submission::Entity::find_by_id((group.id, student))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.file.as_deref(), Some("v1.zip"));
        assert_eq!(row.submitted_at, first.submitted_at);
    }

    #[tokio::test]
    async fn test_late_submission_rejected_every_time() {
        let db = setup_test_db().await;
        let fx = seed(&db, 1).await;
        let assignment = Model::create_distributed(
            &db,
            fx.unit_id,
            "Prac 0",
            "desc",
            Utc::now() - Duration::days(14),
            Utc::now() - Duration::days(7),
            100.0,
            &[fx.class_id],
        )
        .await
        .unwrap();
        let student = fx.student_ids[0];

        for _ in 0..2 {
            let err = Model::submit(&db, assignment.id, fx.class_id, student, "late.zip")
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::DeadlineExceeded));
        }

        let groups = Model::groups_with_submissions(&db, assignment.id).await.unwrap();
        assert_eq!(groups[0].1[0].status(), SubmissionStatus::Pending);
    }

    #[tokio::test]
    async fn test_grade_bounds_and_regrade() {
        let db = setup_test_db().await;
        let fx = seed(&db, 2).await;
        let assignment = open_assignment(&db, &fx, 100.0).await;
        let (s1, s2) = (fx.student_ids[0], fx.student_ids[1]);

        Model::submit(&db, assignment.id, fx.class_id, s1, "a.zip")
            .await
            .unwrap();

        // max is in range, max + 1 is not; ungraded-but-pending rows still gradeable
        let outcome = Model::grade_many(
            &db,
            assignment.id,
            fx.class_id,
            &[
                GradeSpec { student_id: s1, grade: 100.0 },
                GradeSpec { student_id: s2, grade: 101.0 },
            ],
        )
        .await
        .unwrap();
        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].student_id, s2);

        let outcome = Model::grade_many(
            &db,
            assignment.id,
            fx.class_id,
            &[GradeSpec { student_id: s1, grade: 42.5 }],
        )
        .await
        .unwrap();
        assert_eq!(outcome.applied, 1);

        let group = submission_group::Model::find_for(&db, assignment.id, fx.class_id)
            .await
            .unwrap()
            .unwrap();
        let row = student_submission::Entity::find_by_id((group.id, s1))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.grade, Some(42.5));
        assert_eq!(row.status(), SubmissionStatus::Graded);
    }

    #[tokio::test]
    async fn test_grading_unknown_class_is_not_found() {
        let db = setup_test_db().await;
        let fx = seed(&db, 1).await;
        let assignment = open_assignment(&db, &fx, 100.0).await;

        let err = Model::grade_many(&db, assignment.id, 999, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_groups_survive_class_deletion() {
        let db = setup_test_db().await;
        let fx = seed(&db, 1).await;
        let assignment = open_assignment(&db, &fx, 100.0).await;

        assert!(class_session::Model::delete_by_id(&db, fx.class_id).await.unwrap());

        let groups = Model::groups_with_submissions(&db, assignment.id).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].1.len(), 1);
    }
}
