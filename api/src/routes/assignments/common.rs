use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use db::models::{
    assignment, student_submission, student_submission::SubmissionStatus, submission_group,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssignmentRequest {
    pub unit_id: i64,

    #[validate(length(min = 1, max = 255, message = "Title must not be empty"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: String,

    pub start_day: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub max_marks: f64,
    pub class_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAssignmentRequest {
    #[validate(length(min = 1, max = 255, message = "Title must not be empty"))]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub start_day: Option<DateTime<Utc>>,
    pub deadline: Option<DateTime<Utc>>,
    pub max_marks: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRequest {
    pub class_id: i64,

    #[validate(length(min = 1, max = 512, message = "Submission file must not be empty"))]
    pub file: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GradeEntryRequest {
    pub student_id: i64,
    pub grade: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GradesRequest {
    #[validate(length(min = 1, message = "Request must include a non-empty list of grades"))]
    pub grades: Vec<GradeEntryRequest>,
}

#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    pub id: i64,
    pub unit_id: i64,
    pub title: String,
    pub description: String,
    pub start_day: String,
    pub deadline: String,
    pub max_marks: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<assignment::Model> for AssignmentResponse {
    fn from(a: assignment::Model) -> Self {
        Self {
            id: a.id,
            unit_id: a.unit_id,
            title: a.title,
            description: a.description,
            start_day: a.start_day.to_rfc3339(),
            deadline: a.deadline.to_rfc3339(),
            max_marks: a.max_marks,
            created_at: a.created_at.to_rfc3339(),
            updated_at: a.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub student_id: i64,
    pub status: SubmissionStatus,
    pub submitted_at: Option<String>,
    pub file: Option<String>,
    pub grade: Option<f64>,
}

impl From<student_submission::Model> for SubmissionResponse {
    fn from(s: student_submission::Model) -> Self {
        Self {
            student_id: s.student_id,
            status: s.status(),
            submitted_at: s.submitted_at.map(|t| t.to_rfc3339()),
            file: s.file,
            grade: s.grade,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub id: i64,
    pub class_id: i64,
    pub submissions: Vec<SubmissionResponse>,
}

impl GroupResponse {
    pub fn from_pair(
        group: submission_group::Model,
        submissions: Vec<student_submission::Model>,
    ) -> Self {
        Self {
            id: group.id,
            class_id: group.class_id,
            submissions: submissions
                .into_iter()
                .map(SubmissionResponse::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssignmentDetailResponse {
    #[serde(flatten)]
    pub assignment: AssignmentResponse,
    pub groups: Vec<GroupResponse>,
}
