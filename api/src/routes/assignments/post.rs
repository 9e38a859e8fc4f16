use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use util::state::AppState;
use validator::Validate;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, domain_error_response};
use crate::routes::common::format_validation_errors;
use db::models::assignment::{self, GradeOutcome, GradeSpec};

use super::common::{
    AssignmentResponse, CreateAssignmentRequest, GradesRequest, SubmissionResponse, SubmitRequest,
};

/// POST /assignments
///
/// Creates an assignment and distributes it to the target classes: one
/// submission group per class, one pending row per rostered student.
///
/// ### Responses
/// - `201 Created` with the assignment
/// - `400 Bad Request` on validation failure or deadline before start day
/// - `404 Not Found` when no target class resolves
pub async fn create_assignment(
    State(state): State<AppState>,
    Json(req): Json<CreateAssignmentRequest>,
) -> (StatusCode, Json<ApiResponse<Option<AssignmentResponse>>>) {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(error_message)),
        );
    }

    let created = assignment::Model::create_distributed(
        state.db(),
        req.unit_id,
        &req.title,
        &req.description,
        req.start_day,
        req.deadline,
        req.max_marks,
        &req.class_ids,
    )
    .await;

    match created {
        Ok(a) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                Some(AssignmentResponse::from(a)),
                "Assignment created successfully",
            )),
        ),
        Err(e) => domain_error_response(e),
    }
}

/// POST /assignments/{assignment_id}/submit
///
/// Records the authenticated student's hand-in. Late submissions are
/// rejected no matter how often they are retried; a second submission is a
/// conflict and the original is kept.
///
/// ### Responses
/// - `201 Created` with the submission
/// - `400 Bad Request` after the deadline or on resubmission
/// - `404 Not Found` when the assignment does not exist
pub async fn submit_assignment(
    State(state): State<AppState>,
    Path(assignment_id): Path<i64>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<SubmitRequest>,
) -> (StatusCode, Json<ApiResponse<Option<SubmissionResponse>>>) {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(error_message)),
        );
    }

    match assignment::Model::submit(state.db(), assignment_id, req.class_id, claims.sub, &req.file)
        .await
    {
        Ok(row) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                Some(SubmissionResponse::from(row)),
                "Assignment submitted successfully",
            )),
        ),
        Err(e) => domain_error_response(e),
    }
}

/// POST /assignments/{assignment_id}/classes/{class_id}/grades
///
/// Applies a batch of grades to one class's submission group. Each grade is
/// checked independently; out-of-range or unmatched entries are reported in
/// `skipped` while the rest apply. Regrading overwrites.
///
/// ### Responses
/// - `200 OK` with `{applied, skipped}`
/// - `404 Not Found` when the assignment or its class group does not exist
pub async fn grade_class(
    State(state): State<AppState>,
    Path((assignment_id, class_id)): Path<(i64, i64)>,
    Json(req): Json<GradesRequest>,
) -> (StatusCode, Json<ApiResponse<Option<GradeOutcome>>>) {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(error_message)),
        );
    }

    let grades: Vec<GradeSpec> = req
        .grades
        .into_iter()
        .map(|g| GradeSpec {
            student_id: g.student_id,
            grade: g.grade,
        })
        .collect();

    match assignment::Model::grade_many(state.db(), assignment_id, class_id, &grades).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Some(outcome),
                "Grades applied successfully",
            )),
        ),
        Err(e) => domain_error_response(e),
    }
}
