use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use util::state::AppState;
use validator::Validate;

use crate::response::{ApiResponse, domain_error_response};
use crate::routes::common::format_validation_errors;
use db::models::assignment;

use super::common::{AssignmentResponse, UpdateAssignmentRequest};

/// PUT /assignments/{assignment_id}
///
/// Updates assignment metadata. Distribution is not re-run: groups and
/// submissions stay as they are, even when the deadline moves.
pub async fn update_assignment(
    State(state): State<AppState>,
    Path(assignment_id): Path<i64>,
    Json(req): Json<UpdateAssignmentRequest>,
) -> (StatusCode, Json<ApiResponse<Option<AssignmentResponse>>>) {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(error_message)),
        );
    }

    let updated = assignment::Model::edit(
        state.db(),
        assignment_id,
        req.title.as_deref(),
        req.description.as_deref(),
        req.start_day,
        req.deadline,
        req.max_marks,
    )
    .await;

    match updated {
        Ok(a) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Some(AssignmentResponse::from(a)),
                "Assignment updated successfully",
            )),
        ),
        Err(e) => domain_error_response(e),
    }
}
