use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use util::state::AppState;

use crate::auth::guards::Empty;
use crate::response::{ApiResponse, domain_error_response};
use db::models::assignment;

/// DELETE /assignments/{assignment_id}
///
/// Hard deletes an assignment; its groups and submissions cascade.
pub async fn delete_assignment(
    State(state): State<AppState>,
    Path(assignment_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Empty>>) {
    match assignment::Model::delete_by_id(state.db(), assignment_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Empty,
                "Assignment deleted successfully",
            )),
        ),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Assignment not found")),
        ),
        Err(e) => domain_error_response(e.into()),
    }
}
