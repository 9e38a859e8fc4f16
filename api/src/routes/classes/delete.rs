use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use util::state::AppState;

use crate::auth::guards::Empty;
use crate::response::{ApiResponse, domain_error_response};
use db::models::class_session;

/// DELETE /classes/{class_id}
///
/// Hard deletes a class; its slots, roster and attendance records go with
/// it. Submission groups distributed to the class are untouched.
pub async fn delete_class(
    State(state): State<AppState>,
    Path(class_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Empty>>) {
    match class_session::Model::delete_by_id(state.db(), class_id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(ApiResponse::success(Empty, "Class deleted successfully")),
        ),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Class not found")),
        ),
        Err(e) => domain_error_response(e.into()),
    }
}
