use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use util::state::AppState;

use crate::response::{ApiResponse, domain_error_response};
use db::models::assignment;

use super::common::{AssignmentDetailResponse, AssignmentResponse, GroupResponse};

/// GET /assignments
pub async fn list_assignments(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<AssignmentResponse>>>) {
    match assignment::Model::get_all(state.db()).await {
        Ok(assignments) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                assignments.into_iter().map(AssignmentResponse::from).collect(),
                "Assignments fetched successfully",
            )),
        ),
        Err(e) => domain_error_response(e.into()),
    }
}

/// GET /assignments/{assignment_id}
///
/// Fetches one assignment with its submission groups and their per-student
/// lifecycle state.
pub async fn get_assignment(
    State(state): State<AppState>,
    Path(assignment_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Option<AssignmentDetailResponse>>>) {
    let found = match assignment::Model::get_by_id(state.db(), assignment_id).await {
        Ok(found) => found,
        Err(e) => return domain_error_response(e.into()),
    };
    let Some(a) = found else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Assignment not found")),
        );
    };

    match assignment::Model::groups_with_submissions(state.db(), assignment_id).await {
        Ok(groups) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Some(AssignmentDetailResponse {
                    assignment: AssignmentResponse::from(a),
                    groups: groups
                        .into_iter()
                        .map(|(group, subs)| GroupResponse::from_pair(group, subs))
                        .collect(),
                }),
                "Assignment fetched successfully",
            )),
        ),
        Err(e) => domain_error_response(e.into()),
    }
}

/// GET /assignments/class/{class_id}
pub async fn list_by_class(
    State(state): State<AppState>,
    Path(class_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Vec<AssignmentResponse>>>) {
    match assignment::Model::by_class(state.db(), class_id).await {
        Ok(assignments) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                assignments.into_iter().map(AssignmentResponse::from).collect(),
                "Assignments fetched successfully",
            )),
        ),
        Err(e) => domain_error_response(e.into()),
    }
}

/// GET /assignments/unit/{unit_id}
pub async fn list_by_unit(
    State(state): State<AppState>,
    Path(unit_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Vec<AssignmentResponse>>>) {
    match assignment::Model::by_unit(state.db(), unit_id).await {
        Ok(assignments) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                assignments.into_iter().map(AssignmentResponse::from).collect(),
                "Assignments fetched successfully",
            )),
        ),
        Err(e) => domain_error_response(e.into()),
    }
}
