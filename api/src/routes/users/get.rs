use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use util::state::AppState;

use crate::response::{ApiResponse, domain_error_response};
use db::models::user::{self, Role};

use crate::routes::common::UserResponse;

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<Role>,
}

/// GET /users
///
/// Lists users, optionally narrowed to one role (`?role=teacher`).
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> (StatusCode, Json<ApiResponse<Vec<UserResponse>>>) {
    let users = match query.role {
        Some(role) => user::Model::get_by_role(state.db(), role).await,
        None => user::Model::get_all(state.db()).await,
    };

    match users {
        Ok(users) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                users.into_iter().map(UserResponse::from).collect(),
                "Users fetched successfully",
            )),
        ),
        Err(e) => domain_error_response(e.into()),
    }
}

/// GET /users/{user_id}
///
/// Fetches a single user by id.
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Option<UserResponse>>>) {
    match user::Model::get_by_id(state.db(), user_id).await {
        Ok(Some(u)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Some(UserResponse::from(u)),
                "User fetched successfully",
            )),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        ),
        Err(e) => domain_error_response(e.into()),
    }
}
