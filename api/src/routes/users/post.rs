use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use util::state::AppState;
use validator::Validate;

use crate::response::{ApiResponse, domain_error_response};
use crate::routes::common::{UserResponse, format_validation_errors};
use db::models::user::{self, NewUser, Role};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewUserRequest {
    #[validate(length(min = 3, max = 64, message = "Username must be 3 to 64 characters"))]
    pub username: String,

    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,

    pub role: Role,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterUsersRequest {
    #[validate(length(min = 1, message = "Request must include a non-empty list of users"))]
    #[validate(nested)]
    pub users: Vec<NewUserRequest>,
}

/// POST /users/bulk
///
/// Registers a batch of users in one shot, assigning each a role-prefixed
/// sequential user code. The batch is all-or-nothing: one duplicate username
/// or email fails the whole request.
///
/// ### Responses
/// - `201 Created` with the created users
/// - `400 Bad Request` on validation failure
/// - `400 Bad Request` when a username or email is already taken
pub async fn register_users(
    State(state): State<AppState>,
    Json(req): Json<RegisterUsersRequest>,
) -> (StatusCode, Json<ApiResponse<Vec<UserResponse>>>) {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(error_message)),
        );
    }

    let users: Vec<NewUser> = req
        .users
        .into_iter()
        .map(|u| NewUser {
            username: u.username,
            email: u.email,
            role: u.role,
        })
        .collect();

    match user::Model::register_many(state.db(), &users).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                created.into_iter().map(UserResponse::from).collect(),
                "Users registered successfully",
            )),
        ),
        Err(e) => domain_error_response(e),
    }
}
