use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn,
    routing::{get, post},
};
use serde::Deserialize;
use util::state::AppState;
use validator::Validate;

use crate::auth::guards::{allow_authenticated, allow_teacher};
use crate::response::{ApiResponse, domain_error_response};
use crate::routes::common::format_validation_errors;
use db::models::course;

pub fn courses_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_course).route_layer(from_fn(allow_teacher)))
        .route(
            "/",
            get(list_courses).route_layer(from_fn(allow_authenticated)),
        )
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 255, message = "Course name must not be empty"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
}

/// POST /courses
pub async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<CreateCourseRequest>,
) -> (StatusCode, Json<ApiResponse<Option<course::Model>>>) {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(error_message)),
        );
    }

    match course::Model::create(state.db(), &req.name, req.description.as_deref()).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                Some(created),
                "Course created successfully",
            )),
        ),
        Err(e) => domain_error_response(e.into()),
    }
}

/// GET /courses
pub async fn list_courses(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<course::Model>>>) {
    match course::Model::get_all(state.db()).await {
        Ok(courses) => (
            StatusCode::OK,
            Json(ApiResponse::success(courses, "Courses fetched successfully")),
        ),
        Err(e) => domain_error_response(e.into()),
    }
}
