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
use db::models::{course, unit};

pub fn units_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_unit).route_layer(from_fn(allow_teacher)))
        .route(
            "/",
            get(list_units).route_layer(from_fn(allow_authenticated)),
        )
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUnitRequest {
    pub course_id: i64,

    #[validate(length(min = 1, max = 16, message = "Unit code must not be empty"))]
    pub code: String,

    #[validate(length(min = 1, max = 255, message = "Unit name must not be empty"))]
    pub name: String,
}

/// POST /units
pub async fn create_unit(
    State(state): State<AppState>,
    Json(req): Json<CreateUnitRequest>,
) -> (StatusCode, Json<ApiResponse<Option<unit::Model>>>) {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(error_message)),
        );
    }

    // FK error from SQLite is opaque, check the course up front
    match course::Model::get_by_id(state.db(), req.course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Course not found")),
            );
        }
        Err(e) => return domain_error_response(e.into()),
    }

    match unit::Model::create(state.db(), req.course_id, &req.code, &req.name).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                Some(created),
                "Unit created successfully",
            )),
        ),
        Err(e) => domain_error_response(e.into()),
    }
}

/// GET /units
pub async fn list_units(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<unit::Model>>>) {
    match unit::Model::get_all(state.db()).await {
        Ok(units) => (
            StatusCode::OK,
            Json(ApiResponse::success(units, "Units fetched successfully")),
        ),
        Err(e) => domain_error_response(e.into()),
    }
}
