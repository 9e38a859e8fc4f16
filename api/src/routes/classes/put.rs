use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use util::state::AppState;
use validator::Validate;

use crate::response::{ApiResponse, domain_error_response};
use crate::routes::common::format_validation_errors;
use db::models::{class_session, class_slot::SlotSpec};

use super::common::{ClassResponse, UpdateClassRequest};

/// PUT /classes/{class_id}
///
/// Updates class metadata. Roster and attendance history are preserved;
/// supplying `slots` replaces the weekly slots, supplying `student_ids`
/// enrolls additional students.
///
/// ### Responses
/// - `200 OK` with the updated class
/// - `404 Not Found` when the class does not exist
pub async fn update_class(
    State(state): State<AppState>,
    Path(class_id): Path<i64>,
    Json(req): Json<UpdateClassRequest>,
) -> (StatusCode, Json<ApiResponse<Option<ClassResponse>>>) {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(error_message)),
        );
    }

    let slots: Option<Vec<SlotSpec>> = req
        .slots
        .map(|slots| slots.into_iter().map(SlotSpec::from).collect());

    let updated = class_session::Model::update_details(
        state.db(),
        class_id,
        req.unit_id,
        req.teacher_id,
        req.name.as_deref(),
        req.year,
        req.semester,
        slots.as_deref(),
    )
    .await;

    let class = match updated {
        Ok(class) => class,
        Err(e) => return domain_error_response(e),
    };

    if let Some(student_ids) = &req.student_ids {
        if let Err(e) = class_session::Model::enroll(state.db(), class_id, student_ids).await {
            return domain_error_response(e);
        }
    }

    match ClassResponse::load(state.db(), class).await {
        Ok(response) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Some(response),
                "Class updated successfully",
            )),
        ),
        Err(e) => domain_error_response(e),
    }
}
