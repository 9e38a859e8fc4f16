use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use util::state::AppState;
use validator::Validate;

use crate::response::{ApiResponse, domain_error_response};
use crate::routes::common::format_validation_errors;
use db::models::{attendance_record, class_session, class_slot::SlotSpec};

use super::common::{
    AttendanceRecordResponse, ClassResponse, CreateClassRequest, MarkAttendanceRequest,
};

/// POST /classes
///
/// Creates a class after the schedule conflict check: an exact `(day, time)`
/// slot collision or the same teacher already teaching in that `(year,
/// semester)` rejects the request.
///
/// ### Responses
/// - `201 Created` with the class, its slots and roster
/// - `400 Bad Request` on validation failure or schedule conflict
pub async fn create_class(
    State(state): State<AppState>,
    Json(req): Json<CreateClassRequest>,
) -> (StatusCode, Json<ApiResponse<Option<ClassResponse>>>) {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(error_message)),
        );
    }

    let slots: Vec<SlotSpec> = req.slots.into_iter().map(SlotSpec::from).collect();

    let created = class_session::Model::create_checked(
        state.db(),
        req.unit_id,
        req.teacher_id,
        &req.name,
        req.year,
        req.semester,
        &slots,
        &req.student_ids,
    )
    .await;

    match created {
        Ok(class) => match ClassResponse::load(state.db(), class).await {
            Ok(response) => (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    Some(response),
                    "Class created successfully",
                )),
            ),
            Err(e) => domain_error_response(e),
        },
        Err(e) => domain_error_response(e),
    }
}

/// POST /classes/{class_id}/attendance
///
/// Marks attendance for one calendar date. Re-marking the same date replaces
/// that date's entries wholesale; entries for students outside the roster
/// are dropped.
///
/// ### Responses
/// - `200 OK` with the class's full attendance listing
/// - `404 Not Found` when the class does not exist
/// - `400 Bad Request` on an empty roster or no valid entries
pub async fn mark_attendance(
    State(state): State<AppState>,
    Path(class_id): Path<i64>,
    Json(req): Json<MarkAttendanceRequest>,
) -> (StatusCode, Json<ApiResponse<Vec<AttendanceRecordResponse>>>) {
    if let Err(validation_errors) = req.validate() {
        let error_message = format_validation_errors(&validation_errors);
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(error_message)),
        );
    }

    let entries: Vec<attendance_record::EntrySpec> = req
        .entries
        .into_iter()
        .map(|e| attendance_record::EntrySpec {
            student_id: e.student_id,
            status: e.status,
        })
        .collect();

    match attendance_record::Model::mark(state.db(), class_id, req.date, &req.topic, &entries)
        .await
    {
        Ok(listing) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                listing
                    .into_iter()
                    .map(|(record, entries)| AttendanceRecordResponse::from_pair(record, entries))
                    .collect(),
                "Attendance marked successfully",
            )),
        ),
        Err(e) => domain_error_response(e),
    }
}
