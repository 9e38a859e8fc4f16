use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use util::state::AppState;

use crate::response::{ApiResponse, domain_error_response};
use db::models::{class_session, course, unit};
use db::queries;

/// GET /students/{student_id}/attendance
///
/// Flat chronological attendance history across every class the student is
/// enrolled in.
///
/// ### Responses
/// - `200 OK` with `[{date, subject, status}, ...]`
/// - `404 Not Found` when the student is in no class at all
pub async fn get_student_attendance(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
) -> (
    StatusCode,
    Json<ApiResponse<Vec<queries::AttendanceHistoryEntry>>>,
) {
    match queries::student_attendance_history(state.db(), student_id).await {
        Ok(history) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                history,
                "Attendance history fetched successfully",
            )),
        ),
        Err(e) => domain_error_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct StudentClassesQuery {
    pub year: Option<i32>,
    pub semester: Option<i32>,
}

/// GET /students/{student_id}/classes
pub async fn get_student_classes(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
    Query(query): Query<StudentClassesQuery>,
) -> (StatusCode, Json<ApiResponse<Vec<class_session::Model>>>) {
    match queries::classes_for_student(state.db(), student_id, query.year, query.semester).await {
        Ok(classes) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                classes,
                "Classes fetched successfully",
            )),
        ),
        Err(e) => domain_error_response(e.into()),
    }
}

/// GET /students/{student_id}/units
pub async fn get_student_units(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Vec<unit::Model>>>) {
    match queries::units_for_student(state.db(), student_id).await {
        Ok(units) => (
            StatusCode::OK,
            Json(ApiResponse::success(units, "Units fetched successfully")),
        ),
        Err(e) => domain_error_response(e.into()),
    }
}

/// GET /students/{student_id}/courses
pub async fn get_student_courses(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Vec<course::Model>>>) {
    match queries::courses_for_student(state.db(), student_id).await {
        Ok(courses) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                courses,
                "Courses fetched successfully",
            )),
        ),
        Err(e) => domain_error_response(e.into()),
    }
}
