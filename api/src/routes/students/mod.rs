use axum::{Router, middleware::from_fn, routing::get};
use util::state::AppState;

mod get;

pub use get::{
    get_student_attendance, get_student_classes, get_student_courses, get_student_units,
};

use crate::auth::guards::allow_authenticated;

/// Builds the `/students` route group: per-student read-only rollups.
pub fn students_routes() -> Router<AppState> {
    Router::new()
        .route("/{student_id}/attendance", get(get_student_attendance))
        .route("/{student_id}/classes", get(get_student_classes))
        .route("/{student_id}/units", get(get_student_units))
        .route("/{student_id}/courses", get(get_student_courses))
        .route_layer(from_fn(allow_authenticated))
}
