use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, post, put},
};
use util::state::AppState;

mod common;
mod delete;
mod get;
mod post;
mod put;

pub use common::AssignmentResponse;
pub use delete::delete_assignment;
pub use get::{get_assignment, list_assignments, list_by_class, list_by_unit};
pub use post::{create_assignment, grade_class, submit_assignment};
pub use put::update_assignment;

use crate::auth::guards::{allow_authenticated, allow_teacher};

/// Builds the `/assignments` route group. Reads and submission are open to
/// any authenticated user; distribution, grading and edits are
/// teacher-or-above.
pub fn assignments_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_assignments).route_layer(from_fn(allow_authenticated)),
        )
        .route(
            "/",
            post(create_assignment).route_layer(from_fn(allow_teacher)),
        )
        .route(
            "/{assignment_id}",
            get(get_assignment).route_layer(from_fn(allow_authenticated)),
        )
        .route(
            "/{assignment_id}",
            put(update_assignment).route_layer(from_fn(allow_teacher)),
        )
        .route(
            "/{assignment_id}",
            delete(delete_assignment).route_layer(from_fn(allow_teacher)),
        )
        .route(
            "/class/{class_id}",
            get(list_by_class).route_layer(from_fn(allow_authenticated)),
        )
        .route(
            "/unit/{unit_id}",
            get(list_by_unit).route_layer(from_fn(allow_authenticated)),
        )
        .route(
            "/{assignment_id}/submit",
            post(submit_assignment).route_layer(from_fn(allow_authenticated)),
        )
        .route(
            "/{assignment_id}/classes/{class_id}/grades",
            post(grade_class).route_layer(from_fn(allow_teacher)),
        )
}
