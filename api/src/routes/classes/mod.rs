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

pub use common::{ClassResponse, SlotRequest};
pub use delete::delete_class;
pub use get::list_classes;
pub use post::{create_class, mark_attendance};
pub use put::update_class;

use crate::auth::guards::{allow_authenticated, allow_teacher};

/// Builds the `/classes` route group. Listing is open to any authenticated
/// user; everything that mutates is teacher-or-above.
pub fn classes_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_classes).route_layer(from_fn(allow_authenticated)),
        )
        .route("/", post(create_class).route_layer(from_fn(allow_teacher)))
        .route(
            "/{class_id}",
            put(update_class).route_layer(from_fn(allow_teacher)),
        )
        .route(
            "/{class_id}",
            delete(delete_class).route_layer(from_fn(allow_teacher)),
        )
        .route(
            "/{class_id}/attendance",
            post(mark_attendance).route_layer(from_fn(allow_teacher)),
        )
}
