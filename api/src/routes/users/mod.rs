use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use util::state::AppState;

mod get;
mod post;

pub use get::{get_user, list_users};
pub use post::register_users;

use crate::auth::guards::{allow_admin, allow_authenticated, allow_teacher};

/// Builds the `/users` route group. Registration is admin-only; the role
/// directory is staff-level; single lookups need any authenticated user.
pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/bulk", post(register_users).route_layer(from_fn(allow_admin)))
        .route("/", get(list_users).route_layer(from_fn(allow_teacher)))
        .route(
            "/{user_id}",
            get(get_user).route_layer(from_fn(allow_authenticated)),
        )
}
