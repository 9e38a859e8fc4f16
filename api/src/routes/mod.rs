//! HTTP route entry point for `/api/...`.
//!
//! Routes are organized by domain, each route protected via the appropriate
//! access control middleware:
//! - `/health` → Health check endpoint (public)
//! - `/users` → Registration (admin-only) and lookup
//! - `/courses`, `/units` → Curriculum catalogue (writes are teacher-or-above)
//! - `/classes` → Class scheduling, rosters and attendance marking
//! - `/assignments` → Assignment distribution, submission and grading
//! - `/students` → Per-student rollups (attendance history, classes, units, courses)

use crate::routes::{
    assignments::assignments_routes, classes::classes_routes, courses::courses_routes,
    health::health_routes, students::students_routes, units::units_routes, users::users_routes,
};
use axum::Router;
use util::state::AppState;

pub mod assignments;
pub mod classes;
pub mod common;
pub mod courses;
pub mod health;
pub mod students;
pub mod units;
pub mod users;

/// Builds the complete application router for all HTTP endpoints.
///
/// The returned router has `AppState` as its state type and mounts all core
/// API routes under their respective base paths. Guards are applied per
/// route inside each group, since most groups mix read access for students
/// with teacher-gated writes.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/users", users_routes())
        .nest("/courses", courses_routes())
        .nest("/units", units_routes())
        .nest("/classes", classes_routes())
        .nest("/assignments", assignments_routes())
        .nest("/students", students_routes())
        .with_state(app_state)
}
