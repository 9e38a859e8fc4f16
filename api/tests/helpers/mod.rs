use axum::Router;
use sea_orm::DatabaseConnection;

use api::routes::routes;
use db::test_utils::setup_test_db;
use util::{config::AppConfig, state::AppState};

/// Builds an app router over a fresh in-memory database. Returns the
/// connection too so tests can seed directly through the models.
pub async fn make_test_app() -> (Router, DatabaseConnection) {
    AppConfig::init_test_defaults();

    let db = setup_test_db().await;
    let app_state = AppState::new(db.clone());

    let router = Router::new().nest("/api", routes(app_state));
    (router, db)
}
