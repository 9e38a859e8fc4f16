use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use util::state::AppState;

use crate::response::{ApiResponse, domain_error_response};
use db::models::class_session;

use super::common::ClassResponse;

#[derive(Debug, Deserialize)]
pub struct ListClassesQuery {
    pub year: Option<i32>,
    pub semester: Option<i32>,
    pub unit_id: Option<i64>,
    pub search: Option<String>,
}

/// GET /classes
///
/// Lists classes, optionally filtered by year, semester, unit and a name
/// substring search.
pub async fn list_classes(
    State(state): State<AppState>,
    Query(query): Query<ListClassesQuery>,
) -> (StatusCode, Json<ApiResponse<Vec<ClassResponse>>>) {
    let classes = match class_session::Model::filter(
        state.db(),
        query.year,
        query.semester,
        query.unit_id,
        query.search.as_deref(),
    )
    .await
    {
        Ok(classes) => classes,
        Err(e) => return domain_error_response(e.into()),
    };

    let mut responses = Vec::with_capacity(classes.len());
    for class in classes {
        match ClassResponse::load(state.db(), class).await {
            Ok(response) => responses.push(response),
            Err(e) => return domain_error_response(e),
        }
    }

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            responses,
            "Classes fetched successfully",
        )),
    )
}
