//! Role based access guards applied via `route_layer(from_fn(...))`.
//!
//! Roles are global and ordered (`admin > teacher > student`), so a guard is
//! just a floor on the role carried in the verified claim.

use axum::{
    Json,
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use db::models::user::Role;

use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;

#[derive(serde::Serialize, Default)]
pub struct Empty;

/// Extracts and validates the user from the request, then re-inserts the
/// claim into request extensions for handlers to pick up.
async fn extract_and_insert_authuser(
    req: Request<Body>,
) -> Result<(Request<Body>, AuthUser), (StatusCode, Json<ApiResponse<Empty>>)> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Authentication required")),
            )
        })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

async fn require_at_least(
    floor: Role,
    denial: &'static str,
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (req, user) = extract_and_insert_authuser(req).await?;

    if user.0.role < floor {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error(denial)),
        ));
    }

    Ok(next.run(req).await)
}

/// Basic guard to ensure the request is authenticated.
pub async fn allow_authenticated(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (req, _user) = extract_and_insert_authuser(req).await?;
    Ok(next.run(req).await)
}

/// Teacher-or-above guard.
pub async fn allow_teacher(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    require_at_least(Role::Teacher, "Teacher access required", req, next).await
}

/// Admin-only guard.
pub async fn allow_admin(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    require_at_least(Role::Admin, "Admin access required", req, next).await
}
