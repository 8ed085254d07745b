use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use std::sync::Arc;

use crate::models::user::Role;
use crate::services::AppState;

/// Cookie carrying the opaque server-side session id.
pub const SESSION_COOKIE: &str = "sid";

/// Resolved identity, inserted as an Extension by `session_middleware`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub session_id: String,
    pub user_id: String,
    pub username: String,
    pub role: Role,
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "message": message })),
    )
        .into_response()
}

fn forbidden(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "success": false, "message": message })),
    )
        .into_response()
}

/// Resolves the `sid` cookie against the session store and stores the
/// identity in request extensions for handlers to use.
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let session_id = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| unauthorized("Login required"))?;

    let session = state.sessions.get(&session_id).await.ok_or_else(|| {
        tracing::debug!("Rejected request with unknown or expired session");
        unauthorized("Session expired, please log in again")
    })?;

    tracing::debug!("Authenticated user: {} ({:?})", session.username, session.role);

    request.extensions_mut().insert(CurrentUser {
        session_id,
        user_id: session.user_id,
        username: session.username,
        role: session.role,
    });

    Ok(next.run(request).await)
}

pub async fn student_guard_middleware(request: Request, next: Next) -> Result<Response, Response> {
    match request.extensions().get::<CurrentUser>() {
        Some(user) if user.role == Role::Student => Ok(next.run(request).await),
        _ => {
            tracing::warn!("Access denied: student role required");
            Err(forbidden("Student account required"))
        }
    }
}

pub async fn teacher_guard_middleware(request: Request, next: Next) -> Result<Response, Response> {
    match request.extensions().get::<CurrentUser>() {
        Some(user) if user.role == Role::Teacher => Ok(next.run(request).await),
        _ => {
            tracing::warn!("Access denied: teacher role required");
            Err(forbidden("Teacher account required"))
        }
    }
}
