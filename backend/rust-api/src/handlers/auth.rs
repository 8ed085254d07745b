use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::{
    extractors::AppJson,
    handlers::ApiError,
    middlewares::session::{CurrentUser, SESSION_COOKIE},
    models::user::{LoginPayload, RegisterPayload, Role, UserInfo},
    services::{user_service::UserService, AppState},
};

/// POST /api/auth/register - Create a student account
pub async fn register(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<RegisterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    if let Err(e) = payload.validate() {
        return Err(ApiError::bad_request(format!("Validation error: {}", e)));
    }

    let users = UserService::new(&state.store);
    if users.find_by_username(&payload.username).is_some() {
        return Err(ApiError::bad_request("Username already taken"));
    }

    tracing::info!("Registering new user: {}", payload.username);

    // Self-service registration always creates students; teacher accounts
    // are provisioned out of band.
    let user = users.register(
        &payload.username,
        &payload.password,
        &payload.email,
        Role::Student,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "user": UserInfo::from(&user) })),
    ))
}

/// POST /api/auth/login - Exchange credentials for a session cookie
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let users = UserService::new(&state.store);

    let user = users
        .find_by_username(&payload.username)
        .filter(|user| users.verify_password(user, &payload.password))
        .ok_or_else(|| {
            tracing::warn!("Failed login attempt for {}", payload.username);
            ApiError::unauthorized("Invalid username or password")
        })?;

    let session_id = state
        .sessions
        .create(&user.id, &user.username, user.role)
        .await;

    let cookie = Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    tracing::info!("User {} logged in", user.username);

    Ok((
        jar.add(cookie),
        Json(json!({ "success": true, "user": UserInfo::from(&user) })),
    ))
}

/// POST /api/auth/logout - Drop the server-side session
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Extension(user): Extension<CurrentUser>,
) -> impl IntoResponse {
    state.sessions.remove(&user.session_id).await;
    tracing::info!("User {} logged out", user.username);

    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());
    (jar, Json(json!({ "success": true })))
}

/// GET /api/auth/me - The logged-in identity
pub async fn me(Extension(user): Extension<CurrentUser>) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "user": {
            "id": user.user_id,
            "username": user.username,
            "role": user.role,
        }
    }))
}
