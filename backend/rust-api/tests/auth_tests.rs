use axum::http::StatusCode;
use serde_json::json;

mod common;

use common::{create_test_app, register_and_login, register_teacher_and_login, send_get, send_json};

#[tokio::test]
async fn register_login_me_logout_round_trip() {
    let app = create_test_app();

    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/auth/register",
        None,
        json!({
            "username": "alice",
            "password": "Secret123",
            "email": "alice@example.com"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["username"], json!("alice"));
    assert_eq!(body["user"]["role"], json!("student"));

    let cookie = common::login(&app.router, "alice").await;

    let (status, me) = send_get(&app.router, "/api/auth/me", Some(&cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["user"]["username"], json!("alice"));

    let (status, _) = send_json(&app.router, "POST", "/api/auth/logout", Some(&cookie), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);

    // The server-side session is gone even if the client kept the cookie.
    let (status, _) = send_get(&app.router, "/api/auth/me", Some(&cookie)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = create_test_app();
    register_and_login(&app.router, "bob").await;

    let (status, body) = send_json(
        &app.router,
        "POST",
        "/api/auth/login",
        None,
        json!({ "username": "bob", "password": "not-it" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn register_rejects_duplicates_and_invalid_payloads() {
    let app = create_test_app();
    register_and_login(&app.router, "carol").await;

    let (status, _) = send_json(
        &app.router,
        "POST",
        "/api/auth/register",
        None,
        json!({
            "username": "carol",
            "password": "Secret123",
            "email": "carol2@example.com"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(
        &app.router,
        "POST",
        "/api/auth/register",
        None,
        json!({
            "username": "dj",
            "password": "short",
            "email": "not-an-email"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let app = create_test_app();

    let (status, _) = send_get(&app.router, "/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_get(&app.router, "/tracnghiem", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_get(&app.router, "/tracnghiem", Some("sid=bogus")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn role_guards_hold_on_both_sides() {
    let app = create_test_app();
    let student = register_and_login(&app.router, "student_roles").await;
    let teacher = register_teacher_and_login(&app, "teacher_roles").await;

    // Students cannot reach teacher surfaces.
    let (status, _) = send_get(&app.router, "/teacher/progress", Some(&student)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Teachers cannot sit exams.
    let (status, _) = send_get(&app.router, "/tracnghiem", Some(&teacher)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // And each side can reach its own.
    let (status, _) = send_get(&app.router, "/teacher/progress", Some(&teacher)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send_get(&app.router, "/tracnghiem", Some(&student)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_reports_storage() {
    let app = create_test_app();

    let (status, body) = send_get(&app.router, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["service"], json!("eduportal-api"));
}
