#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use eduportal_api::{
    config::Config,
    models::user::{Role, UserRecord},
    services::AppState,
};

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub data_dir: PathBuf,
}

pub fn test_config(data_dir: &PathBuf) -> Config {
    Config {
        data_dir: data_dir.clone(),
        bind_addr: "127.0.0.1:0".to_string(),
        session_ttl_hours: 2,
        gemini_api_url: "http://127.0.0.1:9/generate".to_string(),
        gemini_api_key: String::new(),
    }
}

pub fn create_test_app() -> TestApp {
    // Initialize tracing for tests
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let data_dir = std::env::temp_dir().join(format!("eduportal-test-{}", Uuid::new_v4()));

    let state = Arc::new(
        AppState::new(test_config(&data_dir)).expect("Failed to initialize test app state"),
    );

    seed_exams(&data_dir);

    TestApp {
        router: eduportal_api::create_router(state.clone()),
        state,
        data_dir,
    }
}

/// Grade 10 catalog with one 15-minute exam of two questions.
fn seed_exams(data_dir: &PathBuf) {
    let exams = json!({
        "exams": [{
            "id": "E1",
            "title": "Geography basics",
            "time_limit": 15,
            "questions": [
                {
                    "id": 1,
                    "number": 1,
                    "question": "What is the capital of France?",
                    "options": ["A. Paris", "B. Lyon", "C. London", "D. Nice"],
                    "correct_answer": "A. Paris",
                    "explanation": "Paris has been the capital since 987."
                },
                {
                    "id": 2,
                    "number": 2,
                    "question": "What is the capital of Canada?",
                    "options": ["A. Toronto", "B. Ottawa", "C. Vancouver", "D. Montreal"],
                    "correct_answer": "B. Ottawa",
                    "explanation": ""
                }
            ]
        }]
    });

    std::fs::create_dir_all(data_dir).expect("Failed to create test data dir");
    std::fs::write(
        data_dir.join("lop10.json"),
        serde_json::to_string_pretty(&exams).unwrap(),
    )
    .expect("Failed to seed exam catalog");
}

pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        json!(null)
    } else {
        serde_json::from_slice(&bytes).unwrap_or(json!(null))
    };
    (status, json)
}

pub async fn send_get(
    app: &Router,
    uri: &str,
    cookie: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        json!(null)
    } else {
        serde_json::from_slice(&bytes).unwrap_or(json!(null))
    };
    (status, json)
}

/// Registers a student and logs in, returning the `sid` cookie pair.
pub async fn register_and_login(app: &Router, username: &str) -> String {
    let (status, _) = send_json(
        app,
        "POST",
        "/api/auth/register",
        None,
        json!({
            "username": username,
            "password": "Secret123",
            "email": format!("{}@example.com", username),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    login(app, username).await
}

pub async fn login(app: &Router, username: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "username": username, "password": "Secret123" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get("set-cookie")
        .expect("login should set a session cookie")
        .to_str()
        .unwrap();

    // "sid=<value>; Path=/; ..." -> "sid=<value>"
    set_cookie
        .split(';')
        .next()
        .expect("cookie should have a value")
        .to_string()
}

/// Registers a student, promotes the stored record to teacher, then logs in.
pub async fn register_teacher_and_login(app: &TestApp, username: &str) -> String {
    let (status, _) = send_json(
        &app.router,
        "POST",
        "/api/auth/register",
        None,
        json!({
            "username": username,
            "password": "Secret123",
            "email": format!("{}@example.com", username),
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let mut users: Vec<UserRecord> = app.state.store.load("users").unwrap();
    for user in &mut users {
        if user.username == username {
            user.role = Role::Teacher;
        }
    }
    app.state.store.save("users", &users).unwrap();

    login(&app.router, username).await
}
