#![allow(dead_code)]

use axum::{
    http::{header, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use services::AppState;

pub fn create_router(app_state: std::sync::Arc<services::AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any); // TODO: restrict to specific origins in production

    // Public endpoints (no session required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login));

    // Any authenticated user
    let authed_routes = Router::new()
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/me", get(handlers::auth::me))
        .route("/courses", get(handlers::courses::list_courses))
        .route("/courses/{id}", get(handlers::courses::get_course))
        .route("/documents", get(handlers::documents::list_documents))
        .route("/progress", post(handlers::progress::update_progress))
        .route("/api/chat", post(handlers::chat::chat));

    // Students only: exams and lesson exercises
    let student_routes = Router::new()
        .route("/tracnghiem", get(handlers::exams::list_exams))
        .route(
            "/tracnghiem/lam-bai/{grade}/{exam_id}",
            get(handlers::exams::enter_exam),
        )
        .route(
            "/api/tracnghiem/check-time/{grade}/{exam_id}",
            get(handlers::exams::check_time),
        )
        .route("/tracnghiem/nop-bai", post(handlers::exams::submit_exam))
        .route(
            "/tracnghiem/reset/{grade}/{exam_id}",
            get(handlers::exams::reset_exam),
        )
        .route("/tracnghiem/lich-su", get(handlers::exams::attempt_history))
        .route(
            "/tracnghiem/ket-qua/{grade}/{exam_id}",
            get(handlers::exams::latest_result),
        )
        .route("/exercises", get(handlers::exercises::list_exercises))
        .route(
            "/exercises/submit",
            post(handlers::exercises::submit_exercise),
        )
        .route_layer(middleware::from_fn(
            middlewares::session::student_guard_middleware,
        ));

    // Teachers only: content management and oversight
    let teacher_routes = Router::new()
        .route("/teacher/courses", post(handlers::courses::create_course))
        .route(
            "/teacher/courses/{id}",
            put(handlers::courses::update_course).delete(handlers::courses::delete_course),
        )
        .route("/teacher/documents", post(handlers::documents::add_document))
        .route(
            "/teacher/progress",
            get(handlers::progress::students_progress),
        )
        .route(
            "/teacher/submissions",
            get(handlers::exercises::view_submissions),
        )
        .route_layer(middleware::from_fn(
            middlewares::session::teacher_guard_middleware,
        ));

    let protected_routes = authed_routes
        .merge(student_routes)
        .merge(teacher_routes)
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            middlewares::session::session_middleware,
        ));

    public_routes
        .merge(protected_routes)
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
