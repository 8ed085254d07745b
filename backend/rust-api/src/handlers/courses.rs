use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::{
    extractors::AppJson,
    handlers::ApiError,
    middlewares::session::CurrentUser,
    models::{
        course::{CreateCoursePayload, UpdateCoursePayload},
        user::Role,
    },
    services::{
        course_service::CourseService, progress_service::ProgressService,
        user_service::UserService, AppState,
    },
};

/// GET /courses - All courses, with the owning teacher's name attached
pub async fn list_courses(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let courses = CourseService::new(&state.store).list_all();
    let users = UserService::new(&state.store);

    let enriched: Vec<serde_json::Value> = courses
        .into_iter()
        .map(|course| {
            let teacher_name = users
                .find_by_id(&course.teacher_id)
                .map(|teacher| teacher.username)
                .unwrap_or_else(|| "Unknown".to_string());
            json!({
                "id": course.id,
                "title": course.title,
                "description": course.description,
                "teacher_id": course.teacher_id,
                "teacher_name": teacher_name,
                "lesson_count": course.lessons.len(),
                "created_at": course.created_at,
            })
        })
        .collect();

    Json(json!({ "success": true, "courses": enriched }))
}

/// GET /courses/{id} - One course with the caller's progress
pub async fn get_course(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(course_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let course = CourseService::new(&state.store)
        .get(&course_id)
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    let completed_lessons = ProgressService::new(&state.store)
        .for_course(&user.user_id, &course.id)
        .map(|record| record.completed_lessons)
        .unwrap_or_default();

    let is_owner = user.role == Role::Teacher && course.teacher_id == user.user_id;

    Ok(Json(json!({
        "success": true,
        "course": course,
        "completed_lessons": completed_lessons,
        "is_owner": is_owner,
    })))
}

/// POST /teacher/courses - Create a course
pub async fn create_course(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    AppJson(payload): AppJson<CreateCoursePayload>,
) -> Result<impl IntoResponse, ApiError> {
    if let Err(e) = payload.validate() {
        return Err(ApiError::bad_request(format!("Validation error: {}", e)));
    }

    let courses = CourseService::new(&state.store);
    let duplicate = courses
        .by_teacher(&user.user_id)
        .iter()
        .any(|course| course.title.to_lowercase() == payload.title.to_lowercase());
    if duplicate {
        return Err(ApiError::bad_request(
            "You already have a course with this title",
        ));
    }

    let course = courses.create(payload, &user.user_id)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "course": course })),
    ))
}

/// PUT /teacher/courses/{id} - Update an owned course
pub async fn update_course(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(course_id): Path<String>,
    AppJson(payload): AppJson<UpdateCoursePayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let courses = CourseService::new(&state.store);
    ensure_owner(&courses, &course_id, &user)?;

    courses.update(&course_id, payload)?;
    Ok(Json(json!({ "success": true })))
}

/// DELETE /teacher/courses/{id} - Delete an owned course
pub async fn delete_course(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(course_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let courses = CourseService::new(&state.store);
    ensure_owner(&courses, &course_id, &user)?;

    courses.delete(&course_id)?;
    tracing::info!("Course {} deleted by {}", course_id, user.username);
    Ok(Json(json!({ "success": true })))
}

fn ensure_owner(
    courses: &CourseService<'_>,
    course_id: &str,
    user: &CurrentUser,
) -> Result<(), ApiError> {
    let course = courses
        .get(course_id)
        .ok_or_else(|| ApiError::not_found("Course not found"))?;
    if course.teacher_id != user.user_id {
        return Err(ApiError::forbidden("You do not own this course"));
    }
    Ok(())
}
