use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde_json::json;
use std::sync::Arc;

use crate::{
    extractors::AppJson,
    handlers::ApiError,
    middlewares::session::CurrentUser,
    models::progress::UpdateProgressPayload,
    services::{course_service::CourseService, progress_service::ProgressService, AppState},
};

/// POST /progress - Mark a lesson completed (or not) for the caller
pub async fn update_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    AppJson(payload): AppJson<UpdateProgressPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let course = CourseService::new(&state.store)
        .get(&payload.course_id)
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    if !course.lessons.iter().any(|lesson| lesson.id == payload.lesson_id) {
        return Err(ApiError::not_found("Lesson not found in this course"));
    }

    let record = ProgressService::new(&state.store).mark_lesson(
        &user.user_id,
        &payload.course_id,
        &payload.lesson_id,
        payload.completed,
    )?;

    Ok(Json(json!({
        "success": true,
        "completed_lessons": record.completed_lessons,
        "total_lessons": course.lessons.len(),
    })))
}

/// GET /teacher/progress - Completion overview across the teacher's courses
pub async fn students_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> impl IntoResponse {
    let courses = CourseService::new(&state.store).by_teacher(&user.user_id);
    let rows = ProgressService::new(&state.store).overview_for_teacher(&courses);

    Json(json!({ "success": true, "progress": rows }))
}
