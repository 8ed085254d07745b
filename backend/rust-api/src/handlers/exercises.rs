use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde_json::json;
use std::sync::Arc;

use crate::{
    extractors::AppJson,
    handlers::ApiError,
    middlewares::session::CurrentUser,
    models::{
        course::LessonQuestionView,
        submission::{SubmitExercisePayload, SubmitExerciseResponse},
    },
    services::{
        course_service::CourseService, grading_service, submission_service::SubmissionService,
        AppState,
    },
};

/// GET /exercises - Every lesson with an exercise block, without answer keys
pub async fn list_exercises(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let courses = CourseService::new(&state.store).list_all();

    let mut exercises = Vec::new();
    for course in &courses {
        for lesson in &course.lessons {
            if lesson.questions.is_empty() {
                continue;
            }
            let questions: Vec<LessonQuestionView> =
                lesson.questions.iter().map(LessonQuestionView::from).collect();
            exercises.push(json!({
                "course_id": course.id,
                "course_title": course.title,
                "lesson_id": lesson.id,
                "lesson_title": lesson.title,
                "questions": questions,
            }));
        }
    }

    Json(json!({ "success": true, "exercises": exercises }))
}

/// POST /exercises/submit - Grade a lesson exercise block
pub async fn submit_exercise(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    AppJson(payload): AppJson<SubmitExercisePayload>,
) -> Result<Json<SubmitExerciseResponse>, ApiError> {
    let course = CourseService::new(&state.store)
        .get(&payload.course_id)
        .ok_or_else(|| ApiError::not_found("Course not found"))?;
    let lesson = course
        .lessons
        .iter()
        .find(|lesson| lesson.id == payload.lesson_id)
        .ok_or_else(|| ApiError::not_found("Lesson not found in this course"))?;

    if lesson.questions.is_empty() {
        return Err(ApiError::bad_request("This lesson has no exercise"));
    }

    let (correct, total, score) = grading_service::grade_exercise(&lesson.questions, &payload.answers);

    let submission = SubmissionService::new(&state.store).record(
        &user.user_id,
        &payload.course_id,
        &payload.lesson_id,
        payload.answers,
    )?;

    tracing::info!(
        "Exercise {}/{} graded for {}: {}/{}",
        payload.course_id,
        payload.lesson_id,
        user.username,
        correct,
        total
    );

    Ok(Json(SubmitExerciseResponse {
        success: true,
        submission_id: submission.id,
        score,
        correct,
        total,
        message: format!("You answered {} of {} correctly", correct, total),
    }))
}

/// GET /teacher/submissions - Submissions across the teacher's courses
pub async fn view_submissions(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> impl IntoResponse {
    let course_ids: Vec<String> = CourseService::new(&state.store)
        .by_teacher(&user.user_id)
        .into_iter()
        .map(|course| course.id)
        .collect();

    let submissions = SubmissionService::new(&state.store).for_courses(&course_ids);
    Json(json!({ "success": true, "submissions": submissions }))
}
