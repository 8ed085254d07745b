use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::{
    extractors::AppJson,
    handlers::ApiError,
    middlewares::session::CurrentUser,
    models::{
        exam::{ExamDefinition, ExamSummary, Grade, QuestionView},
        result::{AttemptResult, SubmitExamRequest, SubmitExamResponse, TimeCheckResponse},
    },
    services::{
        catalog_service::ExamCatalog,
        exam_timer::{EntryOutcome, ExamSessionTracker, PollOutcome, SubmitCheck, SubmitRejection},
        grading_service,
        result_service::ResultLog,
        AppState,
    },
    utils::time::sortable_timestamp,
};

fn parse_grade(value: &str) -> Result<Grade, ApiError> {
    Grade::parse(value).ok_or_else(|| ApiError::not_found("Unknown grade"))
}

fn find_exam(state: &AppState, grade: Grade, exam_id: &str) -> Result<ExamDefinition, ApiError> {
    ExamCatalog::new(&state.store)
        .find(grade, exam_id)
        .ok_or_else(|| ApiError::not_found("Exam not found"))
}

/// GET /tracnghiem - The catalog, grouped by grade
pub async fn list_exams(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let catalog = ExamCatalog::new(&state.store);
    let mut grouped = serde_json::Map::new();

    for (grade, exams) in catalog.load_all() {
        let summaries: Vec<ExamSummary> = exams.iter().map(ExamSummary::from).collect();
        grouped.insert(grade.to_string(), json!(summaries));
    }

    Json(json!({ "success": true, "exams": grouped }))
}

#[derive(Debug, Deserialize)]
pub struct EnterExamQuery {
    #[serde(default)]
    pub reset: Option<String>,
}

/// GET /tracnghiem/lam-bai/{grade}/{exam_id} - Enter (or resume) an attempt
pub async fn enter_exam(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path((grade, exam_id)): Path<(String, String)>,
    Query(query): Query<EnterExamQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let grade = parse_grade(&grade)?;
    let exam = find_exam(&state, grade, &exam_id)?;
    let limit = exam.effective_time_limit();
    let reset = query.reset.as_deref() == Some("yes");

    let tracker = ExamSessionTracker::new(&state.sessions);
    let outcome = tracker
        .enter(&user.session_id, grade, &exam.id, limit, reset)
        .await;

    let remaining = match outcome {
        EntryOutcome::Started { remaining_seconds }
        | EntryOutcome::Resumed { remaining_seconds } => remaining_seconds,
        EntryOutcome::Expired => {
            return Err(ApiError::forbidden(
                "Time is up for this exam. Start again to get a new attempt.",
            ));
        }
    };

    let questions: Vec<QuestionView> = exam.questions.iter().map(QuestionView::from).collect();

    Ok(Json(json!({
        "success": true,
        "exam": {
            "id": exam.id,
            "grade": grade,
            "title": exam.title,
            "time_limit": limit,
            "questions": questions,
        },
        "remaining_time": remaining,
    })))
}

/// GET /api/tracnghiem/check-time/{grade}/{exam_id} - Countdown poll
pub async fn check_time(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path((grade, exam_id)): Path<(String, String)>,
) -> Result<Json<TimeCheckResponse>, ApiError> {
    let grade = parse_grade(&grade)?;
    let exam = find_exam(&state, grade, &exam_id)?;
    let limit = exam.effective_time_limit();

    let tracker = ExamSessionTracker::new(&state.sessions);
    let response = match tracker.check(&user.session_id, grade, &exam.id, limit).await {
        PollOutcome::Running { remaining_seconds } => TimeCheckResponse {
            success: true,
            remaining_time: remaining_seconds,
            is_expired: false,
            time_limit_minutes: Some(limit),
            message: None,
        },
        PollOutcome::Expired => TimeCheckResponse {
            success: true,
            remaining_time: 0,
            is_expired: true,
            time_limit_minutes: Some(limit),
            message: Some("Time is up".to_string()),
        },
    };

    Ok(Json(response))
}

/// POST /tracnghiem/nop-bai - Grade and record a submission
pub async fn submit_exam(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    AppJson(payload): AppJson<SubmitExamRequest>,
) -> Result<Json<SubmitExamResponse>, ApiError> {
    let grade = Grade::parse(&payload.grade)
        .ok_or_else(|| ApiError::bad_request("Invalid grade"))?;
    let exam = find_exam(&state, grade, &payload.exam_id)?;
    let limit = exam.effective_time_limit();

    let tracker = ExamSessionTracker::new(&state.sessions);
    let elapsed = match tracker
        .validate_submission(&user.session_id, grade, &exam.id, limit)
        .await
    {
        SubmitCheck::Accepted { elapsed_seconds } => elapsed_seconds,
        SubmitCheck::Rejected(rejection) => {
            let message = match rejection {
                SubmitRejection::MissingTimer => "No active attempt for this exam",
                SubmitRejection::Malformed => "Exam session is invalid, please restart",
                SubmitRejection::Expired => "Time is up, the submission was not accepted",
            };
            tracing::info!(
                "Rejected submission from {} for exam {}: {:?}",
                user.username,
                exam.id,
                rejection
            );
            return Err(ApiError::forbidden(message));
        }
    };

    let outcome = grading_service::grade_exam(&exam, &payload.answers);
    tracker.clear(&user.session_id, grade, &exam.id).await;

    let result = AttemptResult {
        user_id: user.user_id.clone(),
        username: user.username.clone(),
        grade,
        exam_id: exam.id.clone(),
        exam_title: exam.title.clone(),
        score: outcome.score,
        correct_count: outcome.correct_count,
        total_questions: outcome.total_questions,
        wrong_answers: outcome.wrong_answers.clone(),
        submitted_at: sortable_timestamp(chrono::Utc::now()),
        time_spent_seconds: elapsed,
    };

    // Grading already succeeded; a persistence failure loses the history
    // entry but not the student's feedback.
    if let Err(err) = ResultLog::new(&state.store).append(result) {
        tracing::error!("Failed to record exam result: {:#}", err);
    }

    tracing::info!(
        "Graded exam {} for {}: {}/{} ({})",
        exam.id,
        user.username,
        outcome.correct_count,
        outcome.total_questions,
        outcome.score
    );

    Ok(Json(SubmitExamResponse {
        success: true,
        score: outcome.score,
        correct_count: outcome.correct_count,
        total_questions: outcome.total_questions,
        wrong_answers: outcome.wrong_answers,
        message: "Submission graded".to_string(),
    }))
}

/// GET /tracnghiem/reset/{grade}/{exam_id} - Force a fresh timer
pub async fn reset_exam(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path((grade, exam_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let grade = parse_grade(&grade)?;
    let exam = find_exam(&state, grade, &exam_id)?;
    let limit = exam.effective_time_limit();

    let tracker = ExamSessionTracker::new(&state.sessions);
    tracker
        .enter(&user.session_id, grade, &exam.id, limit, true)
        .await;

    tracing::info!("Exam {} reset for {}", exam.id, user.username);

    Ok(Json(json!({
        "success": true,
        "remaining_time": u64::from(limit) * 60,
        "message": "Timer restarted",
    })))
}

/// GET /tracnghiem/lich-su - The student's attempt history, newest first
pub async fn attempt_history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> impl IntoResponse {
    let results = ResultLog::new(&state.store).list_for_student(&user.user_id);
    Json(json!({ "success": true, "results": results }))
}

/// GET /tracnghiem/ket-qua/{grade}/{exam_id} - Latest result for one exam
pub async fn latest_result(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path((grade, exam_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let grade = parse_grade(&grade)?;

    let result = ResultLog::new(&state.store)
        .latest_for(&user.user_id, grade, &exam_id)
        .ok_or_else(|| ApiError::not_found("No result for this exam yet"))?;

    Ok(Json(json!({ "success": true, "result": result })))
}
