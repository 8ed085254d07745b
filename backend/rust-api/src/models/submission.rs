use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A student's answers to one lesson's exercise block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSubmission {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub exercise_id: String,
    /// Question index (as a string) -> submitted answer text.
    #[serde(default)]
    pub answers: HashMap<String, String>,
    pub submitted_at: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitExercisePayload {
    pub course_id: String,
    pub lesson_id: String,
    #[serde(default)]
    pub answers: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitExerciseResponse {
    pub success: bool,
    pub submission_id: String,
    /// 0-100 scale, one decimal.
    pub score: f64,
    pub correct: usize,
    pub total: usize,
    pub message: String,
}
