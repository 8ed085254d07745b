use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::exam::Grade;

/// One graded pass through one exam, as persisted in the result log.
/// Append-only: records are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptResult {
    pub user_id: String,
    pub username: String,
    pub grade: Grade,
    pub exam_id: String,
    pub exam_title: String,
    /// 0-10 scale, rounded to two decimals.
    pub score: f64,
    pub correct_count: usize,
    pub total_questions: usize,
    #[serde(default)]
    pub wrong_answers: Vec<WrongAnswer>,
    /// `%Y-%m-%d %H:%M:%S`, chosen so that lexicographic order is
    /// chronological order.
    pub submitted_at: String,
    pub time_spent_seconds: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WrongAnswer {
    pub question_number: u32,
    pub question_text: String,
    pub user_answer: String,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitExamRequest {
    pub grade: String,
    pub exam_id: String,
    /// Question id (as a string) -> submitted answer text.
    #[serde(default)]
    pub answers: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitExamResponse {
    pub success: bool,
    pub score: f64,
    pub correct_count: usize,
    pub total_questions: usize,
    pub wrong_answers: Vec<WrongAnswer>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct TimeCheckResponse {
    pub success: bool,
    pub remaining_time: u64,
    pub is_expired: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
