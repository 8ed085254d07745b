use serde::{Deserialize, Serialize};
use std::fmt;

/// Fallback applied when an exam carries a missing or invalid time limit.
pub const DEFAULT_TIME_LIMIT_MINUTES: u32 = 15;

/// Student cohort used to partition the exam catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "11")]
    Eleven,
    #[serde(rename = "12")]
    Twelve,
}

impl Grade {
    pub const ALL: [Grade; 3] = [Grade::Ten, Grade::Eleven, Grade::Twelve];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Ten => "10",
            Grade::Eleven => "11",
            Grade::Twelve => "12",
        }
    }

    pub fn parse(value: &str) -> Option<Grade> {
        match value {
            "10" => Some(Grade::Ten),
            "11" => Some(Grade::Eleven),
            "12" => Some(Grade::Twelve),
            _ => None,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamDefinition {
    pub id: String,
    /// Injected by the catalog after load; source files are already per grade.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<Grade>,
    #[serde(default)]
    pub title: String,
    /// Raw value from the source file. Catalog data is hand-edited, so this
    /// field arrives as an integer, a float, a string, or not at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<serde_json::Value>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl ExamDefinition {
    /// The validated time limit, if the stored value is a positive integer
    /// number of minutes.
    pub fn time_limit_minutes(&self) -> Option<u32> {
        let minutes = self.time_limit.as_ref()?.as_f64()?;
        if minutes > 0.0 && minutes.fract() == 0.0 && minutes <= u32::MAX as f64 {
            Some(minutes as u32)
        } else {
            None
        }
    }

    pub fn effective_time_limit(&self) -> u32 {
        self.time_limit_minutes()
            .unwrap_or(DEFAULT_TIME_LIMIT_MINUTES)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    /// Display position on the exam sheet; answer keys are keyed by `id`.
    #[serde(default)]
    pub number: u32,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

/// Question as served to a student taking the exam: no answer key, no
/// explanation.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: u32,
    pub number: u32,
    pub question: String,
    pub options: Vec<String>,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id,
            number: question.number,
            question: question.question.clone(),
            options: question.options.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExamSummary {
    pub id: String,
    pub grade: Grade,
    pub title: String,
    pub time_limit: u32,
    pub question_count: usize,
}

impl From<&ExamDefinition> for ExamSummary {
    fn from(exam: &ExamDefinition) -> Self {
        Self {
            id: exam.id.clone(),
            grade: exam.grade.unwrap_or(Grade::Ten),
            title: exam.title.clone(),
            time_limit: exam.effective_time_limit(),
            question_count: exam.questions.len(),
        }
    }
}
