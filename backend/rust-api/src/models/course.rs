use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub teacher_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub questions: Vec<LessonQuestion>,
}

/// Multiple-choice exercise attached to a lesson. Graded by option letter
/// on a 0-100 scale, unlike exams which compare the full answer text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCoursePayload {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCoursePayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub lessons: Option<Vec<Lesson>>,
}

/// Lesson question as served to students: no answer key.
#[derive(Debug, Serialize)]
pub struct LessonQuestionView {
    pub question: String,
    pub options: Vec<String>,
}

impl From<&LessonQuestion> for LessonQuestionView {
    fn from(question: &LessonQuestion) -> Self {
        Self {
            question: question.question.clone(),
            options: question.options.clone(),
        }
    }
}
