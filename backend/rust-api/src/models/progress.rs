use serde::{Deserialize, Serialize};

/// Per-student per-course completion state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub user_id: String,
    pub course_id: String,
    #[serde(default)]
    pub completed_lessons: Vec<String>,
    pub last_updated: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProgressPayload {
    pub course_id: String,
    pub lesson_id: String,
    #[serde(default = "default_completed")]
    pub completed: bool,
}

fn default_completed() -> bool {
    true
}

/// Row in the teacher's "students progress" overview.
#[derive(Debug, Serialize)]
pub struct ProgressOverviewRow {
    pub student_name: String,
    pub student_email: String,
    pub course_title: String,
    pub completed: usize,
    pub total: usize,
    pub percentage: f64,
    pub last_updated: String,
}
