use serde::{Deserialize, Serialize};
use validator::Validate;

use super::exam::Grade;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    Document,
    Lecture,
    Exam,
}

impl DocType {
    pub fn parse(value: &str) -> Option<DocType> {
        match value {
            "document" => Some(DocType::Document),
            "lecture" => Some(DocType::Lecture),
            "exam" => Some(DocType::Exam),
            _ => None,
        }
    }
}

/// Shared study material: a link a teacher published for one grade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub grade: Grade,
    pub doc_type: DocType,
    pub url: String,
    /// youtube | drive | other, detected from the URL on creation.
    pub link_type: String,
    #[serde(default)]
    pub description: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddDocumentPayload {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(url(message = "invalid url"))]
    pub url: String,
    pub grade: String,
    pub doc_type: String,
    #[serde(default)]
    pub description: String,
}

/// youtube.com / youtu.be and drive.google.com links get dedicated players
/// on the frontend; everything else is a plain link.
pub fn detect_link_type(url: &str) -> &'static str {
    if url.contains("youtube.com") || url.contains("youtu.be") {
        "youtube"
    } else if url.contains("drive.google.com") {
        "drive"
    } else {
        "other"
    }
}
