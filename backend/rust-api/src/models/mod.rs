pub mod course;
pub mod document;
pub mod exam;
pub mod progress;
pub mod result;
pub mod submission;
pub mod user;
