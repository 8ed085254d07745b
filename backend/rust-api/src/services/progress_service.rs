use anyhow::{Context, Result};
use chrono::Utc;

use super::record_store::RecordStore;
use crate::models::course::Course;
use crate::models::progress::{ProgressOverviewRow, ProgressRecord};
use crate::models::user::UserRecord;
use crate::services::user_service::USERS_COLLECTION;

pub const PROGRESS_COLLECTION: &str = "progress";

pub struct ProgressService<'a> {
    store: &'a RecordStore,
}

impl<'a> ProgressService<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    pub fn for_student(&self, user_id: &str) -> Vec<ProgressRecord> {
        self.store
            .load_or_default::<ProgressRecord>(PROGRESS_COLLECTION)
            .into_iter()
            .filter(|record| record.user_id == user_id)
            .collect()
    }

    pub fn for_course(&self, user_id: &str, course_id: &str) -> Option<ProgressRecord> {
        self.for_student(user_id)
            .into_iter()
            .find(|record| record.course_id == course_id)
    }

    /// Marks a lesson complete (or incomplete) for the student, creating the
    /// per-course record on first touch.
    pub fn mark_lesson(
        &self,
        user_id: &str,
        course_id: &str,
        lesson_id: &str,
        completed: bool,
    ) -> Result<ProgressRecord> {
        let mut records: Vec<ProgressRecord> = self.store.load_or_default(PROGRESS_COLLECTION);
        let now = Utc::now().to_rfc3339();

        let position = records
            .iter()
            .position(|record| record.user_id == user_id && record.course_id == course_id);

        let record = match position {
            Some(index) => {
                let record = &mut records[index];
                if completed {
                    if !record.completed_lessons.iter().any(|id| id == lesson_id) {
                        record.completed_lessons.push(lesson_id.to_string());
                    }
                } else {
                    record.completed_lessons.retain(|id| id != lesson_id);
                }
                record.last_updated = now;
                record.clone()
            }
            None => {
                let record = ProgressRecord {
                    user_id: user_id.to_string(),
                    course_id: course_id.to_string(),
                    completed_lessons: if completed {
                        vec![lesson_id.to_string()]
                    } else {
                        Vec::new()
                    },
                    last_updated: now,
                };
                records.push(record.clone());
                record
            }
        };

        self.store
            .save(PROGRESS_COLLECTION, &records)
            .context("failed to persist progress")?;
        Ok(record)
    }

    /// Overview across a teacher's courses, one row per student per course
    /// with a progress record.
    pub fn overview_for_teacher(&self, courses: &[Course]) -> Vec<ProgressOverviewRow> {
        let records: Vec<ProgressRecord> = self.store.load_or_default(PROGRESS_COLLECTION);
        let users: Vec<UserRecord> = self.store.load_or_default(USERS_COLLECTION);

        let mut rows = Vec::new();
        for course in courses {
            let total = course.lessons.len();
            for record in records.iter().filter(|r| r.course_id == course.id) {
                let Some(student) = users.iter().find(|u| u.id == record.user_id) else {
                    continue;
                };
                let completed = record.completed_lessons.len();
                let percentage = if total > 0 {
                    (completed as f64 / total as f64 * 1000.0).round() / 10.0
                } else {
                    0.0
                };
                rows.push(ProgressOverviewRow {
                    student_name: student.username.clone(),
                    student_email: student.email.clone(),
                    course_title: course.title.clone(),
                    completed,
                    total,
                    percentage,
                    last_updated: record.last_updated.clone(),
                });
            }
        }
        rows
    }
}
