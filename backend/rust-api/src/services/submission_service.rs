use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::HashMap;

use super::record_store::RecordStore;
use crate::models::submission::ExerciseSubmission;
use crate::utils::ids::next_id;

pub const SUBMISSIONS_COLLECTION: &str = "submissions";

pub struct SubmissionService<'a> {
    store: &'a RecordStore,
}

impl<'a> SubmissionService<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    pub fn record(
        &self,
        user_id: &str,
        course_id: &str,
        exercise_id: &str,
        answers: HashMap<String, String>,
    ) -> Result<ExerciseSubmission> {
        let mut submissions: Vec<ExerciseSubmission> =
            self.store.load_or_default(SUBMISSIONS_COLLECTION);
        let id = next_id("sub", submissions.iter().map(|sub| sub.id.as_str()));

        let submission = ExerciseSubmission {
            id,
            user_id: user_id.to_string(),
            course_id: course_id.to_string(),
            exercise_id: exercise_id.to_string(),
            answers,
            submitted_at: Utc::now().to_rfc3339(),
        };

        submissions.push(submission.clone());
        self.store
            .save(SUBMISSIONS_COLLECTION, &submissions)
            .context("failed to persist exercise submission")?;
        Ok(submission)
    }

    pub fn for_courses(&self, course_ids: &[String]) -> Vec<ExerciseSubmission> {
        self.store
            .load_or_default::<ExerciseSubmission>(SUBMISSIONS_COLLECTION)
            .into_iter()
            .filter(|sub| course_ids.contains(&sub.course_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> RecordStore {
        let dir = std::env::temp_dir().join(format!("subs-{}", uuid::Uuid::new_v4()));
        RecordStore::new(dir)
    }

    #[test]
    fn record_and_filter_by_course() {
        let store = temp_store();
        let submissions = SubmissionService::new(&store);

        let first = submissions
            .record("u1", "course_1", "lesson_1", HashMap::new())
            .unwrap();
        assert_eq!(first.id, "sub_1");
        submissions
            .record("u2", "course_2", "lesson_1", HashMap::new())
            .unwrap();

        let scoped = submissions.for_courses(&["course_1".to_string()]);
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].user_id, "u1");
    }
}
