use anyhow::{Context, Result};

use super::record_store::RecordStore;
use crate::models::exam::Grade;
use crate::models::result::AttemptResult;

pub const RESULTS_COLLECTION: &str = "exam_results";

/// Append-only log of graded attempts. Students accumulate attempts without
/// limit; nothing here updates or deletes.
pub struct ResultLog<'a> {
    store: &'a RecordStore,
}

impl<'a> ResultLog<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    pub fn append(&self, result: AttemptResult) -> Result<()> {
        let mut results: Vec<AttemptResult> = self.store.load_or_default(RESULTS_COLLECTION);
        results.push(result);
        self.store
            .save(RESULTS_COLLECTION, &results)
            .context("failed to persist exam result")
    }

    /// All of one student's attempts, most recent first. `submitted_at` is
    /// stored in a lexicographically sortable format, so string comparison
    /// is chronological comparison.
    pub fn list_for_student(&self, user_id: &str) -> Vec<AttemptResult> {
        let mut results: Vec<AttemptResult> = self
            .store
            .load_or_default::<AttemptResult>(RESULTS_COLLECTION)
            .into_iter()
            .filter(|result| result.user_id == user_id)
            .collect();
        results.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        results
    }

    /// The last matching record in append order: the attempt the student
    /// just finished.
    pub fn latest_for(
        &self,
        user_id: &str,
        grade: Grade,
        exam_id: &str,
    ) -> Option<AttemptResult> {
        self.store
            .load_or_default::<AttemptResult>(RESULTS_COLLECTION)
            .into_iter()
            .filter(|result| {
                result.user_id == user_id && result.grade == grade && result.exam_id == exam_id
            })
            .last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> RecordStore {
        let dir = std::env::temp_dir().join(format!("results-{}", uuid::Uuid::new_v4()));
        RecordStore::new(dir)
    }

    fn attempt(user_id: &str, exam_id: &str, submitted_at: &str, score: f64) -> AttemptResult {
        AttemptResult {
            user_id: user_id.to_string(),
            username: user_id.to_string(),
            grade: Grade::Ten,
            exam_id: exam_id.to_string(),
            exam_title: format!("Exam {}", exam_id),
            score,
            correct_count: 0,
            total_questions: 10,
            wrong_answers: Vec::new(),
            submitted_at: submitted_at.to_string(),
            time_spent_seconds: 60,
        }
    }

    #[test]
    fn list_is_sorted_most_recent_first() {
        let store = temp_store();
        let log = ResultLog::new(&store);

        log.append(attempt("u1", "E1", "2026-01-02 09:00:00", 5.0))
            .unwrap();
        log.append(attempt("u1", "E1", "2026-01-10 08:00:00", 7.0))
            .unwrap();
        log.append(attempt("u1", "E2", "2026-01-05 12:00:00", 6.0))
            .unwrap();
        log.append(attempt("u2", "E1", "2026-01-11 10:00:00", 9.0))
            .unwrap();

        let results = log.list_for_student("u1");
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].submitted_at, "2026-01-10 08:00:00");
        assert_eq!(results[1].submitted_at, "2026-01-05 12:00:00");
        assert_eq!(results[2].submitted_at, "2026-01-02 09:00:00");
    }

    #[test]
    fn latest_for_returns_last_appended_match() {
        let store = temp_store();
        let log = ResultLog::new(&store);

        log.append(attempt("u1", "E1", "2026-01-02 09:00:00", 5.0))
            .unwrap();
        log.append(attempt("u1", "E1", "2026-01-03 09:00:00", 8.0))
            .unwrap();

        let latest = log.latest_for("u1", Grade::Ten, "E1").unwrap();
        assert_eq!(latest.score, 8.0);

        assert!(log.latest_for("u1", Grade::Eleven, "E1").is_none());
        assert!(log.latest_for("u9", Grade::Ten, "E1").is_none());
    }
}
