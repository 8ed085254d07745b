use serde::Deserialize;
use std::collections::BTreeMap;

use super::record_store::{RecordStore, StoreError};
use crate::models::exam::{ExamDefinition, Grade, DEFAULT_TIME_LIMIT_MINUTES};

/// On-disk shape of a grade file: an object wrapper, not a bare array.
#[derive(Debug, Default, Deserialize)]
struct ExamFile {
    #[serde(default)]
    exams: Vec<ExamDefinition>,
}

/// Read-only lookup over the per-grade exam files (`lop10.json`,
/// `lop11.json`, `lop12.json`). Definitions are immutable once loaded;
/// a missing or broken file empties that grade only.
pub struct ExamCatalog<'a> {
    store: &'a RecordStore,
}

impl<'a> ExamCatalog<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    pub fn collection(grade: Grade) -> String {
        format!("lop{}", grade)
    }

    pub fn load_grade(&self, grade: Grade) -> Vec<ExamDefinition> {
        let collection = Self::collection(grade);
        let file: ExamFile = match self.store.load_document(&collection) {
            Ok(file) => file,
            Err(StoreError::NotFound(_)) => ExamFile::default(),
            Err(err) => {
                tracing::warn!("Treating grade file {} as empty: {:#}", collection, err);
                ExamFile::default()
            }
        };

        let mut exams = file.exams;
        for exam in &mut exams {
            exam.grade = Some(grade);
            if exam.time_limit.is_some() && exam.time_limit_minutes().is_none() {
                tracing::warn!(
                    "Exam {} (grade {}) has invalid time_limit {:?}, using {} minutes",
                    exam.id,
                    grade,
                    exam.time_limit,
                    DEFAULT_TIME_LIMIT_MINUTES
                );
            }
        }
        exams
    }

    /// All grades, keyed by cohort. Partial failure stays partial: a broken
    /// grade file never empties its neighbors.
    pub fn load_all(&self) -> BTreeMap<&'static str, Vec<ExamDefinition>> {
        Grade::ALL
            .iter()
            .map(|grade| (grade.as_str(), self.load_grade(*grade)))
            .collect()
    }

    pub fn find(&self, grade: Grade, exam_id: &str) -> Option<ExamDefinition> {
        self.load_grade(grade)
            .into_iter()
            .find(|exam| exam.id == exam_id)
    }
}
