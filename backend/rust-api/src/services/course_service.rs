use anyhow::{Context, Result};
use chrono::Utc;

use super::record_store::RecordStore;
use crate::models::course::{Course, CreateCoursePayload, UpdateCoursePayload};
use crate::utils::ids::next_id;

pub const COURSES_COLLECTION: &str = "courses";

pub struct CourseService<'a> {
    store: &'a RecordStore,
}

impl<'a> CourseService<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    pub fn list_all(&self) -> Vec<Course> {
        self.store.load_or_default(COURSES_COLLECTION)
    }

    pub fn get(&self, course_id: &str) -> Option<Course> {
        self.list_all()
            .into_iter()
            .find(|course| course.id == course_id)
    }

    pub fn by_teacher(&self, teacher_id: &str) -> Vec<Course> {
        self.list_all()
            .into_iter()
            .filter(|course| course.teacher_id == teacher_id)
            .collect()
    }

    pub fn create(&self, payload: CreateCoursePayload, teacher_id: &str) -> Result<Course> {
        let mut courses = self.list_all();
        let id = next_id("course", courses.iter().map(|course| course.id.as_str()));

        let course = Course {
            id,
            teacher_id: teacher_id.to_string(),
            title: payload.title,
            description: payload.description,
            lessons: payload.lessons,
            created_at: Utc::now().to_rfc3339(),
            updated_at: None,
        };

        courses.push(course.clone());
        self.store
            .save(COURSES_COLLECTION, &courses)
            .context("failed to persist course")?;

        tracing::info!("Course {} created by teacher {}", course.id, teacher_id);
        Ok(course)
    }

    /// Returns false when the course does not exist.
    pub fn update(&self, course_id: &str, payload: UpdateCoursePayload) -> Result<bool> {
        let mut courses = self.list_all();
        let Some(course) = courses.iter_mut().find(|course| course.id == course_id) else {
            return Ok(false);
        };

        if let Some(title) = payload.title {
            course.title = title;
        }
        if let Some(description) = payload.description {
            course.description = description;
        }
        if let Some(lessons) = payload.lessons {
            course.lessons = lessons;
        }
        course.updated_at = Some(Utc::now().to_rfc3339());

        self.store
            .save(COURSES_COLLECTION, &courses)
            .context("failed to persist course update")?;
        Ok(true)
    }

    pub fn delete(&self, course_id: &str) -> Result<bool> {
        let mut courses = self.list_all();
        let before = courses.len();
        courses.retain(|course| course.id != course_id);
        if courses.len() == before {
            return Ok(false);
        }

        self.store
            .save(COURSES_COLLECTION, &courses)
            .context("failed to persist course deletion")?;
        Ok(true)
    }
}
