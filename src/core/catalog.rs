//! Course catalog lookup
//!
//! Schedules carry only what the student placed; credits and requisites come
//! from the catalog. A course the catalog cannot resolve is flagged `missing`
//! and the validation pass skips what it cannot check.

use crate::core::error::StoreError;
use crate::core::store::read_json;
use crate::core::models::{course_key, Course, Schedule};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Outcome of a catalog lookup
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogLookup {
    /// Course metadata
    Found(Course),
    /// The catalog does not know this course
    NotFound,
    /// The catalog could not be consulted
    Unavailable(String),
}

/// Resolves course codes to catalog metadata
pub trait CourseCatalog {
    /// Look up one course by subject and number
    fn resolve_course(&self, subject: &str, class_id: &str) -> CatalogLookup;
}

/// How completely a set of courses was resolved
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStatus {
    /// Keys of courses that could not be resolved, in first-seen order
    pub unresolved: Vec<String>,
    /// The catalog itself was unavailable for at least one lookup
    pub degraded: bool,
}

impl CatalogStatus {
    /// Fold another status into this one
    pub fn merge(&mut self, other: Self) {
        for key in other.unresolved {
            self.note_unresolved(key);
        }
        self.degraded |= other.degraded;
    }

    fn note_unresolved(&mut self, key: String) {
        if !self.unresolved.contains(&key) {
            self.unresolved.push(key);
        }
    }
}

/// Catalog held in memory, indexed by course key
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    courses: HashMap<String, Course>,
}

impl InMemoryCatalog {
    /// Empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a course
    ///
    /// # Returns
    /// `true` if added, `false` if a course with that key already exists
    pub fn add_course(&mut self, course: Course) -> bool {
        let key = course.key();
        if self.courses.contains_key(&key) {
            return false;
        }
        self.courses.insert(key, course);
        true
    }

    /// Get a course by key (e.g., "CS2500")
    #[must_use]
    pub fn get_course(&self, key: &str) -> Option<&Course> {
        self.courses.get(key)
    }

    /// Number of courses
    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether the catalog holds no courses
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Build from a course list. Later duplicates are ignored.
    #[must_use]
    pub fn from_courses(courses: Vec<Course>) -> Self {
        let mut catalog = Self::new();
        for course in courses {
            let key = course.key();
            if !catalog.add_course(course) {
                crate::debug!("Ignoring duplicate catalog entry {key}");
            }
        }
        catalog
    }

    /// Build from a JSON array of courses
    ///
    /// # Errors
    /// Returns an error if the text is not a JSON course list
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(Self::from_courses)
    }

    /// Load a JSON course list from disk
    ///
    /// # Errors
    /// Returns [`StoreError`] if the file is absent, unreadable or malformed
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        read_json(path).map(Self::from_courses)
    }
}

impl CourseCatalog for InMemoryCatalog {
    fn resolve_course(&self, subject: &str, class_id: &str) -> CatalogLookup {
        self.courses
            .get(&course_key(subject, class_id))
            .map_or(CatalogLookup::NotFound, |c| CatalogLookup::Found(c.clone()))
    }
}

fn resolve_in_place<C>(course: &mut Course, catalog: &C, status: &mut CatalogStatus)
where
    C: CourseCatalog + ?Sized,
{
    match catalog.resolve_course(&course.subject, &course.class_id) {
        CatalogLookup::Found(found) => {
            if !found.name.is_empty() {
                course.name = found.name;
            }
            course.credits_min = found.credits_min;
            course.credits_max = found.credits_max;
            course.prereqs = found.prereqs;
            course.coreqs = found.coreqs;
            course.nupaths = found.nupaths;
            course.missing = false;
        }
        CatalogLookup::NotFound => {
            crate::debug!("Catalog has no entry for {course}");
            course.missing = true;
            status.note_unresolved(course.key());
        }
        CatalogLookup::Unavailable(reason) => {
            if !status.degraded {
                crate::warn!("Course catalog unavailable: {reason}");
            }
            course.missing = true;
            status.degraded = true;
            status.note_unresolved(course.key());
        }
    }
}

/// Fill catalog metadata into every course placed in a schedule
#[must_use]
pub fn resolve_schedule<C>(mut schedule: Schedule, catalog: &C) -> (Schedule, CatalogStatus)
where
    C: CourseCatalog + ?Sized,
{
    let mut status = CatalogStatus::default();
    for course in schedule.courses_mut() {
        resolve_in_place(course, catalog, &mut status);
    }
    (schedule, status)
}

/// Fill catalog metadata into a list of courses
#[must_use]
pub fn resolve_courses<C>(mut courses: Vec<Course>, catalog: &C) -> (Vec<Course>, CatalogStatus)
where
    C: CourseCatalog + ?Sized,
{
    let mut status = CatalogStatus::default();
    for course in &mut courses {
        resolve_in_place(course, catalog, &mut status);
    }
    (courses, status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{ChangeLog, Requisite, Season, TermKey};

    struct OfflineCatalog;

    impl CourseCatalog for OfflineCatalog {
        fn resolve_course(&self, _subject: &str, _class_id: &str) -> CatalogLookup {
            CatalogLookup::Unavailable("connection refused".into())
        }
    }

    fn catalog() -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::new();
        assert!(catalog.add_course(
            Course::new("Object-Oriented Design", "CS", "3500", 4.0)
                .with_prereqs(Requisite::course("CS", "2510"))
        ));
        assert!(!catalog.add_course(Course::new("Dup", "CS", "3500", 1.0)));
        catalog
    }

    fn one_course_schedule(course: Course) -> Schedule {
        let mut schedule = Schedule::with_years(1);
        schedule.add_course(
            TermKey::new(1, Season::Fall),
            course,
            &mut ChangeLog::new(),
        );
        schedule
    }

    #[test]
    fn test_found_fills_metadata() {
        let schedule = one_course_schedule(Course::new("", "CS", "3500", 0.0));
        let (resolved, status) = resolve_schedule(schedule, &catalog());
        let course = resolved.courses()[0];
        assert_eq!(course.name, "Object-Oriented Design");
        assert!(course.prereqs.is_some());
        assert!((course.credits_min - 4.0).abs() < f32::EPSILON);
        assert_eq!(status, CatalogStatus::default());
    }

    #[test]
    fn test_not_found_marks_missing() {
        let schedule = one_course_schedule(Course::new("Special Topics", "CS", "4973", 4.0));
        let (resolved, status) = resolve_schedule(schedule, &catalog());
        assert!(resolved.courses()[0].missing);
        assert_eq!(status.unresolved, vec!["CS4973".to_string()]);
        assert!(!status.degraded);
    }

    #[test]
    fn test_unavailable_is_degraded() {
        let (courses, status) =
            resolve_courses(vec![Course::new("", "CS", "2500", 4.0)], &OfflineCatalog);
        assert!(courses[0].missing);
        assert!(status.degraded);
    }

    #[test]
    fn test_from_json() {
        let catalog = InMemoryCatalog::from_json(
            r#"[{"name": "Discrete", "subject": "CS", "classId": "1800", "numCreditsMin": 4, "numCreditsMax": 4}]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(matches!(
            catalog.resolve_course("CS", "1800"),
            CatalogLookup::Found(c) if c.name == "Discrete"
        ));
    }
}
