//! Course model

use super::requisite::Requisite;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Northeastern NUPath breadth requirement tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum NuPath {
    /// Engaging with the Natural and Designed World
    ND,
    /// Exploring Creative Expression and Innovation
    EI,
    /// Interpreting Culture
    IC,
    /// Conducting Formal and Quantitative Reasoning
    FQ,
    /// Understanding Societies and Institutions
    SI,
    /// Analyzing and Using Data
    AD,
    /// Engaging Differences and Diversity
    DD,
    /// Employing Ethical Reasoning
    ER,
    /// First-Year Writing
    WF,
    /// Advanced Writing in the Disciplines
    WD,
    /// Writing-Intensive
    WI,
    /// Integrating Knowledge and Skills Through Experience
    EX,
    /// Demonstrating Thought and Action in a Capstone
    CE,
}

impl NuPath {
    /// Every NUPath, in catalog order
    pub const ALL: [Self; 13] = [
        Self::ND,
        Self::EI,
        Self::IC,
        Self::FQ,
        Self::SI,
        Self::AD,
        Self::DD,
        Self::ER,
        Self::WF,
        Self::WD,
        Self::WI,
        Self::EX,
        Self::CE,
    ];
}

impl fmt::Display for NuPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A course as known to the catalog, or as placed in a schedule.
///
/// Courses the catalog could not resolve are flagged `missing`: they still
/// match requirements by subject and number but contribute no credits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Course name (e.g., "Fundamentals of Computer Science 1")
    #[serde(default)]
    pub name: String,

    /// Subject code (e.g., "CS", "MATH")
    pub subject: String,

    /// Course number within the subject (e.g., "2500")
    pub class_id: String,

    /// Minimum credit hours awarded
    #[serde(rename = "numCreditsMin", default)]
    pub credits_min: f32,

    /// Maximum credit hours awarded
    #[serde(rename = "numCreditsMax", default)]
    pub credits_max: f32,

    /// Prerequisite expression, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prereqs: Option<Requisite>,

    /// Corequisite expression, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coreqs: Option<Requisite>,

    /// NUPath tags this course carries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nupaths: Vec<NuPath>,

    /// True when the catalog could not resolve this course
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub missing: bool,
}

impl Course {
    /// Create a new course with no requisites
    ///
    /// # Arguments
    /// * `name` - Full course name
    /// * `subject` - Subject code
    /// * `class_id` - Course number
    /// * `credits` - Credit hours (used as both minimum and maximum)
    #[must_use]
    pub fn new(name: &str, subject: &str, class_id: &str, credits: f32) -> Self {
        Self {
            name: name.to_string(),
            subject: subject.to_string(),
            class_id: class_id.to_string(),
            credits_min: credits,
            credits_max: credits,
            prereqs: None,
            coreqs: None,
            nupaths: Vec::new(),
            missing: false,
        }
    }

    /// A bare reference to a course the catalog could not resolve
    #[must_use]
    pub fn unresolved(subject: &str, class_id: &str) -> Self {
        Self {
            missing: true,
            ..Self::new("", subject, class_id, 0.0)
        }
    }

    /// Set the prerequisite expression
    #[must_use]
    pub fn with_prereqs(mut self, prereqs: Requisite) -> Self {
        self.prereqs = Some(prereqs);
        self
    }

    /// Set the corequisite expression
    #[must_use]
    pub fn with_coreqs(mut self, coreqs: Requisite) -> Self {
        self.coreqs = Some(coreqs);
        self
    }

    /// Set the credit range for variable-credit courses
    #[must_use]
    pub fn with_credit_range(mut self, min: f32, max: f32) -> Self {
        self.credits_min = min;
        self.credits_max = max;
        self
    }

    /// Attach NUPath tags
    #[must_use]
    pub fn with_nupaths(mut self, nupaths: &[NuPath]) -> Self {
        self.nupaths = nupaths.to_vec();
        self
    }

    /// Get the course key for lookups (subject + number)
    ///
    /// # Returns
    /// A string in the format "SUBJECTNUMBER" (e.g., "CS2510")
    #[must_use]
    pub fn key(&self) -> String {
        course_key(&self.subject, &self.class_id)
    }

    /// Numeric course number, or `None` for malformed numbers such as "19XX"
    #[must_use]
    pub fn number(&self) -> Option<u32> {
        self.class_id.trim().parse().ok()
    }

    /// Credits this course contributes to credit totals.
    ///
    /// Unresolved courses have unknown credit and count as zero.
    #[must_use]
    pub const fn counted_credits(&self) -> f32 {
        if self.missing {
            0.0
        } else {
            self.credits_min
        }
    }

    /// Whether this course has the same subject and number as another
    #[must_use]
    pub fn same_course(&self, other: &Self) -> bool {
        self.subject == other.subject && self.class_id == other.class_id
    }
}

/// Canonical lookup key for a subject and course number
#[must_use]
pub fn course_key(subject: &str, class_id: &str) -> String {
    format!("{}{}", subject.trim(), class_id.trim())
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.subject, self.class_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_creation() {
        let course = Course::new("Discrete Structures", "CS", "1800", 4.0);

        assert_eq!(course.name, "Discrete Structures");
        assert_eq!(course.subject, "CS");
        assert_eq!(course.class_id, "1800");
        assert!((course.credits_min - 4.0).abs() < f32::EPSILON);
        assert!((course.credits_max - 4.0).abs() < f32::EPSILON);
        assert!(course.prereqs.is_none());
        assert!(course.coreqs.is_none());
        assert!(!course.missing);
    }

    #[test]
    fn test_course_key() {
        let course = Course::new("Data Structures", "CS", "2510", 4.0);
        assert_eq!(course.key(), "CS2510");
        assert_eq!(course_key(" CS", "2510 "), "CS2510");
    }

    #[test]
    fn test_malformed_number() {
        let course = Course::new("Elective", "CS", "19XX", 4.0);
        assert_eq!(course.number(), None);
        assert_eq!(Course::new("Lab", "PHYS", "1152", 1.0).number(), Some(1152));
    }

    #[test]
    fn test_unresolved_counts_no_credit() {
        let course = Course::unresolved("CS", "4973");
        assert!(course.missing);
        assert!(course.counted_credits().abs() < f32::EPSILON);
    }

    #[test]
    fn test_variable_credit_uses_minimum() {
        let course = Course::new("Research", "CS", "4991", 1.0).with_credit_range(1.0, 4.0);
        assert!((course.counted_credits() - 1.0).abs() < f32::EPSILON);
        assert!((course.credits_max - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_deserialize_schedule_course_shape() {
        let json = r#"{
            "name": "Fundamentals of Computer Science 1",
            "classId": "2500",
            "subject": "CS",
            "numCreditsMin": 4,
            "numCreditsMax": 4,
            "nupaths": ["FQ", "ND"]
        }"#;
        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.key(), "CS2500");
        assert_eq!(course.nupaths, vec![NuPath::FQ, NuPath::ND]);
        assert!(!course.missing);
    }
}
