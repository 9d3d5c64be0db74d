//! Major requirement tree
//!
//! Nodes are tagged by a `type` field on the wire (`SECTION`, `AND`, `OR`,
//! `XOM`, `RANGE`, `COURSE`). An unrecognized tag deserializes to
//! [`Requirement::Unknown`] so one bad catalog entry cannot reject a whole major.

use crate::core::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single required course
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredCourse {
    /// Subject code (e.g., "CS")
    pub subject: String,
    /// Numeric course number (e.g., 2500)
    pub class_id: u32,
}

impl RequiredCourse {
    /// Create a required course
    #[must_use]
    pub fn new(subject: &str, class_id: u32) -> Self {
        Self {
            subject: subject.to_string(),
            class_id,
        }
    }
}

impl fmt::Display for RequiredCourse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.subject, self.class_id)
    }
}

/// Any course of a subject whose number lies in an inclusive range, minus exceptions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRange {
    /// Subject code
    pub subject: String,
    /// First course number in the range
    pub id_range_start: u32,
    /// Last course number in the range
    pub id_range_end: u32,
    /// Courses inside the range that do not count
    #[serde(default)]
    pub exceptions: Vec<RequiredCourse>,
}

impl fmt::Display for CourseRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.subject, self.id_range_start, self.id_range_end
        )?;
        if !self.exceptions.is_empty() {
            let excluded: Vec<String> = self.exceptions.iter().map(ToString::to_string).collect();
            write!(f, " except {}", excluded.join(", "))?;
        }
        Ok(())
    }
}

/// A named group of requirements, of which `min_requirement_count` must be met
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Section title (e.g., "Computer Science Overview")
    pub title: String,
    /// Child requirements in declared order
    pub requirements: Vec<Requirement>,
    /// How many children must be satisfied
    pub min_requirement_count: usize,
}

impl Section {
    /// Section where every child is required
    #[must_use]
    pub fn all_of(title: &str, requirements: Vec<Requirement>) -> Self {
        Self {
            title: title.to_string(),
            min_requirement_count: requirements.len(),
            requirements,
        }
    }

    /// Depth-first traversal of the section's children
    #[must_use]
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder::new(&self.requirements)
    }

    /// Check structural invariants of the section and everything below it
    ///
    /// # Errors
    /// Returns the first [`ModelError`] found in preorder
    pub fn check(&self) -> Result<(), ModelError> {
        if self.min_requirement_count > self.requirements.len() {
            return Err(ModelError::SectionCountTooHigh {
                title: self.title.clone(),
                required: self.min_requirement_count,
                available: self.requirements.len(),
            });
        }
        self.preorder().try_for_each(|(_, node)| node.check_node())
    }
}

/// Requirement tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Requirement {
    /// Nested section
    #[serde(rename = "SECTION")]
    Section(Section),
    /// Every child must be satisfied
    #[serde(rename = "AND")]
    And {
        /// Children
        courses: Vec<Requirement>,
    },
    /// One child must be satisfied
    #[serde(rename = "OR")]
    Or {
        /// Alternatives
        courses: Vec<Requirement>,
    },
    /// A credit total must be reached from a candidate pool
    #[serde(rename = "XOM")]
    XOfMany {
        /// Credits needed
        #[serde(rename = "numCreditsMin")]
        num_credits_min: f32,
        /// Candidate requirements
        courses: Vec<Requirement>,
    },
    /// Any course within a numeric range
    #[serde(rename = "RANGE")]
    Range(CourseRange),
    /// One specific course
    #[serde(rename = "COURSE")]
    Course(RequiredCourse),
    /// A tag this version does not understand
    #[serde(other)]
    Unknown,
}

impl Requirement {
    /// Required course leaf
    #[must_use]
    pub fn course(subject: &str, class_id: u32) -> Self {
        Self::Course(RequiredCourse::new(subject, class_id))
    }

    /// Course range leaf with exceptions
    #[must_use]
    pub fn range(subject: &str, start: u32, end: u32, exceptions: &[(&str, u32)]) -> Self {
        Self::Range(CourseRange {
            subject: subject.to_string(),
            id_range_start: start,
            id_range_end: end,
            exceptions: exceptions
                .iter()
                .map(|(s, id)| RequiredCourse::new(s, *id))
                .collect(),
        })
    }

    /// Direct children in declared order (empty for leaves)
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Section(section) => &section.requirements,
            Self::And { courses } | Self::Or { courses } | Self::XOfMany { courses, .. } => {
                courses
            }
            Self::Range(_) | Self::Course(_) | Self::Unknown => &[],
        }
    }

    /// Depth-first traversal starting at (and including) this node
    #[must_use]
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder::new(std::slice::from_ref(self))
    }

    /// Short human-readable label for this node
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Section(section) => section.title.clone(),
            Self::And { courses } => format!("all of {} requirements", courses.len()),
            Self::Or { courses } => format!("one of {} requirements", courses.len()),
            Self::XOfMany {
                num_credits_min, ..
            } => format!("{num_credits_min} credits"),
            Self::Range(range) => range.to_string(),
            Self::Course(course) => course.to_string(),
            Self::Unknown => "unrecognized requirement".to_string(),
        }
    }

    /// Check structural invariants of this node and all descendants
    ///
    /// # Errors
    /// Returns the first [`ModelError`] found in preorder
    pub fn check(&self) -> Result<(), ModelError> {
        self.preorder().try_for_each(|(_, node)| node.check_node())
    }

    fn check_node(&self) -> Result<(), ModelError> {
        match self {
            Self::Section(section) if section.min_requirement_count > section.requirements.len() => {
                Err(ModelError::SectionCountTooHigh {
                    title: section.title.clone(),
                    required: section.min_requirement_count,
                    available: section.requirements.len(),
                })
            }
            Self::XOfMany {
                num_credits_min, ..
            } if !num_credits_min.is_finite() || *num_credits_min < 0.0 => {
                Err(ModelError::InvalidCreditThreshold(*num_credits_min))
            }
            Self::Range(range) => check_range(range),
            _ => Ok(()),
        }
    }
}

fn check_range(range: &CourseRange) -> Result<(), ModelError> {
    if range.id_range_start > range.id_range_end {
        return Err(ModelError::InvertedRange {
            subject: range.subject.clone(),
            start: range.id_range_start,
            end: range.id_range_end,
        });
    }
    let outside = range.exceptions.iter().find(|ex| {
        ex.subject != range.subject
            || ex.class_id < range.id_range_start
            || ex.class_id > range.id_range_end
    });
    match outside {
        Some(ex) => Err(ModelError::ExceptionOutsideRange {
            subject: ex.subject.clone(),
            class_id: ex.class_id,
            range_subject: range.subject.clone(),
            start: range.id_range_start,
            end: range.id_range_end,
        }),
        None => Ok(()),
    }
}

/// Preorder (depth-first, declared order) traversal over requirement nodes.
///
/// Yields `(depth, node)` where roots have depth 0. Iteration order is fully
/// determined by the tree, so repeated passes over the same tree agree.
pub struct Preorder<'a> {
    stack: Vec<(usize, &'a Requirement)>,
}

impl<'a> Preorder<'a> {
    fn new(roots: &'a [Requirement]) -> Self {
        Self {
            stack: roots.iter().rev().map(|node| (0, node)).collect(),
        }
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (usize, &'a Requirement);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children().iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}
