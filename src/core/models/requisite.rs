//! Prerequisite and corequisite expressions
//!
//! The wire shape matches the catalog feed: groups are
//! `{"type": "and" | "or", "values": [...]}` and leaves are
//! `{"subject": "CS", "classId": "2500", "missing": true?}`.

use super::course::course_key;
use crate::core::error::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A course referenced from a requisite expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequisiteCourse {
    /// Subject code
    pub subject: String,
    /// Course number
    pub class_id: String,
    /// The catalog no longer knows this course
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub missing: bool,
}

impl RequisiteCourse {
    /// Lookup key (subject + number)
    #[must_use]
    pub fn key(&self) -> String {
        course_key(&self.subject, &self.class_id)
    }
}

/// Recursive requisite expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RequisiteRepr", into = "RequisiteRepr")]
pub enum Requisite {
    /// Every member must be met
    And(Vec<Requisite>),
    /// At least one member must be met
    Or(Vec<Requisite>),
    /// A single course
    Course(RequisiteCourse),
}

#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum GroupKind {
    And,
    Or,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RequisiteRepr {
    Group {
        #[serde(rename = "type")]
        kind: GroupKind,
        values: Vec<Requisite>,
    },
    Course(RequisiteCourse),
}

impl From<RequisiteRepr> for Requisite {
    fn from(repr: RequisiteRepr) -> Self {
        match repr {
            RequisiteRepr::Group {
                kind: GroupKind::And,
                values,
            } => Self::And(values),
            RequisiteRepr::Group {
                kind: GroupKind::Or,
                values,
            } => Self::Or(values),
            RequisiteRepr::Course(course) => Self::Course(course),
        }
    }
}

impl From<Requisite> for RequisiteRepr {
    fn from(req: Requisite) -> Self {
        match req {
            Requisite::And(values) => Self::Group {
                kind: GroupKind::And,
                values,
            },
            Requisite::Or(values) => Self::Group {
                kind: GroupKind::Or,
                values,
            },
            Requisite::Course(course) => Self::Course(course),
        }
    }
}

/// The unmet part of a requisite expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RequisiteError {
    /// A course that was not available
    Course {
        /// Subject code
        subject: String,
        /// Course number
        #[serde(rename = "classId")]
        class_id: String,
    },
    /// The unmet members of an AND group
    And {
        /// Unmet members
        missing: Vec<RequisiteError>,
    },
    /// All members of an OR group, none of which were met
    Or {
        /// Unmet alternatives
        missing: Vec<RequisiteError>,
    },
}

impl Requisite {
    /// Leaf constructor
    #[must_use]
    pub fn course(subject: &str, class_id: &str) -> Self {
        Self::Course(RequisiteCourse {
            subject: subject.to_string(),
            class_id: class_id.to_string(),
            missing: false,
        })
    }

    /// Check that no AND/OR group is empty
    ///
    /// # Errors
    /// Returns [`ModelError::EmptyRequisiteGroup`] for the first empty group found
    pub fn check(&self) -> Result<(), ModelError> {
        match self {
            Self::And(values) | Self::Or(values) => {
                if values.is_empty() {
                    return Err(ModelError::EmptyRequisiteGroup);
                }
                values.iter().try_for_each(Self::check)
            }
            Self::Course(_) => Ok(()),
        }
    }

    /// Evaluate against the set of available course keys.
    ///
    /// Leaves flagged `missing` cannot be checked and are treated as met.
    ///
    /// # Returns
    /// `None` when the expression is met, otherwise the unmet branches
    #[must_use]
    pub fn unmet(&self, available: &HashSet<String>) -> Option<RequisiteError> {
        match self {
            Self::Course(course) => {
                if course.missing || available.contains(&course.key()) {
                    None
                } else {
                    Some(RequisiteError::Course {
                        subject: course.subject.clone(),
                        class_id: course.class_id.clone(),
                    })
                }
            }
            Self::And(values) => {
                let missing: Vec<_> = values.iter().filter_map(|v| v.unmet(available)).collect();
                if missing.is_empty() {
                    None
                } else {
                    Some(RequisiteError::And { missing })
                }
            }
            Self::Or(values) => {
                let mut missing = Vec::with_capacity(values.len());
                for value in values {
                    match value.unmet(available) {
                        None => return None,
                        Some(err) => missing.push(err),
                    }
                }
                if missing.is_empty() {
                    None
                } else {
                    Some(RequisiteError::Or { missing })
                }
            }
        }
    }

    /// All leaf courses in declared order
    #[must_use]
    pub fn courses(&self) -> Vec<&RequisiteCourse> {
        let mut out = Vec::new();
        self.collect_courses(&mut out);
        out
    }

    fn collect_courses<'a>(&'a self, out: &mut Vec<&'a RequisiteCourse>) {
        match self {
            Self::Course(course) => out.push(course),
            Self::And(values) | Self::Or(values) => {
                for value in values {
                    value.collect_courses(out);
                }
            }
        }
    }
}

fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    sep: &str,
) -> fmt::Result {
    write!(f, "(")?;
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            write!(f, " {sep} ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, ")")
}

impl fmt::Display for Requisite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Course(c) => write!(f, "{} {}", c.subject, c.class_id),
            Self::And(values) => write_joined(f, values, "and"),
            Self::Or(values) => write_joined(f, values, "or"),
        }
    }
}

impl fmt::Display for RequisiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Course { subject, class_id } => write!(f, "{subject} {class_id}"),
            Self::And { missing } => write_joined(f, missing, "and"),
            Self::Or { missing } => write_joined(f, missing, "or"),
        }
    }
}
