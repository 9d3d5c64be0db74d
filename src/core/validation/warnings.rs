//! Advisory warnings attached to terms and years

use crate::core::models::{RequisiteError, TermKey, TermStatus};
use serde::Serialize;
use std::fmt;

/// A problem with one term of a schedule, or with one course placed in it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TermWarning {
    /// Prerequisites not found among earlier terms
    PrereqUnmet {
        /// Dependent course, e.g. "CS 3500"
        course: String,
        /// Unmet branches
        unmet: RequisiteError,
    },
    /// Corequisites not found in this or earlier terms
    CoreqUnmet {
        /// Dependent course
        course: String,
        /// Unmet branches
        unmet: RequisiteError,
    },
    /// Term credit total above the maximum
    Overload {
        /// Credits in the term
        credits: f32,
        /// Configured maximum
        max: f32,
    },
    /// Term credit total below the minimum
    Underload {
        /// Credits in the term
        credits: f32,
        /// Configured minimum
        min: f32,
    },
    /// Course already placed in an earlier active term
    #[serde(rename_all = "camelCase")]
    DuplicateCourse {
        /// Repeated course
        course: String,
        /// Term of its first placement
        first_term: TermKey,
    },
    /// Course placed in a term the student is not taking classes in
    CourseInInactiveTerm {
        /// Misplaced course
        course: String,
        /// Status of the term
        status: TermStatus,
    },
}

impl fmt::Display for TermWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrereqUnmet { course, unmet } => {
                write!(f, "{course}: prerequisites not satisfied: {unmet}")
            }
            Self::CoreqUnmet { course, unmet } => {
                write!(f, "{course}: corequisites not satisfied: {unmet}")
            }
            Self::Overload { credits, max } => {
                write!(f, "{credits} credits exceeds the maximum of {max}")
            }
            Self::Underload { credits, min } => {
                write!(f, "{credits} credits is below the minimum of {min}")
            }
            Self::DuplicateCourse { course, first_term } => {
                write!(f, "{course} is already placed in {first_term}")
            }
            Self::CourseInInactiveTerm { course, status } => {
                write!(f, "{course} is placed in a {status} term")
            }
        }
    }
}

/// A problem with an academic year's credit total
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum YearWarning {
    /// More credits than the per-year target allows
    AboveTarget {
        /// Credits in the year
        credits: f32,
        /// Per-year target
        target: f32,
        /// Allowed deviation
        tolerance: f32,
    },
    /// Fewer credits than the per-year target allows
    BelowTarget {
        /// Credits in the year
        credits: f32,
        /// Per-year target
        target: f32,
        /// Allowed deviation
        tolerance: f32,
    },
}

impl fmt::Display for YearWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AboveTarget {
                credits,
                target,
                tolerance,
            } => write!(f, "{credits} credits is above the yearly target of {target} (±{tolerance})"),
            Self::BelowTarget {
                credits,
                target,
                tolerance,
            } => write!(f, "{credits} credits is below the yearly target of {target} (±{tolerance})"),
        }
    }
}
