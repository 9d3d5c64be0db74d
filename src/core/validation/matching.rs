//! Course matching against leaf requirements
//!
//! Every function here is total: a course whose number does not parse as an
//! integer (e.g. "19XX") simply matches nothing.

use crate::core::models::{Course, CourseRange, RequiredCourse, Requirement};

/// A leaf requirement a course can be matched against
#[derive(Debug, Clone, Copy)]
pub enum MatchTarget<'a> {
    /// One specific course
    Course(&'a RequiredCourse),
    /// A numeric range within a subject
    Range(&'a CourseRange),
}

/// Whether `candidate` satisfies `target`
#[must_use]
pub fn matches(candidate: &Course, target: MatchTarget<'_>) -> bool {
    match target {
        MatchTarget::Course(required) => matches_required(candidate, required),
        MatchTarget::Range(range) => matches_range(candidate, range),
    }
}

/// Same subject and same course number
#[must_use]
pub fn matches_required(candidate: &Course, required: &RequiredCourse) -> bool {
    candidate.subject == required.subject && candidate.number() == Some(required.class_id)
}

/// Same subject, number within `[start, end]`, and not listed as an exception
#[must_use]
pub fn matches_range(candidate: &Course, range: &CourseRange) -> bool {
    if candidate.subject != range.subject {
        return false;
    }
    let Some(number) = candidate.number() else {
        return false;
    };
    (range.id_range_start..=range.id_range_end).contains(&number)
        && !range
            .exceptions
            .iter()
            .any(|ex| matches_required(candidate, ex))
}

/// The leaf targets of a requirement subtree, in preorder
#[must_use]
pub fn leaf_targets(node: &Requirement) -> Vec<MatchTarget<'_>> {
    node.preorder()
        .filter_map(|(_, n)| match n {
            Requirement::Course(c) => Some(MatchTarget::Course(c)),
            Requirement::Range(r) => Some(MatchTarget::Range(r)),
            _ => None,
        })
        .collect()
}

/// Whether `candidate` matches any course or range leaf under `node`
#[must_use]
pub fn matches_subtree(candidate: &Course, node: &Requirement) -> bool {
    leaf_targets(node)
        .into_iter()
        .any(|target| matches(candidate, target))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(subject: &str, id: &str) -> Course {
        Course::new("", subject, id, 4.0)
    }

    #[test]
    fn test_required_exact_match() {
        let req = RequiredCourse::new("CS", 2500);
        assert!(matches_required(&course("CS", "2500"), &req));
        assert!(!matches_required(&course("CS", "2510"), &req));
        assert!(!matches_required(&course("DS", "2500"), &req));
    }

    #[test]
    fn test_range_bounds_inclusive() {
        let Requirement::Range(range) = Requirement::range("CS", 2000, 2999, &[]) else {
            unreachable!()
        };
        assert!(matches_range(&course("CS", "2000"), &range));
        assert!(matches_range(&course("CS", "2999"), &range));
        assert!(!matches_range(&course("CS", "1999"), &range));
        assert!(!matches_range(&course("CS", "3000"), &range));
        assert!(!matches_range(&course("MATH", "2500"), &range));
    }

    #[test]
    fn test_range_exceptions_excluded() {
        let Requirement::Range(range) =
            Requirement::range("CS", 2000, 2999, &[("CS", 2990)])
        else {
            unreachable!()
        };
        assert!(!matches_range(&course("CS", "2990"), &range));
        assert!(matches_range(&course("CS", "2991"), &range));
    }

    #[test]
    fn test_malformed_number_never_matches() {
        let req = RequiredCourse::new("CS", 1900);
        let Requirement::Range(range) = Requirement::range("CS", 1000, 9999, &[]) else {
            unreachable!()
        };
        let odd = course("CS", "19XX");
        assert!(!matches(&odd, MatchTarget::Course(&req)));
        assert!(!matches(&odd, MatchTarget::Range(&range)));
    }

    #[test]
    fn test_subtree_match() {
        let node = Requirement::And {
            courses: vec![
                Requirement::course("MATH", 1341),
                Requirement::Or {
                    courses: vec![Requirement::range("CS", 4000, 4999, &[])],
                },
            ],
        };
        assert_eq!(leaf_targets(&node).len(), 2);
        assert!(matches_subtree(&course("CS", "4100"), &node));
        assert!(matches_subtree(&course("MATH", "1341"), &node));
        assert!(!matches_subtree(&course("CS", "3500"), &node));
    }
}
