//! Requirement evaluation
//!
//! [`evaluate`] walks a requirement tree against the courses a student has
//! taken or scheduled and returns a verdict plus a structured deficiency.
//! It is pure: the same node and taken slice always give the same result.
//!
//! Courses may be reused across independent nodes. A course is rationed in
//! two places: inside a single X-of-many node, where each distinct taken
//! course contributes its credits at most once, and among the children of a
//! choose-N section, where one course fills at most one child.

use super::matching::{matches_range, matches_required, matches_subtree};
use crate::core::models::{Course, CourseRange, RequiredCourse, Requirement, Section};
use serde::Serialize;
use std::collections::HashSet;

/// What is still missing for a requirement node to be satisfied
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Deficiency {
    /// A required course was not taken
    #[serde(rename_all = "camelCase")]
    MissingCourse {
        /// The course
        course: RequiredCourse,
    },
    /// No taken course falls in a range
    #[serde(rename_all = "camelCase")]
    RangeUnmatched {
        /// The range
        range: CourseRange,
    },
    /// Deficiencies of each unsatisfied AND member
    And {
        /// Unsatisfied members
        missing: Vec<Deficiency>,
    },
    /// Deficiencies of every OR alternative
    Or {
        /// All alternatives
        alternatives: Vec<Deficiency>,
    },
    /// An X-of-many node fell short of its credit threshold
    #[serde(rename_all = "camelCase")]
    Credits {
        /// Credits still needed
        credits_needed: f32,
        /// Credits counted from matching taken courses
        credits_counted: f32,
        /// Candidates no taken course was counted toward
        unused: Vec<Requirement>,
    },
    /// A section has too few satisfied children
    #[serde(rename_all = "camelCase")]
    Section {
        /// Section title
        title: String,
        /// How many more children must be satisfied
        needed: usize,
        /// Deficiencies of the unsatisfied children
        unsatisfied: Vec<Deficiency>,
    },
    /// A node of a kind this evaluator does not understand
    Unrecognized,
    /// The major requires a concentration and none was selected
    #[serde(rename_all = "camelCase")]
    ConcentrationNotSelected {
        /// Number of concentrations the major offers
        options: usize,
    },
}

impl Deficiency {
    /// Credits still needed across every X-of-many shortfall in this deficiency
    #[must_use]
    pub fn credits_needed(&self) -> f32 {
        match self {
            Self::Credits { credits_needed, .. } => *credits_needed,
            Self::And { missing } => missing.iter().map(Self::credits_needed).sum(),
            Self::Section {
                needed,
                unsatisfied,
                ..
            } => Self::cheapest_shortfall(unsatisfied, *needed),
            // Any one alternative would do; report the cheapest.
            Self::Or { alternatives } => alternatives
                .iter()
                .map(Self::credits_needed)
                .fold(None, |best: Option<f32>, c| Some(best.map_or(c, |b| b.min(c))))
                .unwrap_or(0.0),
            Self::MissingCourse { .. }
            | Self::RangeUnmatched { .. }
            | Self::Unrecognized
            | Self::ConcentrationNotSelected { .. } => 0.0,
        }
    }

    /// Credits needed to satisfy the `needed` cheapest of `unsatisfied`
    #[must_use]
    pub fn cheapest_shortfall(unsatisfied: &[Self], needed: usize) -> f32 {
        let mut shortfalls: Vec<f32> = unsatisfied.iter().map(Self::credits_needed).collect();
        shortfalls.sort_by(f32::total_cmp);
        shortfalls.into_iter().take(needed).sum()
    }

    /// One-line description for reports and logs
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::MissingCourse { course } => format!("missing {course}"),
            Self::RangeUnmatched { range } => format!("no course taken from {range}"),
            Self::And { missing } => format!(
                "all of: {}",
                missing.iter().map(Self::summary).collect::<Vec<_>>().join("; ")
            ),
            Self::Or { alternatives } => format!(
                "one of: {}",
                alternatives
                    .iter()
                    .map(Self::summary)
                    .collect::<Vec<_>>()
                    .join(" | ")
            ),
            Self::Credits {
                credits_needed,
                credits_counted,
                ..
            } => format!("{credits_needed} more credits needed ({credits_counted} counted)"),
            Self::Section { title, needed, .. } => {
                format!("{needed} more requirement(s) needed in {title}")
            }
            Self::Unrecognized => "unrecognized requirement".to_string(),
            Self::ConcentrationNotSelected { options } => {
                format!("a concentration must be selected ({options} offered)")
            }
        }
    }
}

/// Result of evaluating one node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Whether the node is satisfied
    pub satisfied: bool,
    /// What is missing; `None` exactly when satisfied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deficiency: Option<Deficiency>,
}

impl Evaluation {
    const fn met() -> Self {
        Self {
            satisfied: true,
            deficiency: None,
        }
    }

    const fn unmet(deficiency: Deficiency) -> Self {
        Self {
            satisfied: false,
            deficiency: Some(deficiency),
        }
    }

    fn from_check(ok: bool, deficiency: impl FnOnce() -> Deficiency) -> Self {
        if ok {
            Self::met()
        } else {
            Self::unmet(deficiency())
        }
    }
}

/// How the taken courses were counted against an X-of-many node
#[derive(Debug, Clone, PartialEq)]
pub struct CreditTally {
    /// Sum of counted credits of distinct matching courses
    pub counted: f32,
    /// Keys of the taken courses that were counted, in taken order
    pub used_courses: Vec<String>,
    /// Indices of candidates that no counted course was attributed to
    pub unused_candidates: Vec<usize>,
}

/// Count credits of distinct taken courses matching any candidate.
///
/// Each course is attributed to the first candidate it matches, so a course
/// that matches two candidates still counts once.
#[must_use]
pub fn tally_credits(candidates: &[Requirement], taken: &[Course]) -> CreditTally {
    let mut seen = HashSet::new();
    let mut attributed = vec![false; candidates.len()];
    let mut counted = 0.0;
    let mut used_courses = Vec::new();

    for course in taken {
        let key = course.key();
        if seen.contains(&key) {
            continue;
        }
        if let Some(idx) = candidates.iter().position(|c| matches_subtree(course, c)) {
            attributed[idx] = true;
            counted += course.counted_credits();
            seen.insert(key.clone());
            used_courses.push(key);
        }
    }

    CreditTally {
        counted,
        used_courses,
        unused_candidates: attributed
            .iter()
            .enumerate()
            .filter_map(|(idx, used)| (!used).then_some(idx))
            .collect(),
    }
}

/// Evaluate a requirement node against the taken courses
#[must_use]
pub fn evaluate(node: &Requirement, taken: &[Course]) -> Evaluation {
    match node {
        Requirement::Course(required) => Evaluation::from_check(
            taken.iter().any(|c| matches_required(c, required)),
            || Deficiency::MissingCourse {
                course: required.clone(),
            },
        ),
        Requirement::Range(range) => Evaluation::from_check(
            taken.iter().any(|c| matches_range(c, range)),
            || Deficiency::RangeUnmatched {
                range: range.clone(),
            },
        ),
        Requirement::And { courses } => {
            let missing: Vec<Deficiency> = courses
                .iter()
                .filter_map(|child| evaluate(child, taken).deficiency)
                .collect();
            Evaluation::from_check(missing.is_empty(), || Deficiency::And { missing })
        }
        Requirement::Or { courses } => {
            let mut alternatives = Vec::with_capacity(courses.len());
            for child in courses {
                match evaluate(child, taken).deficiency {
                    None => return Evaluation::met(),
                    Some(d) => alternatives.push(d),
                }
            }
            Evaluation::unmet(Deficiency::Or { alternatives })
        }
        Requirement::XOfMany {
            num_credits_min,
            courses,
        } => {
            let tally = tally_credits(courses, taken);
            Evaluation::from_check(tally.counted >= *num_credits_min, || {
                Deficiency::Credits {
                    credits_needed: num_credits_min - tally.counted,
                    credits_counted: tally.counted,
                    unused: tally
                        .unused_candidates
                        .iter()
                        .map(|&idx| courses[idx].clone())
                        .collect(),
                }
            })
        }
        Requirement::Section(section) => evaluate_section(section, taken),
        Requirement::Unknown => Evaluation::unmet(Deficiency::Unrecognized),
    }
}

/// Indices into `pool` of the courses a satisfied `child` cannot do without
///
/// Starts from every pool course matching the subtree and drops, latest
/// first, each one the child stays satisfied without.
fn claimed_courses(child: &Requirement, pool: &[Course]) -> Vec<usize> {
    let mut claimed: Vec<usize> = pool
        .iter()
        .enumerate()
        .filter(|(_, c)| matches_subtree(c, child))
        .map(|(idx, _)| idx)
        .collect();
    let mut pos = claimed.len();
    while pos > 0 {
        pos -= 1;
        let without: Vec<Course> = claimed
            .iter()
            .enumerate()
            .filter(|&(other, _)| other != pos)
            .map(|(_, &idx)| pool[idx].clone())
            .collect();
        if evaluate(child, &without).satisfied {
            claimed.remove(pos);
        }
    }
    claimed
}

/// Evaluate the children of a choose-N section so no taken course fills two of them.
///
/// Children matched by fewer taken courses claim first. Each satisfied child
/// removes the courses it claimed from the pool its later siblings see.
/// Outcomes come back in declaration order.
fn evaluate_disjoint(children: &[Requirement], taken: &[Course]) -> Vec<Option<Deficiency>> {
    let mut seen = HashSet::new();
    let mut pool: Vec<Course> = taken
        .iter()
        .filter(|c| seen.insert(c.key()))
        .cloned()
        .collect();

    let mut order: Vec<usize> = (0..children.len()).collect();
    order.sort_by_key(|&idx| {
        pool.iter()
            .filter(|c| matches_subtree(c, &children[idx]))
            .count()
    });

    let mut outcomes = vec![None; children.len()];
    for idx in order {
        let child = &children[idx];
        match evaluate(child, &pool).deficiency {
            Some(d) => outcomes[idx] = Some(d),
            None => {
                for claimed in claimed_courses(child, &pool).into_iter().rev() {
                    pool.remove(claimed);
                }
            }
        }
    }
    outcomes
}

/// Evaluate a section: satisfied when at least `min_requirement_count` children are.
///
/// When every child is required, children are evaluated independently and a
/// course may serve several of them. A choose-N section (fewer required than
/// listed) assigns taken courses to children disjointly.
#[must_use]
pub fn evaluate_section(section: &Section, taken: &[Course]) -> Evaluation {
    let choose_n = section.min_requirement_count < section.requirements.len();
    let outcomes: Vec<Option<Deficiency>> = if choose_n {
        evaluate_disjoint(&section.requirements, taken)
    } else {
        section
            .requirements
            .iter()
            .map(|child| evaluate(child, taken).deficiency)
            .collect()
    };
    let satisfied = outcomes.iter().filter(|d| d.is_none()).count();
    let unsatisfied: Vec<Deficiency> = outcomes.into_iter().flatten().collect();
    let needed = section.min_requirement_count.saturating_sub(satisfied);
    Evaluation::from_check(needed == 0, || Deficiency::Section {
        title: section.title.clone(),
        needed,
        unsatisfied,
    })
}
