//! Validation of a schedule against a major
//!
//! [`validate`] is the single entry point. It is stateless between calls and
//! always recomputes the whole report from its inputs.

pub mod credits;
pub mod evaluator;
pub mod matching;
pub mod requisites;
pub mod warnings;
pub mod worker;

pub use credits::CreditThresholds;
pub use evaluator::{evaluate, evaluate_section, Deficiency, Evaluation};
pub use matching::{matches, MatchTarget};
pub use warnings::{TermWarning, YearWarning};
pub use worker::{RequestTracker, ValidationWorker, WorkerMessage, WorkerRequest};

use crate::core::catalog::CatalogStatus;
use crate::core::models::{Course, Major, NuPath, Schedule, Section, TermKey};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Outcome for one top-level section or concentration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionResult {
    /// Section title
    pub title: String,
    /// Whether enough children are satisfied
    pub satisfied: bool,
    /// Deficiencies of the unsatisfied children
    pub missing: Vec<Deficiency>,
    /// Credits still needed across X-of-many shortfalls, when there are any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_needed: Option<f32>,
}

impl SectionResult {
    fn from_evaluation(title: &str, eval: Evaluation) -> Self {
        let (missing, credits_needed) = match eval.deficiency {
            Some(Deficiency::Section {
                needed,
                unsatisfied,
                ..
            }) => {
                let credits = Deficiency::cheapest_shortfall(&unsatisfied, needed);
                (unsatisfied, (credits > 0.0).then_some(credits))
            }
            Some(other) => {
                let credits = other.credits_needed();
                (vec![other], (credits > 0.0).then_some(credits))
            }
            None => (Vec::new(), None),
        };
        Self {
            title: title.to_string(),
            satisfied: eval.satisfied,
            missing,
            credits_needed,
        }
    }

    fn unknown_concentration(name: &str) -> Self {
        Self {
            title: name.to_string(),
            satisfied: false,
            missing: vec![Deficiency::Unrecognized],
            credits_needed: None,
        }
    }

    fn concentration_not_selected(options: usize) -> Self {
        Self {
            title: "(none selected)".to_string(),
            satisfied: false,
            missing: vec![Deficiency::ConcentrationNotSelected { options }],
            credits_needed: None,
        }
    }
}

/// NUPaths covered by the taken courses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NuPathCoverage {
    /// Tags carried by at least one taken course
    pub covered: Vec<NuPath>,
    /// Tags no taken course carries
    pub uncovered: Vec<NuPath>,
}

impl NuPathCoverage {
    /// Coverage over a set of courses
    #[must_use]
    pub fn from_courses(courses: &[Course]) -> Self {
        let covered: BTreeSet<NuPath> = courses
            .iter()
            .flat_map(|c| c.nupaths.iter().copied())
            .collect();
        Self {
            uncovered: NuPath::ALL
                .iter()
                .copied()
                .filter(|p| !covered.contains(p))
                .collect(),
            covered: covered.into_iter().collect(),
        }
    }
}

/// Everything one validation pass produces
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Major identifier, e.g. "2022 Computer Science, BSCS"
    pub major: String,
    /// Result per top-level section, keyed by section index
    pub sections: BTreeMap<usize, SectionResult>,
    /// Result for the selected concentration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concentration: Option<SectionResult>,
    /// Warnings per term; terms without warnings are absent
    pub term_warnings: BTreeMap<TermKey, Vec<TermWarning>>,
    /// Warnings per academic year
    pub year_warnings: BTreeMap<u32, Vec<YearWarning>>,
    /// Credits per academic year, counting only terms with classes
    pub year_credits: BTreeMap<u32, f32>,
    /// Credits across all taken courses
    pub total_credits: f32,
    /// Credits required to graduate
    pub total_credits_required: f32,
    /// NUPath coverage across taken courses
    pub nupaths: NuPathCoverage,
    /// Catalog resolution state of the inputs
    pub catalog: CatalogStatus,
    /// Structural problems found in the major definition
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub model_errors: Vec<String>,
}

impl ValidationReport {
    /// No section, concentration, term or major-definition problem
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.model_errors.is_empty()
            && self.sections.values().all(|s| s.satisfied)
            && self.concentration.as_ref().map_or(true, |c| c.satisfied)
            && self.term_warnings.is_empty()
    }

    /// Number of term warnings across all terms
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.term_warnings.values().map(Vec::len).sum()
    }

    /// Attach the catalog state of the inputs
    #[must_use]
    pub fn with_catalog_status(mut self, catalog: CatalogStatus) -> Self {
        self.catalog = catalog;
        self
    }
}

fn evaluate_top_section(section: &Section, taken: &[Course]) -> SectionResult {
    SectionResult::from_evaluation(&section.title, evaluate_section(section, taken))
}

/// Validate a schedule and taken courses against a major
///
/// # Arguments
/// * `major` - Major definition
/// * `schedule` - Term-placed courses, for requisite and credit checks
/// * `taken` - Courses counted toward requirements
/// * `concentration` - Title of the selected concentration, if any
/// * `thresholds` - Credit-load thresholds
///
/// A major that fails [`Major::check`] is still evaluated; its problems are
/// listed in [`ValidationReport::model_errors`]. A major that requires a
/// concentration yields a failed concentration result when none is selected.
#[must_use]
pub fn validate(
    major: &Major,
    schedule: &Schedule,
    taken: &[Course],
    concentration: Option<&str>,
    thresholds: &CreditThresholds,
) -> ValidationReport {
    let model_errors = match major.check() {
        Ok(()) => Vec::new(),
        Err(e) => {
            crate::error!("Major '{}' is malformed: {e}", major.id());
            vec![e.to_string()]
        }
    };

    let sections: BTreeMap<usize, SectionResult> = major
        .requirement_sections
        .iter()
        .enumerate()
        .map(|(idx, section)| (idx, evaluate_top_section(section, taken)))
        .collect();

    let concentration = match concentration {
        Some(name) => Some(major.concentration(name).map_or_else(
            || {
                crate::warn!("Major '{}' has no concentration '{name}'", major.id());
                SectionResult::unknown_concentration(name)
            },
            |section| evaluate_top_section(section, taken),
        )),
        None if major.concentrations.min_options > 0 => {
            crate::warn!("Major '{}' requires a concentration but none was selected", major.id());
            Some(SectionResult::concentration_not_selected(
                major.concentrations.concentration_options.len(),
            ))
        }
        None => None,
    };

    let mut term_warnings = requisites::check_requisites(schedule);
    for (key, found) in credits::term_warnings(schedule, thresholds) {
        term_warnings.entry(key).or_default().extend(found);
    }

    let report = ValidationReport {
        major: major.id(),
        sections,
        concentration,
        term_warnings,
        year_warnings: credits::year_warnings(schedule, major.total_credits_required, thresholds),
        year_credits: credits::year_credits(schedule),
        total_credits: taken.iter().map(Course::counted_credits).sum(),
        total_credits_required: major.total_credits_required,
        nupaths: NuPathCoverage::from_courses(taken),
        catalog: CatalogStatus::default(),
        model_errors,
    };

    crate::debug!(
        "Validated '{}': {}/{} sections satisfied, {} term warnings",
        report.major,
        report.sections.values().filter(|s| s.satisfied).count(),
        report.sections.len(),
        report.warning_count()
    );

    report
}
