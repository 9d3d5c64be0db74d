//! Markdown report generator
//!
//! The askama template in `templates/validation.md` lays out the page; the
//! rows it loops over are flattened to strings here.

use crate::core::get_version;
use crate::core::report::ReportGenerator;
use crate::core::validation::{Deficiency, SectionResult, ValidationReport};
use askama::Template;
use std::error::Error;

struct SectionRow {
    index: usize,
    title: String,
    status: &'static str,
    credits_needed: String,
    missing: Vec<String>,
}

struct TermRow {
    label: String,
    warnings: Vec<String>,
}

struct YearRow {
    year: u32,
    credits: String,
    notes: String,
}

#[derive(Template)]
#[template(path = "validation.md", escape = "none")]
struct ValidationPage {
    major: String,
    version: &'static str,
    status: &'static str,
    total_credits: String,
    total_required: String,
    warning_count: usize,
    degraded: bool,
    model_errors: Vec<String>,
    sections: Vec<SectionRow>,
    concentration: Vec<SectionRow>,
    terms: Vec<TermRow>,
    years: Vec<YearRow>,
    covered: String,
    uncovered: String,
    unresolved: String,
}

const fn status_label(satisfied: bool) -> &'static str {
    if satisfied {
        "✅ Satisfied"
    } else {
        "❌ Unsatisfied"
    }
}

fn join_or_dash<T: ToString>(items: &[T]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Markdown report generator
#[derive(Debug, Default)]
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn section_row(index: usize, section: &SectionResult) -> SectionRow {
        SectionRow {
            index,
            title: section.title.clone(),
            status: status_label(section.satisfied),
            credits_needed: section
                .credits_needed
                .map_or_else(|| "-".to_string(), |c| format!("{c:.1}")),
            missing: section.missing.iter().map(Deficiency::summary).collect(),
        }
    }

    fn page(report: &ValidationReport) -> ValidationPage {
        let status = if report.is_clean() {
            "All requirements are satisfied and the schedule has no warnings."
        } else {
            "Some requirements are unsatisfied or the schedule has warnings."
        };

        let years = report
            .year_credits
            .iter()
            .map(|(&year, credits)| YearRow {
                year,
                credits: format!("{credits:.1}"),
                notes: report
                    .year_warnings
                    .get(&year)
                    .map_or_else(String::new, |w| join_or_dash(w)),
            })
            .collect();

        ValidationPage {
            major: report.major.clone(),
            version: get_version(),
            status,
            total_credits: format!("{:.1}", report.total_credits),
            total_required: format!("{:.1}", report.total_credits_required),
            warning_count: report.warning_count(),
            degraded: report.catalog.degraded,
            model_errors: report.model_errors.clone(),
            sections: report
                .sections
                .iter()
                .map(|(&idx, section)| Self::section_row(idx, section))
                .collect(),
            concentration: report
                .concentration
                .iter()
                .map(|c| Self::section_row(0, c))
                .collect(),
            terms: report
                .term_warnings
                .iter()
                .map(|(key, warnings)| TermRow {
                    label: format!("{key} ({} {})", key.season, key.year),
                    warnings: warnings.iter().map(ToString::to_string).collect(),
                })
                .collect(),
            years,
            covered: join_or_dash(&report.nupaths.covered),
            uncovered: join_or_dash(&report.nupaths.uncovered),
            unresolved: report.catalog.unresolved.join(", "),
        }
    }
}

impl ReportGenerator for MarkdownReporter {
    fn render(&self, report: &ValidationReport) -> Result<String, Box<dyn Error>> {
        Ok(Self::page(report).render()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Concentrations, Course, Major, Requirement, Schedule, Section};
    use crate::core::validation::{validate, CreditThresholds};

    fn major() -> Major {
        Major::new(
            "Computer Science, BSCS",
            2022,
            8.0,
            vec![Section::all_of(
                "Core",
                vec![Requirement::course("CS", 1800), Requirement::course("CS", 2500)],
            )],
        )
    }

    fn report(taken: &[Course]) -> ValidationReport {
        validate(&major(), &Schedule::default(), taken, None, &CreditThresholds::default())
    }

    #[test]
    fn test_markdown_lists_missing_courses() {
        let text = MarkdownReporter::new()
            .render(&report(&[Course::new("", "CS", "2500", 4.0)]))
            .unwrap();
        assert!(text.contains("# Degree Validation: 2022 Computer Science, BSCS"));
        assert!(text.contains("| 0 | Core | ❌ Unsatisfied | - |"));
        assert!(text.contains("- missing CS 1800"));
        assert!(text.contains("No term warnings."));
    }

    #[test]
    fn test_markdown_clean_report() {
        let taken = [
            Course::new("", "CS", "1800", 4.0),
            Course::new("", "CS", "2500", 4.0),
        ];
        let text = MarkdownReporter::new().render(&report(&taken)).unwrap();
        assert!(text.contains("All requirements are satisfied"));
        assert!(!text.contains("Unresolved Courses"));
        assert!(!text.contains("Major Definition Errors"));
    }

    #[test]
    fn test_markdown_lists_model_errors() {
        let mut major = major();
        major.requirement_sections[0]
            .requirements
            .push(Requirement::range("CS", 3000, 2000, &[]));
        let report = validate(&major, &Schedule::default(), &[], None, &CreditThresholds::default());
        let text = MarkdownReporter::new().render(&report).unwrap();
        assert!(text.contains("## Major Definition Errors"));
        assert!(text.contains("- Range CS 3000-2000 has start after end"));
    }

    #[test]
    fn test_markdown_missing_required_concentration() {
        let mut major = major();
        major.concentrations = Concentrations {
            min_options: 1,
            concentration_options: vec![Section::all_of(
                "Systems",
                vec![Requirement::course("CS", 3650)],
            )],
        };
        let report = validate(&major, &Schedule::default(), &[], None, &CreditThresholds::default());
        let text = MarkdownReporter::new().render(&report).unwrap();
        assert!(text.contains("## Concentration: (none selected)"));
        assert!(text.contains("- a concentration must be selected (1 offered)"));
    }
}
