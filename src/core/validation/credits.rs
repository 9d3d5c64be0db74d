//! Credit-load and placement warnings
//!
//! All flags are advisory. Terms and years with no courses are not flagged:
//! an empty term is an unplanned term, not an underload.

use super::warnings::{TermWarning, YearWarning};
use crate::core::config::ValidationConfig;
use crate::core::models::{Schedule, Season, TermKey};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Per-term and per-year credit thresholds
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditThresholds {
    /// Fall/spring maximum
    pub term_max: f32,
    /// Fall/spring minimum for an active term
    pub term_min: f32,
    /// Summer half-term maximum
    pub summer_max: f32,
    /// Summer half-term minimum for an active term
    pub summer_min: f32,
    /// Expected years to graduation
    pub years_to_graduate: u32,
    /// Allowed deviation from the yearly target
    pub year_tolerance: f32,
}

impl Default for CreditThresholds {
    fn default() -> Self {
        Self::from(&ValidationConfig::default())
    }
}

impl From<&ValidationConfig> for CreditThresholds {
    fn from(config: &ValidationConfig) -> Self {
        Self {
            term_max: config.term_max_credits,
            term_min: config.term_min_credits,
            summer_max: config.summer_max_credits,
            summer_min: config.summer_min_credits,
            years_to_graduate: config.years_to_graduate,
            year_tolerance: config.year_credit_tolerance,
        }
    }
}

impl CreditThresholds {
    /// `(min, max)` for a season
    #[must_use]
    pub const fn bounds(&self, season: Season) -> (f32, f32) {
        if season.is_summer() {
            (self.summer_min, self.summer_max)
        } else {
            (self.term_min, self.term_max)
        }
    }

    /// Credits expected per academic year for a given graduation total
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn year_target(&self, total_credits_required: f32) -> f32 {
        total_credits_required / self.years_to_graduate.max(1) as f32
    }
}

/// Term-level warnings: credit load, inactive placement, duplicates
#[must_use]
pub fn term_warnings(
    schedule: &Schedule,
    thresholds: &CreditThresholds,
) -> BTreeMap<TermKey, Vec<TermWarning>> {
    let mut warnings: BTreeMap<TermKey, Vec<TermWarning>> = BTreeMap::new();
    let mut first_seen: HashMap<String, TermKey> = HashMap::new();

    for (key, term) in schedule.terms() {
        if term.classes.is_empty() {
            continue;
        }
        let mut found = Vec::new();

        if term.status.is_active() {
            for course in &term.classes {
                match first_seen.get(&course.key()) {
                    Some(&first_term) => found.push(TermWarning::DuplicateCourse {
                        course: course.to_string(),
                        first_term,
                    }),
                    None => {
                        first_seen.insert(course.key(), key);
                    }
                }
            }
        } else {
            found.extend(term.classes.iter().map(|course| TermWarning::CourseInInactiveTerm {
                course: course.to_string(),
                status: term.status,
            }));
        }

        let credits = term.credits();
        let (min, max) = thresholds.bounds(key.season);
        if credits > max {
            found.push(TermWarning::Overload { credits, max });
        } else if term.status.is_active() && credits < min {
            found.push(TermWarning::Underload { credits, min });
        }

        if !found.is_empty() {
            warnings.insert(key, found);
        }
    }

    warnings
}

/// Credit totals per academic year
#[must_use]
pub fn year_credits(schedule: &Schedule) -> BTreeMap<u32, f32> {
    schedule
        .sorted_years()
        .into_iter()
        .map(|y| (y.year, y.credits()))
        .collect()
}

/// Year-level warnings against `total / years_to_graduate ± tolerance`
#[must_use]
pub fn year_warnings(
    schedule: &Schedule,
    total_credits_required: f32,
    thresholds: &CreditThresholds,
) -> BTreeMap<u32, Vec<YearWarning>> {
    let target = thresholds.year_target(total_credits_required);
    let tolerance = thresholds.year_tolerance;

    schedule
        .sorted_years()
        .into_iter()
        .filter(|y| y.terms().iter().any(|t| !t.classes.is_empty()))
        .filter_map(|y| {
            let credits = y.credits();
            let warning = if credits > target + tolerance {
                YearWarning::AboveTarget {
                    credits,
                    target,
                    tolerance,
                }
            } else if credits < target - tolerance {
                YearWarning::BelowTarget {
                    credits,
                    target,
                    tolerance,
                }
            } else {
                return None;
            };
            Some((y.year, vec![warning]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{ChangeLog, Course, TermStatus};

    fn fill(schedule: &mut Schedule, at: TermKey, credits: &[f32]) {
        let mut log = ChangeLog::new();
        for (idx, c) in credits.iter().enumerate() {
            let course = Course::new("", "CS", &format!("{}", 4000 + idx), *c);
            assert!(schedule.add_course(at, course, &mut log));
        }
    }

    #[test]
    fn test_overload_and_underload() {
        let mut schedule = Schedule::with_years(1);
        let fall = TermKey::new(1, Season::Fall);
        let spring = TermKey::new(1, Season::Spring);
        fill(&mut schedule, fall, &[4.0, 4.0, 4.0, 4.0, 4.0]);
        fill(&mut schedule, spring, &[4.0]);

        let warnings = term_warnings(&schedule, &CreditThresholds::default());
        assert_eq!(
            warnings[&fall],
            vec![TermWarning::Overload {
                credits: 20.0,
                max: 19.0
            }]
        );
        assert_eq!(
            warnings[&spring],
            vec![TermWarning::Underload {
                credits: 4.0,
                min: 12.0
            }]
        );
    }

    #[test]
    fn test_summer_uses_summer_thresholds() {
        let mut schedule = Schedule::with_years(1);
        let mut log = ChangeLog::new();
        let summer = TermKey::new(1, Season::Summer1);
        schedule.set_status(summer, TermStatus::Classes, &mut log);
        fill(&mut schedule, summer, &[4.0, 4.0]);
        assert!(term_warnings(&schedule, &CreditThresholds::default()).is_empty());
    }

    #[test]
    fn test_inactive_placement_and_no_underload() {
        let mut schedule = Schedule::with_years(1);
        let summer = TermKey::new(1, Season::Summer2);
        fill(&mut schedule, summer, &[4.0]);
        let warnings = term_warnings(&schedule, &CreditThresholds::default());
        assert_eq!(warnings[&summer].len(), 1);
        assert!(matches!(
            warnings[&summer][0],
            TermWarning::CourseInInactiveTerm {
                status: TermStatus::Inactive,
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_flagged_on_later_placement() {
        let mut schedule = Schedule::with_years(2);
        let mut log = ChangeLog::new();
        let first = TermKey::new(1, Season::Fall);
        let second = TermKey::new(2, Season::Fall);
        for at in [second, first] {
            schedule.add_course(at, Course::new("", "CS", "2500", 12.0), &mut log);
        }
        let warnings = term_warnings(&schedule, &CreditThresholds::default());
        assert!(!warnings.contains_key(&first));
        assert_eq!(
            warnings[&second],
            vec![TermWarning::DuplicateCourse {
                course: "CS 2500".into(),
                first_term: first
            }]
        );
    }

    #[test]
    fn test_year_target() {
        let mut schedule = Schedule::with_years(2);
        fill(&mut schedule, TermKey::new(1, Season::Fall), &[4.0, 4.0, 4.0, 4.0]);
        fill(&mut schedule, TermKey::new(1, Season::Spring), &[4.0, 4.0, 4.0, 4.0]);
        fill(&mut schedule, TermKey::new(2, Season::Fall), &[4.0, 4.0, 4.0]);

        let thresholds = CreditThresholds::default();
        let warnings = year_warnings(&schedule, 128.0, &thresholds);
        // target 32 ± 8: year 1 has 32, year 2 has 12
        assert!(!warnings.contains_key(&1));
        assert!(matches!(warnings[&2][0], YearWarning::BelowTarget { .. }));
        assert_eq!(year_credits(&schedule)[&2], 12.0);
    }

    #[test]
    fn test_year_target_ignores_coop_placements() {
        let mut schedule = Schedule::with_years(1);
        let mut log = ChangeLog::new();
        let fall = TermKey::new(1, Season::Fall);
        let spring = TermKey::new(1, Season::Spring);
        fill(&mut schedule, fall, &[4.0, 4.0, 4.0, 4.0]);
        fill(&mut schedule, spring, &[4.0, 4.0, 4.0, 4.0]);
        assert!(schedule.set_status(spring, TermStatus::Coop, &mut log));

        // without the co-op placements the year has 16 of 32 ± 8
        assert_eq!(year_credits(&schedule)[&1], 16.0);
        let warnings = year_warnings(&schedule, 128.0, &CreditThresholds::default());
        assert_eq!(
            warnings[&1],
            vec![YearWarning::BelowTarget {
                credits: 16.0,
                target: 32.0,
                tolerance: 8.0
            }]
        );
    }
}
