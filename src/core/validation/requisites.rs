//! Prerequisite and corequisite ordering checks
//!
//! Terms are visited in `(year, season)` order. Only courses in `Classes`
//! terms count as sources, and only courses in `Classes` terms are checked.
//! Courses the catalog could not resolve are skipped.

use super::warnings::TermWarning;
use crate::core::models::{Schedule, TermKey};
use std::collections::{BTreeMap, HashSet};

/// Check every scheduled course's requisites against the term ordering
///
/// # Returns
/// Warnings keyed by the term of the dependent course; terms without
/// warnings are absent
#[must_use]
pub fn check_requisites(schedule: &Schedule) -> BTreeMap<TermKey, Vec<TermWarning>> {
    let mut warnings: BTreeMap<TermKey, Vec<TermWarning>> = BTreeMap::new();
    let mut earlier: HashSet<String> = HashSet::new();

    for (key, term) in schedule.terms() {
        if !term.status.is_active() {
            continue;
        }

        let mut through = earlier.clone();
        through.extend(term.classes.iter().map(|c| c.key()));

        for course in term.classes.iter().filter(|c| !c.missing) {
            if let Some(unmet) = course.prereqs.as_ref().and_then(|p| p.unmet(&earlier)) {
                crate::debug!("{key}: {course} missing prerequisites {unmet}");
                warnings.entry(key).or_default().push(TermWarning::PrereqUnmet {
                    course: course.to_string(),
                    unmet,
                });
            }
            if let Some(unmet) = course.coreqs.as_ref().and_then(|c| c.unmet(&through)) {
                crate::debug!("{key}: {course} missing corequisites {unmet}");
                warnings.entry(key).or_default().push(TermWarning::CoreqUnmet {
                    course: course.to_string(),
                    unmet,
                });
            }
        }

        earlier = through;
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{ChangeLog, Course, Requisite, Season, TermStatus};

    fn key(year: u32, season: Season) -> TermKey {
        TermKey::new(year, season)
    }

    fn place(schedule: &mut Schedule, at: TermKey, course: Course) {
        assert!(schedule.add_course(at, course, &mut ChangeLog::new()));
    }

    fn fundies() -> Course {
        Course::new("Fundies 1", "CS", "2500", 4.0)
    }

    fn ood() -> Course {
        Course::new("OOD", "CS", "3500", 4.0).with_prereqs(Requisite::course("CS", "2500"))
    }

    #[test]
    fn test_prereq_in_later_term_warns() {
        let mut schedule = Schedule::with_years(2);
        place(&mut schedule, key(1, Season::Spring), ood());
        place(&mut schedule, key(2, Season::Fall), fundies());

        let warnings = check_requisites(&schedule);
        let spring = &warnings[&key(1, Season::Spring)];
        assert_eq!(spring.len(), 1);
        assert!(matches!(&spring[0], TermWarning::PrereqUnmet { course, .. } if course == "CS 3500"));
    }

    #[test]
    fn test_prereq_same_term_not_enough() {
        let mut schedule = Schedule::with_years(1);
        place(&mut schedule, key(1, Season::Fall), fundies());
        place(&mut schedule, key(1, Season::Fall), ood());
        assert!(check_requisites(&schedule).contains_key(&key(1, Season::Fall)));
    }

    #[test]
    fn test_prereq_in_earlier_year_satisfies() {
        let mut schedule = Schedule::with_years(2);
        place(&mut schedule, key(1, Season::Fall), fundies());
        place(&mut schedule, key(2, Season::Fall), ood());
        assert!(check_requisites(&schedule).is_empty());
    }

    #[test]
    fn test_coreq_same_term_satisfies_later_does_not() {
        let lab = Course::new("Physics Lab", "PHYS", "1152", 1.0);
        let physics = Course::new("Physics", "PHYS", "1151", 4.0)
            .with_coreqs(Requisite::course("PHYS", "1152"));

        let mut same = Schedule::with_years(1);
        place(&mut same, key(1, Season::Fall), physics.clone());
        place(&mut same, key(1, Season::Fall), lab.clone());
        assert!(check_requisites(&same).is_empty());

        let mut later = Schedule::with_years(1);
        place(&mut later, key(1, Season::Fall), physics);
        place(&mut later, key(1, Season::Spring), lab);
        let warnings = check_requisites(&later);
        assert!(matches!(
            warnings[&key(1, Season::Fall)][0],
            TermWarning::CoreqUnmet { .. }
        ));
    }

    #[test]
    fn test_coop_term_is_not_a_source() {
        let mut schedule = Schedule::with_years(1);
        let mut log = ChangeLog::new();
        schedule.set_status(key(1, Season::Fall), TermStatus::Coop, &mut log);
        place(&mut schedule, key(1, Season::Fall), fundies());
        place(&mut schedule, key(1, Season::Spring), ood());
        assert!(check_requisites(&schedule).contains_key(&key(1, Season::Spring)));
    }

    #[test]
    fn test_unresolved_course_skipped() {
        let mut unresolved = ood();
        unresolved.missing = true;
        let mut schedule = Schedule::with_years(1);
        place(&mut schedule, key(1, Season::Fall), unresolved);
        assert!(check_requisites(&schedule).is_empty());
    }
}
