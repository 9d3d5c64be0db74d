//! End-to-end validation scenarios over the public API

use graduate_validator::core::models::{
    ChangeLog, Course, Major, Requirement, Requisite, Schedule, Season, Section, TermKey,
    TermStatus,
};
use graduate_validator::core::report::{reporter_for, ReportFormat};
use graduate_validator::core::validation::evaluator::tally_credits;
use graduate_validator::core::validation::{
    evaluate, validate, CreditThresholds, Deficiency, TermWarning,
};
use pretty_assertions::assert_eq;

fn course(subject: &str, class_id: &str) -> Course {
    Course::new("", subject, class_id, 4.0)
}

fn term(year: u32, season: Season) -> TermKey {
    TermKey::new(year, season)
}

fn core_and_electives() -> Major {
    Major::new(
        "Computer Science, BSCS",
        2022,
        32.0,
        vec![
            Section::all_of(
                "Core",
                vec![Requirement::And {
                    courses: vec![
                        Requirement::course("CS", 1800),
                        Requirement::course("CS", 2500),
                    ],
                }],
            ),
            Section::all_of(
                "Electives",
                vec![Requirement::XOfMany {
                    num_credits_min: 8.0,
                    courses: vec![
                        Requirement::course("CS", 2500),
                        Requirement::course("CS", 2510),
                    ],
                }],
            ),
        ],
    )
}

#[test]
fn test_and_reports_only_the_missing_member() {
    let taken = [course("CS", "2500")];
    let report = validate(
        &core_and_electives(),
        &Schedule::default(),
        &taken,
        None,
        &CreditThresholds::default(),
    );

    let core = &report.sections[&0];
    assert!(!core.satisfied);
    assert_eq!(core.missing.len(), 1);
    let Deficiency::And { missing } = &core.missing[0] else {
        panic!("expected an AND deficiency, got {:?}", core.missing[0]);
    };
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].summary(), "missing CS 1800");
}

#[test]
fn test_x_of_many_counts_each_course_once() {
    let candidates = [
        Requirement::course("CS", 2500),
        Requirement::course("CS", 2510),
        Requirement::range("CS", 2000, 2999, &[]),
    ];
    // CS 2500 listed twice and matching two candidates still counts once
    let taken = [course("CS", "2500"), course("CS", "2510"), course("CS", "2500")];
    let tally = tally_credits(&candidates, &taken);

    assert!((tally.counted - 8.0).abs() < f32::EPSILON);
    assert_eq!(tally.used_courses, vec!["CS2500".to_string(), "CS2510".to_string()]);
    assert_eq!(tally.unused_candidates, vec![2]);

    let node = Requirement::XOfMany {
        num_credits_min: 8.0,
        courses: candidates.to_vec(),
    };
    assert!(evaluate(&node, &taken).satisfied);
}

#[test]
fn test_x_of_many_shortfall_reports_credits_needed() {
    let taken = [course("CS", "2510")];
    let report = validate(
        &core_and_electives(),
        &Schedule::default(),
        &taken,
        None,
        &CreditThresholds::default(),
    );
    let electives = &report.sections[&1];
    assert!(!electives.satisfied);
    assert_eq!(electives.credits_needed, Some(4.0));
}

#[test]
fn test_course_counts_toward_several_sections() {
    let taken = [course("CS", "1800"), course("CS", "2500"), course("CS", "2510")];
    let report = validate(
        &core_and_electives(),
        &Schedule::default(),
        &taken,
        None,
        &CreditThresholds::default(),
    );
    assert!(report.sections.values().all(|s| s.satisfied));
}

#[test]
fn test_prerequisite_taken_after_dependent_is_flagged() {
    let mut schedule = Schedule::with_years(2);
    let mut log = ChangeLog::new();
    let algo = Course::new("Algorithms", "CS", "3000", 4.0).with_prereqs(Requisite::And(vec![
        Requisite::course("CS", "2510"),
        Requisite::course("CS", "1800"),
    ]));

    schedule.add_course(term(1, Season::Fall), course("CS", "1800"), &mut log);
    schedule.add_course(term(1, Season::Spring), algo, &mut log);
    schedule.add_course(term(2, Season::Fall), course("CS", "2510"), &mut log);

    let report = validate(
        &core_and_electives(),
        &schedule,
        &schedule.taken_courses(),
        None,
        &CreditThresholds::default(),
    );

    let spring = &report.term_warnings[&term(1, Season::Spring)];
    let prereq = spring
        .iter()
        .find_map(|w| match w {
            TermWarning::PrereqUnmet { course, unmet } => Some((course, unmet)),
            _ => None,
        })
        .expect("prerequisite warning");
    assert_eq!(prereq.0, "CS 3000");
    assert_eq!(prereq.1.to_string(), "(CS 2510)");
}

#[test]
fn test_corequisite_in_same_term_is_met() {
    let mut schedule = Schedule::with_years(1);
    let mut log = ChangeLog::new();
    let fall = term(1, Season::Fall);
    schedule.add_course(
        fall,
        course("CS", "2500").with_coreqs(Requisite::course("CS", "2501")),
        &mut log,
    );
    schedule.add_course(fall, Course::new("Lab", "CS", "2501", 1.0), &mut log);

    let report = validate(
        &core_and_electives(),
        &schedule,
        &schedule.taken_courses(),
        None,
        &CreditThresholds::default(),
    );
    let warnings = report.term_warnings.get(&fall).cloned().unwrap_or_default();
    assert!(!warnings
        .iter()
        .any(|w| matches!(w, TermWarning::CoreqUnmet { .. })));
}

#[test]
fn test_coop_term_courses_are_flagged_and_not_counted_as_sources() {
    let mut schedule = Schedule::with_years(1);
    let mut log = ChangeLog::new();
    let fall = term(1, Season::Fall);
    let spring = term(1, Season::Spring);

    schedule.add_course(fall, course("CS", "2500"), &mut log);
    schedule.set_status(fall, TermStatus::Coop, &mut log);
    schedule.add_course(
        spring,
        course("CS", "2510").with_prereqs(Requisite::course("CS", "2500")),
        &mut log,
    );

    let report = validate(
        &core_and_electives(),
        &schedule,
        &schedule.taken_courses(),
        None,
        &CreditThresholds::default(),
    );

    assert!(report.term_warnings[&fall]
        .iter()
        .any(|w| matches!(w, TermWarning::CourseInInactiveTerm { .. })));
    assert!(report.term_warnings[&spring]
        .iter()
        .any(|w| matches!(w, TermWarning::PrereqUnmet { .. })));
}

#[test]
fn test_overload_uses_configured_threshold() {
    let mut schedule = Schedule::with_years(1);
    let mut log = ChangeLog::new();
    let fall = term(1, Season::Fall);
    for id in ["1800", "2500", "2510", "2800"] {
        schedule.add_course(fall, course("CS", id), &mut log);
    }

    let strict = CreditThresholds {
        term_max: 15.0,
        ..CreditThresholds::default()
    };
    let report = validate(
        &core_and_electives(),
        &schedule,
        &schedule.taken_courses(),
        None,
        &strict,
    );
    assert!(report.term_warnings[&fall]
        .iter()
        .any(|w| matches!(w, TermWarning::Overload { credits, .. } if (*credits - 16.0).abs() < f32::EPSILON)));

    let relaxed = validate(
        &core_and_electives(),
        &schedule,
        &schedule.taken_courses(),
        None,
        &CreditThresholds::default(),
    );
    assert!(!relaxed.term_warnings.contains_key(&fall));
}

#[test]
fn test_validation_is_repeatable() {
    let mut schedule = Schedule::with_years(1);
    schedule.add_course(term(1, Season::Fall), course("CS", "2500"), &mut ChangeLog::new());
    let taken = schedule.taken_courses();
    let thresholds = CreditThresholds::default();
    let major = core_and_electives();

    let first = validate(&major, &schedule, &taken, None, &thresholds);
    let second = validate(&major, &schedule, &taken, None, &thresholds);
    assert_eq!(first, second);
}

#[test]
fn test_pick_two_section_needs_two_distinct_courses() {
    let major = Major::new(
        "Computer Science, BSCS",
        2022,
        8.0,
        vec![Section {
            title: "Pick two".into(),
            requirements: vec![
                Requirement::course("CS", 4100),
                Requirement::range("CS", 4000, 4999, &[]),
                Requirement::course("CS", 4400),
            ],
            min_requirement_count: 2,
        }],
    );
    let thresholds = CreditThresholds::default();

    let one = validate(&major, &Schedule::default(), &[course("CS", "4100")], None, &thresholds);
    assert!(!one.sections[&0].satisfied);
    assert!(!one.is_clean());

    let two = [course("CS", "4100"), course("CS", "4200")];
    let report = validate(&major, &Schedule::default(), &two, None, &thresholds);
    assert!(report.sections[&0].satisfied);
}

#[test]
fn test_malformed_major_reaches_json_report() {
    let mut major = core_and_electives();
    major.requirement_sections.push(Section::all_of(
        "Upper",
        vec![Requirement::range("CS", 3000, 2000, &[])],
    ));
    let report = validate(
        &major,
        &Schedule::default(),
        &[course("CS", "1800")],
        None,
        &CreditThresholds::default(),
    );
    assert_eq!(report.sections.len(), 3);
    assert!(!report.is_clean());

    let text = reporter_for(ReportFormat::Json).render(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        value["modelErrors"],
        serde_json::json!(["Range CS 3000-2000 has start after end"])
    );
}
