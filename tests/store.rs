//! File-backed persistence of majors and schedules

use graduate_validator::core::error::StoreError;
use graduate_validator::core::models::{
    ChangeLog, Course, Major, Requirement, Schedule, Season, Section, TermKey, TermStatus,
};
use graduate_validator::core::store::{read_json, FileStore, PlanStore};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn store(dir: &TempDir) -> FileStore {
    FileStore::new(dir.path().join("majors"), dir.path().join("schedules"))
}

#[test]
fn test_major_round_trips_through_store() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let major = Major::new(
        "Computer Science, BSCS",
        2022,
        134.0,
        vec![Section::all_of("Core", vec![Requirement::course("CS", 2500)])],
    );

    store.save_major(&major).unwrap();
    assert!(dir
        .path()
        .join("majors/2022/computer-science-bscs.json")
        .exists());
    assert_eq!(store.load_major(2022, "Computer Science, BSCS").unwrap(), major);
}

#[test]
fn test_schedule_round_trips_through_store() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);
    let mut schedule = Schedule::with_years(2);
    let mut log = ChangeLog::new();
    schedule.add_course(
        TermKey::new(1, Season::Fall),
        Course::new("Fundies 1", "CS", "2500", 4.0),
        &mut log,
    );
    schedule.set_status(TermKey::new(2, Season::Spring), TermStatus::Coop, &mut log);

    store.save_schedule("Jane Doe", &schedule).unwrap();
    assert_eq!(store.load_schedule("jane doe").unwrap(), schedule);
}

#[test]
fn test_missing_and_malformed_files() {
    let dir = TempDir::new().unwrap();
    let store = store(&dir);

    assert!(matches!(
        store.load_schedule("nobody"),
        Err(StoreError::NotFound { .. })
    ));

    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        read_json::<Schedule>(&path),
        Err(StoreError::Parse { .. })
    ));
}
