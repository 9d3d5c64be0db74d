//! Persistence of majors and schedules
//!
//! The validation core never touches storage; callers load snapshots through
//! a [`PlanStore`] and pass them in by value.

use crate::core::error::StoreError;
use crate::core::models::{Major, Schedule};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Load and save of major definitions and student schedules
pub trait PlanStore {
    /// Load the major named `name` for catalog year `year`
    ///
    /// # Errors
    /// Returns [`StoreError`] if the major is absent or unreadable
    fn load_major(&self, year: u32, name: &str) -> Result<Major, StoreError>;

    /// Save a major under its catalog year and name
    ///
    /// # Errors
    /// Returns [`StoreError`] on write failure
    fn save_major(&self, major: &Major) -> Result<(), StoreError>;

    /// Load a student's schedule
    ///
    /// # Errors
    /// Returns [`StoreError`] if the schedule is absent or unreadable
    fn load_schedule(&self, student: &str) -> Result<Schedule, StoreError>;

    /// Save a student's schedule
    ///
    /// # Errors
    /// Returns [`StoreError`] on write failure
    fn save_schedule(&self, student: &str, schedule: &Schedule) -> Result<(), StoreError>;
}

/// File name stem for a major or student name: lowercase ASCII alphanumerics
/// separated by single dashes.
#[must_use]
pub fn slug(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// JSON files on disk
///
/// Layout: `<majors_dir>/<year>/<slug>.json` and `<schedules_dir>/<slug>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    majors_dir: PathBuf,
    schedules_dir: PathBuf,
}

impl FileStore {
    /// Store rooted at the given directories (created on first save)
    #[must_use]
    pub fn new(majors_dir: impl Into<PathBuf>, schedules_dir: impl Into<PathBuf>) -> Self {
        Self {
            majors_dir: majors_dir.into(),
            schedules_dir: schedules_dir.into(),
        }
    }

    /// Path a major is stored at
    #[must_use]
    pub fn major_path(&self, year: u32, name: &str) -> PathBuf {
        self.majors_dir
            .join(year.to_string())
            .join(format!("{}.json", slug(name)))
    }

    /// Path a schedule is stored at
    #[must_use]
    pub fn schedule_path(&self, student: &str) -> PathBuf {
        self.schedules_dir.join(format!("{}.json", slug(student)))
    }
}

/// Read and parse a JSON document
///
/// # Errors
/// [`StoreError::NotFound`] if the file does not exist, otherwise I/O or parse errors
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let text = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            StoreError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            StoreError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&text).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let text = serde_json::to_string_pretty(value).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, text).map_err(io_err)
}

impl PlanStore for FileStore {
    fn load_major(&self, year: u32, name: &str) -> Result<Major, StoreError> {
        read_json(&self.major_path(year, name))
    }

    fn save_major(&self, major: &Major) -> Result<(), StoreError> {
        let path = self.major_path(major.year_version, &major.name);
        crate::debug!("Saving major '{}' to {}", major.id(), path.display());
        write_json(&path, major)
    }

    fn load_schedule(&self, student: &str) -> Result<Schedule, StoreError> {
        read_json(&self.schedule_path(student))
    }

    fn save_schedule(&self, student: &str, schedule: &Schedule) -> Result<(), StoreError> {
        write_json(&self.schedule_path(student), schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(slug("Computer Science, BSCS"), "computer-science-bscs");
        assert_eq!(slug("  Jane  Doe "), "jane-doe");
    }

    #[test]
    fn test_major_path_layout() {
        let store = FileStore::new("/data/majors", "/data/schedules");
        assert_eq!(
            store.major_path(2022, "Computer Science, BSCS"),
            PathBuf::from("/data/majors/2022/computer-science-bscs.json")
        );
        assert_eq!(
            store.schedule_path("Jane Doe"),
            PathBuf::from("/data/schedules/jane-doe.json")
        );
    }
}
