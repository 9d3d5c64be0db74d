//! Multi-year schedule model
//!
//! A schedule is a list of academic years, each holding exactly four terms.
//! Terms are ordered by `(year, season)` with Fall < Spring < Summer 1 < Summer 2.

use super::changes::{ChangeLog, ScheduleChange};
use super::course::Course;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Season within an academic year, in chronological order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    /// Fall term
    #[serde(rename = "FL")]
    Fall,
    /// Spring term
    #[serde(rename = "SP")]
    Spring,
    /// First summer half (also holds full-summer classes)
    #[serde(rename = "S1", alias = "SM")]
    Summer1,
    /// Second summer half
    #[serde(rename = "S2")]
    Summer2,
}

impl Season {
    /// All seasons in chronological order
    pub const ALL: [Self; 4] = [Self::Fall, Self::Spring, Self::Summer1, Self::Summer2];

    /// Two-letter registrar code
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Fall => "FL",
            Self::Spring => "SP",
            Self::Summer1 => "S1",
            Self::Summer2 => "S2",
        }
    }

    /// Whether this is one of the summer half-terms
    #[must_use]
    pub const fn is_summer(self) -> bool {
        matches!(self, Self::Summer1 | Self::Summer2)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fall => "Fall",
            Self::Spring => "Spring",
            Self::Summer1 => "Summer 1",
            Self::Summer2 => "Summer 2",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FL" | "FALL" => Ok(Self::Fall),
            "SP" | "SPRING" => Ok(Self::Spring),
            "S1" | "SM" | "SUMMER1" => Ok(Self::Summer1),
            "S2" | "SUMMER2" => Ok(Self::Summer2),
            _ => Err(format!("Unknown season: '{s}'")),
        }
    }
}

/// What a student is doing during a term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermStatus {
    /// Taking classes
    #[serde(rename = "CLASSES")]
    Classes,
    /// On a co-op work term
    #[serde(rename = "COOP", alias = "HOVERCOOP")]
    Coop,
    /// Not enrolled
    #[serde(rename = "INACTIVE", alias = "HOVERINACTIVE")]
    Inactive,
}

impl TermStatus {
    /// Whether courses placed in this term are actually taken
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Classes)
    }
}

impl fmt::Display for TermStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Classes => "classes",
            Self::Coop => "co-op",
            Self::Inactive => "inactive",
        };
        write!(f, "{name}")
    }
}

/// Identifies one term: academic year plus season.
///
/// Serialized as `"<year>-<code>"`, e.g. `"2-SP"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TermKey {
    /// Academic year number
    pub year: u32,
    /// Season within the year
    pub season: Season,
}

impl TermKey {
    /// Create a term key
    #[must_use]
    pub const fn new(year: u32, season: Season) -> Self {
        Self { year, season }
    }
}

impl fmt::Display for TermKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.year, self.season.code())
    }
}

impl FromStr for TermKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, season) = s
            .split_once('-')
            .ok_or_else(|| format!("Term key must look like '<year>-<season>': '{s}'"))?;
        let year = year
            .trim()
            .parse()
            .map_err(|_| format!("Invalid year in term key: '{s}'"))?;
        Ok(Self::new(year, season.parse()?))
    }
}

impl From<TermKey> for String {
    fn from(key: TermKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for TermKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A single term of a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTerm {
    /// Season of this term
    pub season: Season,
    /// Enrollment status
    pub status: TermStatus,
    /// Courses placed in this term
    #[serde(default)]
    pub classes: Vec<Course>,
}

impl ScheduleTerm {
    /// Create an empty term
    #[must_use]
    pub const fn new(season: Season, status: TermStatus) -> Self {
        Self {
            season,
            status,
            classes: Vec::new(),
        }
    }

    /// Sum of counted credits of the courses in this term
    #[must_use]
    pub fn credits(&self) -> f32 {
        self.classes.iter().map(Course::counted_credits).sum()
    }

    fn position(&self, subject: &str, class_id: &str) -> Option<usize> {
        self.classes
            .iter()
            .position(|c| c.subject == subject && c.class_id == class_id)
    }
}

/// One academic year: Fall through Summer 2
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleYear {
    /// Academic year number (1, 2, 3, ...)
    pub year: u32,
    /// Fall term
    pub fall: ScheduleTerm,
    /// Spring term
    pub spring: ScheduleTerm,
    /// Summer 1 term
    pub summer1: ScheduleTerm,
    /// Summer 2 term
    pub summer2: ScheduleTerm,
    /// Summer 1 holds full-summer classes
    #[serde(default)]
    pub is_summer_full: bool,
}

impl ScheduleYear {
    /// Year with classes in fall and spring and inactive summers
    #[must_use]
    pub const fn new(year: u32) -> Self {
        Self {
            year,
            fall: ScheduleTerm::new(Season::Fall, TermStatus::Classes),
            spring: ScheduleTerm::new(Season::Spring, TermStatus::Classes),
            summer1: ScheduleTerm::new(Season::Summer1, TermStatus::Inactive),
            summer2: ScheduleTerm::new(Season::Summer2, TermStatus::Inactive),
            is_summer_full: false,
        }
    }

    /// Term for a season
    #[must_use]
    pub const fn term(&self, season: Season) -> &ScheduleTerm {
        match season {
            Season::Fall => &self.fall,
            Season::Spring => &self.spring,
            Season::Summer1 => &self.summer1,
            Season::Summer2 => &self.summer2,
        }
    }

    /// Mutable term for a season
    pub fn term_mut(&mut self, season: Season) -> &mut ScheduleTerm {
        match season {
            Season::Fall => &mut self.fall,
            Season::Spring => &mut self.spring,
            Season::Summer1 => &mut self.summer1,
            Season::Summer2 => &mut self.summer2,
        }
    }

    /// All four terms in chronological order
    #[must_use]
    pub const fn terms(&self) -> [&ScheduleTerm; 4] {
        [&self.fall, &self.spring, &self.summer1, &self.summer2]
    }

    /// Sum of counted credits across the terms with classes
    ///
    /// Courses placed in co-op or inactive terms are not being taken and do
    /// not count toward the year.
    #[must_use]
    pub fn credits(&self) -> f32 {
        self.terms()
            .iter()
            .filter(|t| t.status.is_active())
            .map(|t| t.credits())
            .sum()
    }
}

/// A student's multi-year plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Academic years (need not be stored in order)
    pub years: Vec<ScheduleYear>,
}

impl Schedule {
    /// Schedule with `count` default years numbered from 1
    #[must_use]
    pub fn with_years(count: u32) -> Self {
        Self {
            years: (1..=count).map(ScheduleYear::new).collect(),
        }
    }

    /// Every term with its key, sorted chronologically
    #[must_use]
    pub fn terms(&self) -> Vec<(TermKey, &ScheduleTerm)> {
        let mut terms: Vec<_> = self
            .years
            .iter()
            .flat_map(|y| {
                Season::ALL
                    .iter()
                    .map(move |&season| (TermKey::new(y.year, season), y.term(season)))
            })
            .collect();
        terms.sort_by_key(|(key, _)| *key);
        terms
    }

    /// Years sorted by academic year number
    #[must_use]
    pub fn sorted_years(&self) -> Vec<&ScheduleYear> {
        let mut years: Vec<_> = self.years.iter().collect();
        years.sort_by_key(|y| y.year);
        years
    }

    /// Look up a term
    #[must_use]
    pub fn term(&self, key: TermKey) -> Option<&ScheduleTerm> {
        self.years
            .iter()
            .find(|y| y.year == key.year)
            .map(|y| y.term(key.season))
    }

    /// Look up a term mutably
    pub fn term_mut(&mut self, key: TermKey) -> Option<&mut ScheduleTerm> {
        self.years
            .iter_mut()
            .find(|y| y.year == key.year)
            .map(|y| y.term_mut(key.season))
    }

    /// Every placed course, in chronological term order
    #[must_use]
    pub fn courses(&self) -> Vec<&Course> {
        self.terms()
            .into_iter()
            .flat_map(|(_, term)| term.classes.iter())
            .collect()
    }

    /// Owned copies of every placed course, for requirement evaluation
    #[must_use]
    pub fn taken_courses(&self) -> Vec<Course> {
        self.courses().into_iter().cloned().collect()
    }

    /// Mutable access to every placed course
    pub fn courses_mut(&mut self) -> impl Iterator<Item = &mut Course> {
        self.years.iter_mut().flat_map(|y| {
            [
                &mut y.fall,
                &mut y.spring,
                &mut y.summer1,
                &mut y.summer2,
            ]
            .into_iter()
            .flat_map(|t| t.classes.iter_mut())
        })
    }

    /// Place a course in a term
    ///
    /// # Returns
    /// `false` if the term does not exist in this schedule
    pub fn add_course(&mut self, key: TermKey, course: Course, log: &mut ChangeLog) -> bool {
        let Some(term) = self.term_mut(key) else {
            return false;
        };
        log.record(ScheduleChange::Added {
            course: course.to_string(),
            term: key,
        });
        term.classes.push(course);
        true
    }

    /// Remove a course from a term
    ///
    /// # Returns
    /// The removed course, or `None` if it was not placed in that term
    pub fn remove_course(
        &mut self,
        key: TermKey,
        subject: &str,
        class_id: &str,
        log: &mut ChangeLog,
    ) -> Option<Course> {
        let term = self.term_mut(key)?;
        let idx = term.position(subject, class_id)?;
        let course = term.classes.remove(idx);
        log.record(ScheduleChange::Removed {
            course: course.to_string(),
            term: key,
        });
        Some(course)
    }

    /// Relocate a course from one term to another
    ///
    /// # Returns
    /// `false` if either term is missing or the course is not in `from`
    pub fn move_course(
        &mut self,
        from: TermKey,
        to: TermKey,
        subject: &str,
        class_id: &str,
        log: &mut ChangeLog,
    ) -> bool {
        if self.term(to).is_none() {
            return false;
        }
        let Some(source) = self.term_mut(from) else {
            return false;
        };
        let Some(idx) = source.position(subject, class_id) else {
            return false;
        };
        let course = source.classes.remove(idx);
        log.record(ScheduleChange::Moved {
            course: course.to_string(),
            from,
            to,
        });
        if let Some(target) = self.term_mut(to) {
            target.classes.push(course);
        }
        true
    }

    /// Change a term's enrollment status
    ///
    /// # Returns
    /// `false` if the term does not exist
    pub fn set_status(&mut self, key: TermKey, status: TermStatus, log: &mut ChangeLog) -> bool {
        let Some(term) = self.term_mut(key) else {
            return false;
        };
        if term.status != status {
            log.record(ScheduleChange::StatusChanged {
                term: key,
                from: term.status,
                to: status,
            });
            term.status = status;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fall(year: u32) -> TermKey {
        TermKey::new(year, Season::Fall)
    }

    #[test]
    fn test_term_key_ordering() {
        let mut keys = vec![
            TermKey::new(2, Season::Fall),
            TermKey::new(1, Season::Summer2),
            TermKey::new(1, Season::Spring),
            TermKey::new(1, Season::Fall),
            TermKey::new(1, Season::Summer1),
        ];
        keys.sort();
        let rendered: Vec<String> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["1-FL", "1-SP", "1-S1", "1-S2", "2-FL"]);
    }

    #[test]
    fn test_term_key_parse() {
        assert_eq!("3-SP".parse::<TermKey>(), Ok(TermKey::new(3, Season::Spring)));
        assert_eq!("1-SM".parse::<TermKey>(), Ok(TermKey::new(1, Season::Summer1)));
        assert!("3SP".parse::<TermKey>().is_err());
        assert!("x-FL".parse::<TermKey>().is_err());
    }

    #[test]
    fn test_terms_sorted_even_if_years_unordered() {
        let mut schedule = Schedule::with_years(2);
        schedule.years.reverse();
        let keys: Vec<TermKey> = schedule.terms().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys.len(), 8);
        assert_eq!(keys[0], fall(1));
        assert_eq!(keys[4], fall(2));
    }

    #[test]
    fn test_add_remove_move_are_logged() {
        let mut schedule = Schedule::with_years(2);
        let mut log = ChangeLog::new();

        assert!(schedule.add_course(fall(1), Course::new("Fundies 1", "CS", "2500", 4.0), &mut log));
        assert!(schedule.move_course(fall(1), fall(2), "CS", "2500", &mut log));
        assert!(schedule.term(fall(1)).unwrap().classes.is_empty());
        assert_eq!(schedule.term(fall(2)).unwrap().classes.len(), 1);

        let removed = schedule.remove_course(fall(2), "CS", "2500", &mut log);
        assert_eq!(removed.map(|c| c.key()), Some("CS2500".to_string()));

        assert_eq!(log.len(), 3);
        assert_eq!(
            log.to_string(),
            "Added CS 2500 to 1-FL\nMoved CS 2500 from 1-FL to 2-FL\nDeleted CS 2500 from 2-FL\n"
        );
    }

    #[test]
    fn test_missing_term_is_rejected() {
        let mut schedule = Schedule::with_years(1);
        let mut log = ChangeLog::new();
        assert!(!schedule.add_course(fall(5), Course::new("X", "CS", "1", 4.0), &mut log));
        assert!(!schedule.move_course(fall(1), fall(5), "CS", "1", &mut log));
        assert!(schedule.remove_course(fall(1), "CS", "1", &mut log).is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn test_set_status_logs_only_changes() {
        let mut schedule = Schedule::with_years(1);
        let mut log = ChangeLog::new();
        let spring = TermKey::new(1, Season::Spring);
        assert!(schedule.set_status(spring, TermStatus::Classes, &mut log));
        assert!(log.is_empty());
        assert!(schedule.set_status(spring, TermStatus::Coop, &mut log));
        assert_eq!(schedule.term(spring).unwrap().status, TermStatus::Coop);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_deserialize_year() {
        let json = r#"{
            "year": 1,
            "fall": {"season": "FL", "status": "CLASSES", "classes": [
                {"name": "Discrete", "subject": "CS", "classId": "1800", "numCreditsMin": 4, "numCreditsMax": 4}
            ]},
            "spring": {"season": "SP", "status": "COOP", "classes": []},
            "summer1": {"season": "SM", "status": "HOVERINACTIVE", "classes": []},
            "summer2": {"season": "S2", "status": "INACTIVE", "classes": []},
            "isSummerFull": true
        }"#;
        let year: ScheduleYear = serde_json::from_str(json).unwrap();
        assert_eq!(year.summer1.season, Season::Summer1);
        assert_eq!(year.summer1.status, TermStatus::Inactive);
        assert_eq!(year.spring.status, TermStatus::Coop);
        assert!(year.is_summer_full);
        assert!((year.credits() - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_year_credits_skip_coop_and_inactive_terms() {
        let mut schedule = Schedule::with_years(1);
        let mut log = ChangeLog::new();
        let fall = TermKey::new(1, Season::Fall);
        let spring = TermKey::new(1, Season::Spring);
        let summer = TermKey::new(1, Season::Summer1);
        schedule.add_course(fall, Course::new("", "CS", "1800", 4.0), &mut log);
        schedule.add_course(spring, Course::new("", "CS", "2500", 4.0), &mut log);
        schedule.add_course(summer, Course::new("", "CS", "2510", 4.0), &mut log);
        assert!(schedule.set_status(spring, TermStatus::Coop, &mut log));
        assert!(schedule.set_status(summer, TermStatus::Inactive, &mut log));

        let year = &schedule.years[0];
        assert!((year.credits() - 4.0).abs() < f32::EPSILON);
        assert!((year.spring.credits() - 4.0).abs() < f32::EPSILON);
    }
}
