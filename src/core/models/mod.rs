//! Data models for degree validation

pub mod changes;
pub mod course;
pub mod major;
pub mod requirement;
pub mod requisite;
pub mod schedule;

pub use changes::{ChangeLog, ScheduleChange};
pub use course::{course_key, Course, NuPath};
pub use major::{Concentrations, Major};
pub use requirement::{CourseRange, Preorder, RequiredCourse, Requirement, Section};
pub use requisite::{Requisite, RequisiteCourse, RequisiteError};
pub use schedule::{Schedule, ScheduleTerm, ScheduleYear, Season, TermKey, TermStatus};
