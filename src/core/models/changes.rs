//! Record of edits applied to a schedule

use super::schedule::{TermKey, TermStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One edit applied to a schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScheduleChange {
    /// A course was placed in a term
    Added {
        /// Course label, e.g. "CS 2500"
        course: String,
        /// Destination term
        term: TermKey,
    },
    /// A course was taken out of a term
    Removed {
        /// Course label
        course: String,
        /// Source term
        term: TermKey,
    },
    /// A course was relocated between terms
    Moved {
        /// Course label
        course: String,
        /// Source term
        from: TermKey,
        /// Destination term
        to: TermKey,
    },
    /// A term's enrollment status changed
    StatusChanged {
        /// Affected term
        term: TermKey,
        /// Previous status
        from: TermStatus,
        /// New status
        to: TermStatus,
    },
}

impl fmt::Display for ScheduleChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { course, term } => write!(f, "Added {course} to {term}"),
            Self::Removed { course, term } => write!(f, "Deleted {course} from {term}"),
            Self::Moved { course, from, to } => write!(f, "Moved {course} from {from} to {to}"),
            Self::StatusChanged { term, from, to } => {
                write!(f, "Changed {term} from {from} to {to}")
            }
        }
    }
}

/// Ordered list of schedule edits, owned by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLog {
    entries: Vec<ScheduleChange>,
}

impl ChangeLog {
    /// Empty log
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an entry
    pub fn record(&mut self, change: ScheduleChange) {
        self.entries.push(change);
    }

    /// Entries in the order they were recorded
    #[must_use]
    pub fn entries(&self) -> &[ScheduleChange] {
        &self.entries
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Display for ChangeLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}
