//! Error types for the validation core.
//!
//! Expected domain conditions (a missing course, unmet credits, a course the
//! catalog could not resolve) are reported as data, never as these errors.
//! These cover malformed inputs and failures of the surrounding plumbing.

use std::path::PathBuf;
use thiserror::Error;

/// A requirement tree, requisite expression, or major violates a structural invariant.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// Course range whose start lies after its end
    #[error("Range {subject} {start}-{end} has start after end")]
    InvertedRange {
        /// Subject of the range
        subject: String,
        /// First course number
        start: u32,
        /// Last course number
        end: u32,
    },

    /// Range exception outside the range it excludes from
    #[error("Exception {subject} {class_id} lies outside range {range_subject} {start}-{end}")]
    ExceptionOutsideRange {
        /// Exception subject
        subject: String,
        /// Exception course number
        class_id: u32,
        /// Range subject
        range_subject: String,
        /// First course number of the range
        start: u32,
        /// Last course number of the range
        end: u32,
    },

    /// X-of-many node with a negative or non-finite credit threshold
    #[error("Credit threshold {0} must be a finite non-negative number")]
    InvalidCreditThreshold(f32),

    /// Section demanding more satisfied children than it has
    #[error("Section '{title}' requires {required} of only {available} requirements")]
    SectionCountTooHigh {
        /// Section title
        title: String,
        /// `minRequirementCount`
        required: usize,
        /// Number of child requirements
        available: usize,
    },

    /// Major demanding more concentrations than it offers
    #[error("Major requires {required} concentrations but offers {available}")]
    ConcentrationCountTooHigh {
        /// `minOptions`
        required: usize,
        /// Number of concentration options
        available: usize,
    },

    /// AND/OR requisite group with no children
    #[error("Requisite group has no members")]
    EmptyRequisiteGroup,
}

/// Failure of the persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Nothing stored under the requested key
    #[error("Nothing stored at {}", path.display())]
    NotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// Filesystem failure
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Stored document is not valid JSON for the expected type
    #[error("Malformed document at {}: {source}", path.display())]
    Parse {
        /// Path of the document
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
}

/// Failure talking to the background validation worker.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The worker thread could not be started
    #[error("Failed to spawn validation worker: {0}")]
    Spawn(#[source] std::io::Error),

    /// The worker thread has exited and its channel is closed
    #[error("Validation worker disconnected")]
    Disconnected,
}
