//! JSON report generator

use crate::core::report::ReportGenerator;
use crate::core::validation::ValidationReport;
use std::error::Error;

/// Pretty-printed JSON of the whole report
#[derive(Debug, Default)]
pub struct JsonReporter;

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ReportGenerator for JsonReporter {
    fn render(&self, report: &ValidationReport) -> Result<String, Box<dyn Error>> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}
