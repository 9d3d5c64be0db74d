//! Rendering of validation reports
//!
//! Markdown goes through an askama template for people to read; JSON mirrors
//! the report structure for other programs.

pub mod formats;

use crate::core::validation::ValidationReport;
use std::error::Error;
use std::fs;
use std::path::Path;

pub use formats::{JsonReporter, MarkdownReporter, ReportFormat};

/// Trait for report generators
pub trait ReportGenerator {
    /// Render a report to a string
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn render(&self, report: &ValidationReport) -> Result<String, Box<dyn Error>>;

    /// Render a report and write it to a file, creating parent directories
    ///
    /// # Errors
    /// Returns an error if rendering or writing fails
    fn generate(&self, report: &ValidationReport, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let content = self.render(report)?;
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output_path, content)?;
        Ok(())
    }
}

/// Generator for a format
#[must_use]
pub fn reporter_for(format: ReportFormat) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Markdown => Box::new(MarkdownReporter::new()),
        ReportFormat::Json => Box::new(JsonReporter::new()),
    }
}
