//! Major model

use super::requirement::Section;
use crate::core::error::ModelError;
use serde::{Deserialize, Serialize};

/// The concentrations offered by a major
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concentrations {
    /// Minimum number of concentrations a student must complete
    pub min_options: usize,
    /// Available concentrations, each shaped like a section
    pub concentration_options: Vec<Section>,
}

/// A major and its full requirement tree for one catalog year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Major {
    /// Major name (e.g., "Computer Science, BSCS")
    pub name: String,

    /// Top-level requirement sections in display order
    pub requirement_sections: Vec<Section>,

    /// Total credits required to graduate
    pub total_credits_required: f32,

    /// Catalog year this definition belongs to
    pub year_version: u32,

    /// Concentration group
    #[serde(default)]
    pub concentrations: Concentrations,
}

impl Major {
    /// Create a major with no concentrations
    ///
    /// # Arguments
    /// * `name` - Major name
    /// * `year_version` - Catalog year
    /// * `total_credits_required` - Credits needed to graduate
    /// * `requirement_sections` - Top-level sections
    #[must_use]
    pub fn new(
        name: &str,
        year_version: u32,
        total_credits_required: f32,
        requirement_sections: Vec<Section>,
    ) -> Self {
        Self {
            name: name.to_string(),
            requirement_sections,
            total_credits_required,
            year_version,
            concentrations: Concentrations::default(),
        }
    }

    /// Get a unique identifier for this major
    ///
    /// # Returns
    /// A string combining catalog year and name (e.g., "2022 Computer Science, BSCS")
    #[must_use]
    pub fn id(&self) -> String {
        format!("{} {}", self.year_version, self.name)
    }

    /// Look up a concentration option by title (case-insensitive)
    #[must_use]
    pub fn concentration(&self, title: &str) -> Option<&Section> {
        let title = title.trim();
        self.concentrations
            .concentration_options
            .iter()
            .find(|c| c.title.eq_ignore_ascii_case(title))
    }

    /// Check structural invariants of every section and concentration
    ///
    /// # Errors
    /// Returns the first [`ModelError`] found
    pub fn check(&self) -> Result<(), ModelError> {
        let available = self.concentrations.concentration_options.len();
        if self.concentrations.min_options > available {
            return Err(ModelError::ConcentrationCountTooHigh {
                required: self.concentrations.min_options,
                available,
            });
        }
        self.requirement_sections
            .iter()
            .chain(&self.concentrations.concentration_options)
            .try_for_each(Section::check)
    }
}
