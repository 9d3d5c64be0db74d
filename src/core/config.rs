//! Configuration module for `gradvalidate`

use crate::core::validation::CreditThresholds;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Compiled-in defaults, chosen by build profile.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

const DIR_VARIABLE: &str = "$GRADVALIDATE";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Credit-load thresholds used by the warning engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Most credits in a fall or spring term before an overload warning
    pub term_max_credits: f32,
    /// Fewest credits in an active fall or spring term before an underload warning
    pub term_min_credits: f32,
    /// Most credits in a summer half-term
    pub summer_max_credits: f32,
    /// Fewest credits in an active summer half-term
    pub summer_min_credits: f32,
    /// Expected years to graduation, used to derive the per-year target
    pub years_to_graduate: u32,
    /// Allowed distance from the per-year target before a year warning
    pub year_credit_tolerance: f32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            term_max_credits: 19.0,
            term_min_credits: 12.0,
            summer_max_credits: 9.0,
            summer_min_credits: 4.0,
            years_to_graduate: 4,
            year_credit_tolerance: 8.0,
        }
    }
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding stored major definitions
    #[serde(default)]
    pub majors_dir: String,
    /// Directory holding stored student schedules
    #[serde(default)]
    pub schedules_dir: String,
    /// Directory for generated reports
    #[serde(default)]
    pub reports_dir: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Credit thresholds
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override term maximum credits
    pub term_max_credits: Option<f32>,
    /// Override term minimum credits
    pub term_min_credits: Option<f32>,
    /// Override summer maximum credits
    pub summer_max_credits: Option<f32>,
    /// Override summer minimum credits
    pub summer_min_credits: Option<f32>,
    /// Override majors directory
    pub majors_dir: Option<String>,
    /// Override schedules directory
    pub schedules_dir: Option<String>,
    /// Override reports directory
    pub reports_dir: Option<String>,
}

fn parse_credits(key: &str, value: &str) -> Result<f32, String> {
    match value.trim().parse::<f32>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(format!(
            "Invalid credit value for '{key}': '{value}' (expected a non-negative number)"
        )),
    }
}

impl Config {
    /// Get the `$GRADVALIDATE` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/gradvalidate`
    /// - macOS: `~/Library/Application Support/gradvalidate`
    /// - Windows: `%APPDATA%\gradvalidate`
    #[must_use]
    pub fn get_gradvalidate_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gradvalidate")
    }

    /// Fill empty string fields from defaults.
    ///
    /// Used on load so that fields added in newer versions reach existing
    /// config files. Numeric thresholds are filled by serde when absent.
    ///
    /// # Returns
    /// `true` if any field changed
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let pairs = [
            (&mut self.logging.level, &defaults.logging.level),
            (&mut self.logging.file, &defaults.logging.file),
            (&mut self.paths.majors_dir, &defaults.paths.majors_dir),
            (&mut self.paths.schedules_dir, &defaults.paths.schedules_dir),
            (&mut self.paths.reports_dir, &defaults.paths.reports_dir),
        ];

        let mut changed = false;
        for (field, default) in pairs {
            if field.is_empty() && !default.is_empty() {
                field.clone_from(default);
                changed = true;
            }
        }
        changed
    }

    /// Apply CLI-provided overrides for this run only
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(v) = overrides.term_max_credits {
            self.validation.term_max_credits = v;
        }
        if let Some(v) = overrides.term_min_credits {
            self.validation.term_min_credits = v;
        }
        if let Some(v) = overrides.summer_max_credits {
            self.validation.summer_max_credits = v;
        }
        if let Some(v) = overrides.summer_min_credits {
            self.validation.summer_min_credits = v;
        }

        if let Some(dir) = &overrides.majors_dir {
            self.paths.majors_dir.clone_from(dir);
        }
        if let Some(dir) = &overrides.schedules_dir {
            self.paths.schedules_dir.clone_from(dir);
        }
        if let Some(dir) = &overrides.reports_dir {
            self.paths.reports_dir.clone_from(dir);
        }
    }

    /// Thresholds for the credit warning engine
    #[must_use]
    pub fn thresholds(&self) -> CreditThresholds {
        CreditThresholds::from(&self.validation)
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds.
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_gradvalidate_dir().join(CONFIG_FILE_NAME)
    }

    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_gradvalidate_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Parse a TOML string, expanding `$GRADVALIDATE` in path values
    ///
    /// # Errors
    /// Returns an error if the TOML cannot be parsed or doesn't match the schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.majors_dir = Self::expand_variables(&config.paths.majors_dir);
        config.paths.schedules_dir = Self::expand_variables(&config.paths.schedules_dir);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);

        Ok(config)
    }

    /// Load the compiled-in defaults
    ///
    /// Falls back to [`Config::default`] if the embedded file fails to parse,
    /// which only a broken build can cause.
    #[must_use]
    pub fn from_defaults() -> Self {
        let parsed = Self::from_toml(CONFIG_DEFAULTS);
        debug_assert!(parsed.is_ok(), "embedded default configuration is invalid");
        parsed.unwrap_or_default()
    }

    /// Load configuration from file, or create it from defaults on first run
    ///
    /// Missing fields are merged from defaults and written back. Any read or
    /// parse failure falls back to the defaults.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to the user config file
    ///
    /// # Errors
    /// Returns an error if serialization, directory creation or the write fails
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Keys: `level`, `file`, `verbose`, `term_max_credits`, `term_min_credits`,
    /// `summer_max_credits`, `summer_min_credits`, `years_to_graduate`,
    /// `year_credit_tolerance`, `majors_dir`, `schedules_dir`, `reports_dir`.
    /// Dashes are accepted in place of underscores.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let v = &self.validation;
        let value = match key.replace('-', "_").as_str() {
            "level" => self.logging.level.clone(),
            "file" => self.logging.file.clone(),
            "verbose" => self.logging.verbose.to_string(),
            "term_max_credits" => v.term_max_credits.to_string(),
            "term_min_credits" => v.term_min_credits.to_string(),
            "summer_max_credits" => v.summer_max_credits.to_string(),
            "summer_min_credits" => v.summer_min_credits.to_string(),
            "years_to_graduate" => v.years_to_graduate.to_string(),
            "year_credit_tolerance" => v.year_credit_tolerance.to_string(),
            "majors_dir" => self.paths.majors_dir.clone(),
            "schedules_dir" => self.paths.schedules_dir.clone(),
            "reports_dir" => self.paths.reports_dir.clone(),
            _ => return None,
        };
        Some(value)
    }

    /// Set a configuration value by key (in memory; call [`save`](Config::save) to persist)
    ///
    /// # Errors
    /// Returns an error for an unknown key or a value that does not parse
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let normalized = key.replace('-', "_");
        match normalized.as_str() {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "term_max_credits" => self.validation.term_max_credits = parse_credits(key, value)?,
            "term_min_credits" => self.validation.term_min_credits = parse_credits(key, value)?,
            "summer_max_credits" => {
                self.validation.summer_max_credits = parse_credits(key, value)?;
            }
            "summer_min_credits" => {
                self.validation.summer_min_credits = parse_credits(key, value)?;
            }
            "year_credit_tolerance" => {
                self.validation.year_credit_tolerance = parse_credits(key, value)?;
            }
            "years_to_graduate" => {
                self.validation.years_to_graduate = match value.trim().parse::<u32>() {
                    Ok(years) if years > 0 => years,
                    _ => {
                        return Err(format!(
                            "Invalid value for 'years_to_graduate': '{value}' (expected a positive integer)"
                        ))
                    }
                };
            }
            "majors_dir" => self.paths.majors_dir = value.to_string(),
            "schedules_dir" => self.paths.schedules_dir = value.to_string(),
            "reports_dir" => self.paths.reports_dir = value.to_string(),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset one value to its default
    ///
    /// # Errors
    /// Returns an error if the key is not recognized
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        let d = &defaults.validation;
        match key.replace('-', "_").as_str() {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "term_max_credits" => self.validation.term_max_credits = d.term_max_credits,
            "term_min_credits" => self.validation.term_min_credits = d.term_min_credits,
            "summer_max_credits" => self.validation.summer_max_credits = d.summer_max_credits,
            "summer_min_credits" => self.validation.summer_min_credits = d.summer_min_credits,
            "years_to_graduate" => self.validation.years_to_graduate = d.years_to_graduate,
            "year_credit_tolerance" => {
                self.validation.year_credit_tolerance = d.year_credit_tolerance;
            }
            "majors_dir" => self.paths.majors_dir.clone_from(&defaults.paths.majors_dir),
            "schedules_dir" => self
                .paths
                .schedules_dir
                .clone_from(&defaults.paths.schedules_dir),
            "reports_dir" => self.paths.reports_dir.clone_from(&defaults.paths.reports_dir),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Delete the config file so the next [`load`](Config::load) recreates it
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        let v = &self.validation;
        writeln!(f, "\n[validation]")?;
        writeln!(f, "  term_max_credits = {}", v.term_max_credits)?;
        writeln!(f, "  term_min_credits = {}", v.term_min_credits)?;
        writeln!(f, "  summer_max_credits = {}", v.summer_max_credits)?;
        writeln!(f, "  summer_min_credits = {}", v.summer_min_credits)?;
        writeln!(f, "  years_to_graduate = {}", v.years_to_graduate)?;
        writeln!(f, "  year_credit_tolerance = {}", v.year_credit_tolerance)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  majors_dir = \"{}\"", self.paths.majors_dir)?;
        writeln!(f, "  schedules_dir = \"{}\"", self.paths.schedules_dir)?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        Ok(())
    }
}
