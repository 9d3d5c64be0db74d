//! CLI argument definitions for `gradvalidate`

use clap::{builder::BoolishValueParser, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use graduate_validator::config::ConfigOverrides;
use graduate_validator::core::report::ReportFormat;
use graduate_validator::logger::Level;

/// CLI log level argument
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Level::from(*self))
    }
}

fn parse_format(value: &str) -> Result<ReportFormat, String> {
    value.parse()
}

/// `config` subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    Get {
        /// Optional configuration key (e.g., `level`, `term_max_credits`, `majors_dir`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Reset one configuration value to its default.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

/// Inputs of the `validate` command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Major definition JSON file
    #[arg(long, value_name = "FILE", required_unless_present = "major_name")]
    pub major: Option<PathBuf>,

    /// Load the major by name from the configured majors directory (needs --year)
    #[arg(long, value_name = "NAME", conflicts_with = "major", requires = "year")]
    pub major_name: Option<String>,

    /// Catalog year of a major loaded by name
    #[arg(long, value_name = "YEAR")]
    pub year: Option<u32>,

    /// Schedule JSON file
    #[arg(long, value_name = "FILE", required_unless_present = "student")]
    pub schedule: Option<PathBuf>,

    /// Load the schedule of this student from the configured schedules directory
    #[arg(long, value_name = "NAME", conflicts_with = "schedule")]
    pub student: Option<String>,

    /// Course catalog JSON file used to resolve credits and requisites
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Courses counted toward requirements (defaults to every scheduled course)
    #[arg(long, value_name = "FILE")]
    pub taken: Option<PathBuf>,

    /// Concentration to evaluate
    #[arg(long, value_name = "NAME")]
    pub concentration: Option<String>,

    /// Report format: markdown (md) or json
    #[arg(short, long, value_name = "FORMAT", default_value = "md", value_parser = parse_format)]
    pub format: ReportFormat,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the report into the configured reports directory
    #[arg(long, conflicts_with = "output")]
    pub save: bool,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Validate a schedule against a major.
    ///
    /// Evaluates every requirement section (and the chosen concentration),
    /// checks prerequisite/corequisite ordering and credit loads, and prints
    /// a report.
    Validate(ValidateArgs),
}

/// `gradvalidate` command line
#[derive(Parser, Debug)]
#[command(
    name = "gradvalidate",
    about = "Validate course schedules against degree requirements",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Maximum credits in a fall or spring term for this run
    #[arg(long, value_name = "CREDITS")]
    pub term_max_credits: Option<f32>,

    /// Minimum credits in an active fall or spring term for this run
    #[arg(long, value_name = "CREDITS")]
    pub term_min_credits: Option<f32>,

    /// Maximum credits in a summer half-term for this run
    #[arg(long, value_name = "CREDITS")]
    pub summer_max_credits: Option<f32>,

    /// Minimum credits in an active summer half-term for this run
    #[arg(long, value_name = "CREDITS")]
    pub summer_min_credits: Option<f32>,

    /// Override the majors directory
    #[arg(long, value_name = "DIR")]
    pub majors_dir: Option<PathBuf>,

    /// Override the schedules directory
    #[arg(long, value_name = "DIR")]
    pub schedules_dir: Option<PathBuf>,

    /// Override the reports directory
    #[arg(long, value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

fn path_string(path: Option<&PathBuf>) -> Option<String> {
    path.map(|p| p.to_string_lossy().to_string())
}

impl Cli {
    /// Convert CLI flags into config overrides for this run
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: path_string(self.config_log_file.as_ref()),
            verbose: self.config_verbose,
            term_max_credits: self.term_max_credits,
            term_min_credits: self.term_min_credits,
            summer_max_credits: self.summer_max_credits,
            summer_min_credits: self.summer_min_credits,
            majors_dir: path_string(self.majors_dir.as_ref()),
            schedules_dir: path_string(self.schedules_dir.as_ref()),
            reports_dir: path_string(self.reports_dir.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_validate_parses() {
        let cli = Cli::try_parse_from([
            "gradvalidate",
            "--term-max-credits",
            "20",
            "validate",
            "--major",
            "major.json",
            "--schedule",
            "plan.json",
            "--format",
            "json",
        ])
        .unwrap();
        let Command::Validate(args) = &cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.format, ReportFormat::Json);
        assert_eq!(args.major, Some(PathBuf::from("major.json")));
        assert_eq!(cli.to_config_overrides().term_max_credits, Some(20.0));
    }

    #[test]
    fn test_validate_requires_a_major() {
        assert!(Cli::try_parse_from(["gradvalidate", "validate", "--schedule", "p.json"]).is_err());
        assert!(Cli::try_parse_from([
            "gradvalidate",
            "validate",
            "--major-name",
            "Computer Science",
            "--student",
            "jane"
        ])
        .is_err());
    }

    #[test]
    fn test_overrides_empty_by_default() {
        let cli = Cli::try_parse_from(["gradvalidate", "config"]).unwrap();
        let overrides = cli.to_config_overrides();
        assert!(overrides.level.is_none());
        assert!(overrides.term_min_credits.is_none());
        assert!(overrides.majors_dir.is_none());
    }
}
