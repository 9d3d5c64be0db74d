//! `gradvalidate validate` handler
//!
//! Loads the major and schedule, fills in catalog metadata when a catalog is
//! given, runs validation on the background worker and prints or writes the
//! report. Exits with status 2 when the report is not clean.

use crate::args::ValidateArgs;
use graduate_validator::config::Config;
use graduate_validator::core::catalog::{resolve_courses, resolve_schedule, InMemoryCatalog};
use graduate_validator::core::models::{Course, Major, Schedule};
use graduate_validator::core::report::reporter_for;
use graduate_validator::core::store::{read_json, slug, FileStore, PlanStore};
use graduate_validator::core::validation::{ValidationReport, ValidationWorker, WorkerRequest};
use graduate_validator::{debug, info, verbose};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit status for a report with unsatisfied requirements or warnings
const UNCLEAN_EXIT: u8 = 2;

fn store(config: &Config) -> FileStore {
    FileStore::new(&config.paths.majors_dir, &config.paths.schedules_dir)
}

fn load_major(args: &ValidateArgs, config: &Config) -> Result<Major, String> {
    let loaded = match (&args.major, &args.major_name, args.year) {
        (Some(path), _, _) => read_json(path),
        (None, Some(name), Some(year)) => store(config).load_major(year, name),
        _ => return Err("✗ Provide --major FILE or --major-name NAME --year YEAR".to_string()),
    };
    loaded.map_err(|e| format!("✗ Failed to load major: {e}"))
}

fn load_schedule(args: &ValidateArgs, config: &Config) -> Result<Schedule, String> {
    let loaded = match (&args.schedule, &args.student) {
        (Some(path), _) => read_json(path),
        (None, Some(student)) => store(config).load_schedule(student),
        (None, None) => return Err("✗ Provide --schedule FILE or --student NAME".to_string()),
    };
    loaded.map_err(|e| format!("✗ Failed to load schedule: {e}"))
}

fn build_request(args: &ValidateArgs, config: &Config) -> Result<WorkerRequest, String> {
    let major = load_major(args, config)?;
    let schedule = load_schedule(args, config)?;
    let taken: Option<Vec<Course>> = args
        .taken
        .as_deref()
        .map(read_json)
        .transpose()
        .map_err(|e| format!("✗ Failed to load taken courses: {e}"))?;

    let Some(catalog_path) = &args.catalog else {
        let request = WorkerRequest::new(major, schedule);
        return Ok(match taken {
            Some(taken) => request.with_taken(taken),
            None => request,
        });
    };

    let catalog = InMemoryCatalog::load(catalog_path)
        .map_err(|e| format!("✗ Failed to load catalog: {e}"))?;
    info!("Loaded {} catalog courses from {}", catalog.len(), catalog_path.display());

    let (schedule, mut status) = resolve_schedule(schedule, &catalog);
    let mut request = WorkerRequest::new(major, schedule);
    if let Some(taken) = taken {
        let (taken, taken_status) = resolve_courses(taken, &catalog);
        status.merge(taken_status);
        request = request.with_taken(taken);
    }
    Ok(request.with_catalog_status(status))
}

fn output_path(args: &ValidateArgs, config: &Config, report: &ValidationReport) -> Option<PathBuf> {
    if args.save {
        let name = format!("{}.{}", slug(&report.major), args.format.extension());
        Some(PathBuf::from(&config.paths.reports_dir).join(name))
    } else {
        args.output.clone()
    }
}

fn run_worker(request: WorkerRequest, config: &Config) -> Result<ValidationReport, String> {
    let mut worker = ValidationWorker::spawn(config.thresholds())
        .map_err(|e| format!("✗ Failed to start validation: {e}"))?;
    let number = worker
        .submit(request)
        .map_err(|e| format!("✗ Validation failed: {e}"))?;
    debug!("Submitted validation request {number}");
    worker
        .wait_for_latest()
        .map_err(|e| format!("✗ Validation failed: {e}"))
}

/// Validate a schedule and emit the report
///
/// # Errors
/// Returns a printable message if an input cannot be loaded, the worker
/// fails, or the report cannot be rendered or written
pub fn run(args: &ValidateArgs, config: &Config) -> Result<ExitCode, String> {
    let request = build_request(args, config)?
        .with_concentration(args.concentration.clone());
    verbose!(
        "Validating {} courses against {}",
        request.taken.len(),
        request.major.id()
    );

    let report = run_worker(request, config)?;
    let reporter = reporter_for(args.format);

    if let Some(output) = output_path(args, config, &report) {
        reporter
            .generate(&report, &output)
            .map_err(|e| format!("✗ Failed to write report: {e}"))?;
        println!("✓ Report generated: {}", output.display());
    } else {
        let text = reporter
            .render(&report)
            .map_err(|e| format!("✗ Failed to render report: {e}"))?;
        println!("{text}");
    }

    verbose!(
        "{} of {} sections satisfied, {} term warnings",
        report.sections.values().filter(|s| s.satisfied).count(),
        report.sections.len(),
        report.warning_count()
    );

    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(UNCLEAN_EXIT)
    })
}
