//! Core domain: models, validation, catalog, persistence and reporting

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod store;
pub mod validation;

/// Returns the current version of the `graduate-validator` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
