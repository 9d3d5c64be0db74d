//! Degree validation library for `graduate-validator`
//!
//! Checks a multi-year course schedule against a major's requirement tree,
//! prerequisite/corequisite ordering and per-term credit loads. The CLI in
//! `src/cli` is a thin layer over [`core::validation::validate`] and the
//! background [`core::validation::ValidationWorker`].

pub mod core;
pub mod logger;

pub use core::{config, get_version};
