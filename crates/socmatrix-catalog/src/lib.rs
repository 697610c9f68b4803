//! socmatrix catalog - field-coverage survey of a schedule-of-classes API
//!
//! Fetches course and open-section payloads for every configured
//! (term, campus) pair, measures which fields are populated and how often,
//! and writes an annotated CSV matrix.

pub mod annotations;
pub mod api;
pub mod catalog;
pub mod config;
pub mod fields;
pub mod plan;
pub mod report;
pub mod runner;
pub mod stats;
pub mod survey;

// Re-exports
pub use api::{CatalogRequest, CatalogSource, Endpoint, SocApi};
pub use catalog::{CAMPUSES, Catalog, SUBJECTS, TERMS};
pub use config::Config;
pub use fields::{FieldRow, FieldStats, Scope};
pub use runner::run;
pub use stats::RunSummary;
pub use survey::Survey;
