//! Scenario simulation-data import pipeline
//!
//! Ingests an uploaded ZIP archive of per-percentile hierarchical
//! time-series files, cross-validates the contents against the relational
//! catalog, reshapes the node x group x day x compartment series into flat
//! datapoints, and atomically replaces the scenario's stored dataset.
//!
//! Stages, in dependency order:
//!
//! 1. Archive intake and layout validation ([`archive`])
//! 2. Catalog lookup ([`catalog`])
//! 3. Concurrent per-percentile extraction ([`extract`], [`series`])
//! 4. Aggregation and atomic replace ([`pipeline`], [`storage`])
//!
//! Validation failures inside an extraction task are returned as structured
//! [`models::PercentileFailure`] values rather than raised across task
//! boundaries; the aggregation step reports the union of all failures and
//! commits nothing unless every percentile succeeded.

use thiserror::Error;
use uuid::Uuid;

pub mod archive;
pub mod catalog;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod series;
pub mod storage;

pub use models::{FailureKind, ImportFailureReport, ImportOutcome, NewDatapoint, PercentileFailure};
pub use pipeline::ImportPipeline;

/// Errors produced by the import pipeline.
///
/// The upload endpoint maps these onto HTTP statuses: upload and content
/// validation problems are client errors (422), a missing scenario is 404,
/// and catalog integrity or I/O problems are server faults (500).
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("No file content provided")]
    EmptyUpload,

    #[error("Unsupported upload '{0}': expected a .zip archive")]
    UnsupportedExtension(String),

    #[error("Archive could not be read as a ZIP file: {0}")]
    InvalidArchive(String),

    #[error("Archive entry '{0}' is not a percentile folder (expected 'p' followed by 1-2 digits)")]
    MalformedLayout(String),

    #[error("Archive contains no percentile folders")]
    NoPercentileFolders,

    #[error("Scenario '{0}' not found")]
    ScenarioNotFound(Uuid),

    #[error("Catalog integrity failure: {0}")]
    CatalogIntegrity(String),

    #[error("Simulation data rejected for {} percentile(s)", .report.failures.len())]
    Validation { report: ImportFailureReport },

    #[error("Extraction task failed to complete: {0}")]
    TaskJoin(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type alias for import operations
pub type Result<T> = std::result::Result<T, ImportError>;
