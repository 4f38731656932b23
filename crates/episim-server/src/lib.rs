//! EPISIM Server Library
//!
//! HTTP backend for epidemiological simulation metadata and results. The
//! crate is organized as:
//!
//! - [`config`]: environment-driven server configuration
//! - [`db`]: PostgreSQL pool construction and database errors
//! - [`features`]: vertical CQRS slices for the catalog entities (groups,
//!   compartments, interventions, parameter definitions, models, nodes,
//!   node lists, scenarios)
//! - [`import`]: the scenario simulation-data import pipeline (archive
//!   intake, catalog cross-validation, concurrent per-percentile extraction,
//!   atomic datapoint replacement)
//! - [`api`] / [`middleware`] / [`error`]: HTTP plumbing

pub mod api;
pub mod config;
pub mod cqrs;
pub mod db;
pub mod error;
pub mod features;
pub mod import;
pub mod middleware;
