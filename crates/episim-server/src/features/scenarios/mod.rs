//! Scenario management
//!
//! Scenarios tie a model, a node list, and a simulated date span together.
//! Besides the usual CRUD surface this slice owns the two result-data
//! endpoints: the simulation-data upload (which drives the import pipeline)
//! and the filtered datapoint query.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::{scenarios_routes, ScenariosState};
