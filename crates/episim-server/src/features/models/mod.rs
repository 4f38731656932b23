//! Simulation model management
//!
//! A model defines which groups and compartments are valid for any scenario
//! that uses it, plus the parameters a scenario must provide values for.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::models_routes;
