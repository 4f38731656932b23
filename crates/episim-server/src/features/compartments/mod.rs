//! Disease compartment management
//!
//! Compartments are named disease states (e.g. "Hospitalized"). Imported
//! simulation data maps record positions onto compartment names through the
//! fixed ordinal table of the series file format.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::compartments_routes;
