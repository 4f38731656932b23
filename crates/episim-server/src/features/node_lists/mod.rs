//! Node list management
//!
//! A node list is an ordered membership set of nodes; each scenario
//! references exactly one, and the import pipeline validates series files
//! against it.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::node_lists_routes;
