//! Geographic node management
//!
//! Nodes carry a canonical padded code; series files reference nodes by this
//! code during import.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::nodes_routes;
