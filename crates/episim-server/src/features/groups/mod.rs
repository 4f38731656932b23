//! Population group management
//!
//! Groups are named population strata (e.g. age bands) referenced by models
//! and, through them, validated against imported simulation data.

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::groups_routes;
