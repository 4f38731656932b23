//! Intervention template management

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::interventions_routes;
