//! Model parameter definition management

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::parameter_definitions_routes;
