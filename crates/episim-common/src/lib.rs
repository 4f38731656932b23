//! EPISIM Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the EPISIM workspace.
//!
//! - **Error Handling**: the workspace-wide [`EpisimError`] and `Result` alias
//! - **Logging**: tracing subscriber initialization shared by all binaries
//! - **Checksums**: digest helpers used to fingerprint uploaded archives
//! - **Types**: small domain types shared between the server and the import
//!   pipeline

pub mod checksum;
pub mod error;
pub mod logging;
pub mod types;

pub use error::{EpisimError, Result};
