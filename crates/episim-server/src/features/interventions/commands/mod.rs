pub mod create;
pub mod delete;

pub use create::{CreateInterventionCommand, CreateInterventionError, CreateInterventionResponse};
pub use delete::{DeleteInterventionCommand, DeleteInterventionError, DeleteInterventionResponse};
