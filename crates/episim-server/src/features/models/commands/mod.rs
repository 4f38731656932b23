pub mod create;
pub mod delete;

pub use create::{CreateModelCommand, CreateModelError, CreateModelResponse};
pub use delete::{DeleteModelCommand, DeleteModelError, DeleteModelResponse};
