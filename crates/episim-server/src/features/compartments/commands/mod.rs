pub mod create;
pub mod delete;

pub use create::{CreateCompartmentCommand, CreateCompartmentError, CreateCompartmentResponse};
pub use delete::{DeleteCompartmentCommand, DeleteCompartmentError, DeleteCompartmentResponse};
