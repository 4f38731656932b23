pub mod create;
pub mod delete;

pub use create::{CreateNodeCommand, CreateNodeError, CreateNodeResponse};
pub use delete::{DeleteNodeCommand, DeleteNodeError, DeleteNodeResponse};
