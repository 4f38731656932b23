pub mod create;
pub mod delete;

pub use create::{CreateNodeListCommand, CreateNodeListError, CreateNodeListResponse};
pub use delete::{DeleteNodeListCommand, DeleteNodeListError, DeleteNodeListResponse};
