pub mod create;
pub mod delete;

pub use create::{CreateGroupCommand, CreateGroupError, CreateGroupResponse};
pub use delete::{DeleteGroupCommand, DeleteGroupError, DeleteGroupResponse};
