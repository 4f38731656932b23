pub mod create;
pub mod delete;

pub use create::{
    CreateParameterDefinitionCommand, CreateParameterDefinitionError,
    CreateParameterDefinitionResponse,
};
pub use delete::{
    DeleteParameterDefinitionCommand, DeleteParameterDefinitionError,
    DeleteParameterDefinitionResponse,
};
