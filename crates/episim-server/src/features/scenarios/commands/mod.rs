pub mod create;
pub mod delete;

pub use create::{
    CreateScenarioCommand, CreateScenarioError, CreateScenarioResponse, ParameterValueInput,
};
pub use delete::{DeleteScenarioCommand, DeleteScenarioError, DeleteScenarioResponse};
