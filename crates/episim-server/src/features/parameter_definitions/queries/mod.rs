pub mod get;
pub mod list;

pub use get::{GetParameterDefinitionError, GetParameterDefinitionQuery, ParameterDefinitionDetails};
pub use list::{ListParameterDefinitionsError, ListParameterDefinitionsQuery};
