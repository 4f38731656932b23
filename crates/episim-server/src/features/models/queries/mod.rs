pub mod get;
pub mod list;

pub use get::{GetModelError, GetModelQuery, ModelDetails};
pub use list::{ListModelsError, ListModelsQuery};
