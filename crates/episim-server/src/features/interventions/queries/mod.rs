pub mod get;
pub mod list;

pub use get::{GetInterventionError, GetInterventionQuery, InterventionDetails};
pub use list::{ListInterventionsError, ListInterventionsQuery};
