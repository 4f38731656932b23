pub mod get;
pub mod list;

pub use get::{CompartmentDetails, GetCompartmentError, GetCompartmentQuery};
pub use list::{ListCompartmentsError, ListCompartmentsQuery};
