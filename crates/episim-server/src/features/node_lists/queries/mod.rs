pub mod get;
pub mod list;

pub use get::{GetNodeListError, GetNodeListQuery, NodeListDetails};
pub use list::{ListNodeListsError, ListNodeListsQuery};
