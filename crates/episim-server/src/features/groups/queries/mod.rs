pub mod get;
pub mod list;

pub use get::{GetGroupError, GetGroupQuery, GroupDetails};
pub use list::{ListGroupsError, ListGroupsQuery};
