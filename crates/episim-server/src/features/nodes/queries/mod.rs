pub mod get;
pub mod list;

pub use get::{GetNodeError, GetNodeQuery, NodeDetails};
pub use list::{ListNodesError, ListNodesQuery};
