pub mod datapoints;
pub mod get;
pub mod list;

pub use datapoints::{DatapointRecord, ListDatapointsError, ListDatapointsQuery};
pub use get::{GetScenarioError, GetScenarioQuery, ScenarioDetails};
pub use list::{ListScenariosError, ListScenariosQuery, ScenarioSummary};
