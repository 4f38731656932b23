//! Feature modules implementing the EPISIM API
//!
//! Each feature is a vertical slice with its own commands, queries, and
//! routes:
//!
//! - **groups**: population strata referenced by models
//! - **compartments**: disease states referenced by models
//! - **interventions**: intervention templates linkable to scenarios
//! - **parameter_definitions**: model parameter definitions
//! - **models**: models and their group/compartment/parameter memberships
//! - **nodes** / **node_lists**: geography and ordered node sets
//! - **scenarios**: scenarios, the simulation-data upload, and the
//!   datapoint query
//!
//! Commands and queries implement the mediator pattern using the `mediator`
//! crate; routes call the slice handlers directly.

pub mod compartments;
pub mod groups;
pub mod interventions;
pub mod models;
pub mod node_lists;
pub mod nodes;
pub mod parameter_definitions;
pub mod scenarios;
pub mod shared;

use axum::Router;
use sqlx::PgPool;

use crate::import::ImportPipeline;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// PostgreSQL connection pool for catalog operations
    pub db: PgPool,
    /// Import pipeline driven by the simulation-data upload endpoint
    pub import: ImportPipeline,
    /// Body size cap for simulation-data uploads
    pub max_upload_bytes: usize,
}

/// Creates the main API router with all feature routes mounted
pub fn router(state: FeatureState) -> Router<()> {
    let scenarios_state = scenarios::ScenariosState {
        db: state.db.clone(),
        import: state.import.clone(),
    };

    Router::new()
        .nest("/groups", groups::groups_routes().with_state(state.db.clone()))
        .nest(
            "/compartments",
            compartments::compartments_routes().with_state(state.db.clone()),
        )
        .nest(
            "/interventions",
            interventions::interventions_routes().with_state(state.db.clone()),
        )
        .nest(
            "/parameter-definitions",
            parameter_definitions::parameter_definitions_routes().with_state(state.db.clone()),
        )
        .nest("/models", models::models_routes().with_state(state.db.clone()))
        .nest("/nodes", nodes::nodes_routes().with_state(state.db.clone()))
        .nest(
            "/node-lists",
            node_lists::node_lists_routes().with_state(state.db.clone()),
        )
        .nest(
            "/scenarios",
            scenarios::scenarios_routes(state.max_upload_bytes).with_state(scenarios_state),
        )
}
