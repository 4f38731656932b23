//! Delete scenario command
//!
//! Removes the scenario together with its parameter values, intervention
//! links, and imported datapoints (cascade).

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteScenarioCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteScenarioResponse {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteScenarioError {
    #[error("Scenario '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteScenarioResponse, DeleteScenarioError>> for DeleteScenarioCommand {}

impl crate::cqrs::middleware::Command for DeleteScenarioCommand {}

#[tracing::instrument(skip(pool), fields(scenario_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteScenarioCommand,
) -> Result<DeleteScenarioResponse, DeleteScenarioError> {
    let result = sqlx::query("DELETE FROM scenarios WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteScenarioError::NotFound(command.id));
    }

    tracing::info!("Scenario deleted");

    Ok(DeleteScenarioResponse { id: command.id })
}
