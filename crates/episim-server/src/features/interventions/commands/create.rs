use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{validate_name, NameValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInterventionCommand {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInterventionResponse {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateInterventionError {
    #[error(transparent)]
    Name(#[from] NameValidationError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CreateInterventionResponse, CreateInterventionError>>
    for CreateInterventionCommand
{
}

impl crate::cqrs::middleware::Command for CreateInterventionCommand {}

impl CreateInterventionCommand {
    pub fn validate(&self) -> Result<(), CreateInterventionError> {
        validate_name(&self.name, 255)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
pub async fn handle(
    pool: PgPool,
    command: CreateInterventionCommand,
) -> Result<CreateInterventionResponse, CreateInterventionError> {
    command.validate()?;

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO interventions (name, description) VALUES ($1, $2) RETURNING id",
    )
    .bind(&command.name)
    .bind(&command.description)
    .fetch_one(&pool)
    .await?;

    tracing::info!(intervention_id = %id, "Intervention created");

    Ok(CreateInterventionResponse { id })
}
