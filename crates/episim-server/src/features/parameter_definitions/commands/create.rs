use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::shared::validation::{validate_name, NameValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateParameterDefinitionCommand {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateParameterDefinitionResponse {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateParameterDefinitionError {
    #[error(transparent)]
    Name(#[from] NameValidationError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CreateParameterDefinitionResponse, CreateParameterDefinitionError>>
    for CreateParameterDefinitionCommand
{
}

impl crate::cqrs::middleware::Command for CreateParameterDefinitionCommand {}

impl CreateParameterDefinitionCommand {
    pub fn validate(&self) -> Result<(), CreateParameterDefinitionError> {
        validate_name(&self.name, 255)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
pub async fn handle(
    pool: PgPool,
    command: CreateParameterDefinitionCommand,
) -> Result<CreateParameterDefinitionResponse, CreateParameterDefinitionError> {
    command.validate()?;

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO parameter_definitions (name, description) VALUES ($1, $2) RETURNING id",
    )
    .bind(&command.name)
    .bind(&command.description)
    .fetch_one(&pool)
    .await?;

    tracing::info!(parameter_id = %id, "Parameter definition created");

    Ok(CreateParameterDefinitionResponse { id })
}
