//! Create compartment command

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::features::shared::validation::{validate_name, NameValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompartmentCommand {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompartmentResponse {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateCompartmentError {
    #[error(transparent)]
    Name(#[from] NameValidationError),
    #[error("Compartment '{0}' already exists")]
    Duplicate(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CreateCompartmentResponse, CreateCompartmentError>>
    for CreateCompartmentCommand
{
}

impl crate::cqrs::middleware::Command for CreateCompartmentCommand {}

impl CreateCompartmentCommand {
    pub fn validate(&self) -> Result<(), CreateCompartmentError> {
        validate_name(&self.name, 255)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
pub async fn handle(
    pool: PgPool,
    command: CreateCompartmentCommand,
) -> Result<CreateCompartmentResponse, CreateCompartmentError> {
    command.validate()?;

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO compartments (name, description, tags) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&command.name)
    .bind(&command.description)
    .bind(&command.tags)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if db::is_unique_violation(&e) {
            CreateCompartmentError::Duplicate(command.name.clone())
        } else {
            CreateCompartmentError::Database(e)
        }
    })?;

    tracing::info!(compartment_id = %id, "Compartment created");

    Ok(CreateCompartmentResponse { id })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_empty_name() {
        let cmd = CreateCompartmentCommand {
            name: "  ".to_string(),
            description: None,
            tags: None,
        };
        assert!(matches!(
            cmd.validate(),
            Err(CreateCompartmentError::Name(NameValidationError::Required))
        ));
    }
}
