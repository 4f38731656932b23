//! Create node command
//!
//! Node codes are stored in canonical padded form so that import-time
//! matching against series file keys is a plain string comparison.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::features::shared::validation::{
    validate_name, validate_node_code, NameValidationError, NodeCodeValidationError,
};
use crate::import::series::{pad_node_code, NODE_CODE_WIDTH};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNodeCommand {
    pub name: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNodeResponse {
    pub id: Uuid,
    /// Canonical (padded) code as stored.
    pub code: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateNodeError {
    #[error(transparent)]
    Name(#[from] NameValidationError),
    #[error(transparent)]
    Code(#[from] NodeCodeValidationError),
    #[error("Node with code '{0}' already exists")]
    Duplicate(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CreateNodeResponse, CreateNodeError>> for CreateNodeCommand {}

impl crate::cqrs::middleware::Command for CreateNodeCommand {}

impl CreateNodeCommand {
    pub fn validate(&self) -> Result<(), CreateNodeError> {
        validate_name(&self.name, 255)?;
        validate_node_code(&self.code, NODE_CODE_WIDTH)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name, code = %command.code))]
pub async fn handle(
    pool: PgPool,
    command: CreateNodeCommand,
) -> Result<CreateNodeResponse, CreateNodeError> {
    command.validate()?;

    let code = pad_node_code(&command.code);

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO nodes (name, code, description) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&command.name)
    .bind(&code)
    .bind(&command.description)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if db::is_unique_violation(&e) {
            CreateNodeError::Duplicate(code.clone())
        } else {
            CreateNodeError::Database(e)
        }
    })?;

    tracing::info!(node_id = %id, code = %code, "Node created");

    Ok(CreateNodeResponse { id, code })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_rejects_non_numeric_code() {
        let cmd = CreateNodeCommand {
            name: "Berlin".to_string(),
            code: "B1000".to_string(),
            description: None,
        };
        assert!(matches!(
            cmd.validate(),
            Err(CreateNodeError::Code(NodeCodeValidationError::InvalidFormat))
        ));
    }

    #[test]
    fn test_validation_accepts_short_code() {
        let cmd = CreateNodeCommand {
            name: "Berlin".to_string(),
            code: "1100".to_string(),
            description: None,
        };
        assert!(cmd.validate().is_ok());
    }
}
