//! Create group command

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::features::shared::validation::{validate_name, NameValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupCommand {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroupResponse {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateGroupError {
    #[error(transparent)]
    Name(#[from] NameValidationError),
    #[error("Group '{0}' already exists")]
    Duplicate(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CreateGroupResponse, CreateGroupError>> for CreateGroupCommand {}

impl crate::cqrs::middleware::Command for CreateGroupCommand {}

impl CreateGroupCommand {
    pub fn validate(&self) -> Result<(), CreateGroupError> {
        validate_name(&self.name, 255)?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
pub async fn handle(
    pool: PgPool,
    command: CreateGroupCommand,
) -> Result<CreateGroupResponse, CreateGroupError> {
    command.validate()?;

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO groups (name, description, category) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(&command.name)
    .bind(&command.description)
    .bind(&command.category)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if db::is_unique_violation(&e) {
            CreateGroupError::Duplicate(command.name.clone())
        } else {
            CreateGroupError::Database(e)
        }
    })?;

    tracing::info!(group_id = %id, "Group created");

    Ok(CreateGroupResponse { id })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_success() {
        let cmd = CreateGroupCommand {
            name: "age0-19".to_string(),
            description: Some("Ages 0 through 19".to_string()),
            category: Some("age".to_string()),
        };
        assert!(cmd.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_name() {
        let cmd = CreateGroupCommand {
            name: "".to_string(),
            description: None,
            category: None,
        };
        assert!(matches!(
            cmd.validate(),
            Err(CreateGroupError::Name(NameValidationError::Required))
        ));
    }
}
