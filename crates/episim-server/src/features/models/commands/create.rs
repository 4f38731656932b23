//! Create model command
//!
//! Inserts the model and its group/compartment/parameter memberships in one
//! transaction; a reference to an unknown catalog entity rolls the whole
//! creation back.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::db;
use crate::features::shared::validation::{validate_name, NameValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateModelCommand {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub group_ids: Vec<Uuid>,
    pub compartment_ids: Vec<Uuid>,
    #[serde(default)]
    pub parameter_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateModelResponse {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateModelError {
    #[error(transparent)]
    Name(#[from] NameValidationError),
    #[error("Model must reference at least one group")]
    GroupsRequired,
    #[error("Model must reference at least one compartment")]
    CompartmentsRequired,
    #[error("Model references an unknown {0}")]
    UnknownReference(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CreateModelResponse, CreateModelError>> for CreateModelCommand {}

impl crate::cqrs::middleware::Command for CreateModelCommand {}

impl CreateModelCommand {
    pub fn validate(&self) -> Result<(), CreateModelError> {
        validate_name(&self.name, 255)?;
        if self.group_ids.is_empty() {
            return Err(CreateModelError::GroupsRequired);
        }
        if self.compartment_ids.is_empty() {
            return Err(CreateModelError::CompartmentsRequired);
        }
        Ok(())
    }
}

async fn link_members(
    tx: &mut Transaction<'_, Postgres>,
    statement: &str,
    model_id: Uuid,
    member_ids: &[Uuid],
    kind: &'static str,
) -> Result<(), CreateModelError> {
    for member_id in member_ids {
        sqlx::query(statement)
            .bind(model_id)
            .bind(member_id)
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                if db::is_foreign_key_violation(&e) {
                    CreateModelError::UnknownReference(kind)
                } else {
                    CreateModelError::Database(e)
                }
            })?;
    }
    Ok(())
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name))]
pub async fn handle(
    pool: PgPool,
    command: CreateModelCommand,
) -> Result<CreateModelResponse, CreateModelError> {
    command.validate()?;

    let mut tx = pool.begin().await?;

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO models (name, description) VALUES ($1, $2) RETURNING id",
    )
    .bind(&command.name)
    .bind(&command.description)
    .fetch_one(&mut *tx)
    .await?;

    link_members(
        &mut tx,
        "INSERT INTO model_groups (model_id, group_id) VALUES ($1, $2)",
        id,
        &command.group_ids,
        "group",
    )
    .await?;
    link_members(
        &mut tx,
        "INSERT INTO model_compartments (model_id, compartment_id) VALUES ($1, $2)",
        id,
        &command.compartment_ids,
        "compartment",
    )
    .await?;
    link_members(
        &mut tx,
        "INSERT INTO model_parameters (model_id, parameter_id) VALUES ($1, $2)",
        id,
        &command.parameter_ids,
        "parameter definition",
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        model_id = %id,
        groups = command.group_ids.len(),
        compartments = command.compartment_ids.len(),
        "Model created"
    );

    Ok(CreateModelResponse { id })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_command() -> CreateModelCommand {
        CreateModelCommand {
            name: "secihurd".to_string(),
            description: None,
            group_ids: vec![Uuid::new_v4()],
            compartment_ids: vec![Uuid::new_v4()],
            parameter_ids: vec![],
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(base_command().validate().is_ok());
    }

    #[test]
    fn test_validation_requires_groups() {
        let mut cmd = base_command();
        cmd.group_ids.clear();
        assert!(matches!(
            cmd.validate(),
            Err(CreateModelError::GroupsRequired)
        ));
    }

    #[test]
    fn test_validation_requires_compartments() {
        let mut cmd = base_command();
        cmd.compartment_ids.clear();
        assert!(matches!(
            cmd.validate(),
            Err(CreateModelError::CompartmentsRequired)
        ));
    }
}
