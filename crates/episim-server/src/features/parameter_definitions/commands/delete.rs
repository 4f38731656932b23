use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteParameterDefinitionCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteParameterDefinitionResponse {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteParameterDefinitionError {
    #[error("Parameter definition '{0}' not found")]
    NotFound(Uuid),
    #[error("Parameter definition '{0}' is referenced and cannot be deleted")]
    InUse(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteParameterDefinitionResponse, DeleteParameterDefinitionError>>
    for DeleteParameterDefinitionCommand
{
}

impl crate::cqrs::middleware::Command for DeleteParameterDefinitionCommand {}

#[tracing::instrument(skip(pool), fields(parameter_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteParameterDefinitionCommand,
) -> Result<DeleteParameterDefinitionResponse, DeleteParameterDefinitionError> {
    let result = sqlx::query("DELETE FROM parameter_definitions WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await
        .map_err(|e| {
            if db::is_foreign_key_violation(&e) {
                DeleteParameterDefinitionError::InUse(command.id)
            } else {
                DeleteParameterDefinitionError::Database(e)
            }
        })?;

    if result.rows_affected() == 0 {
        return Err(DeleteParameterDefinitionError::NotFound(command.id));
    }

    Ok(DeleteParameterDefinitionResponse { id: command.id })
}
