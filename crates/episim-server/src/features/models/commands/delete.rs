use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteModelCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteModelResponse {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteModelError {
    #[error("Model '{0}' not found")]
    NotFound(Uuid),
    #[error("Model '{0}' is referenced by a scenario and cannot be deleted")]
    InUse(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteModelResponse, DeleteModelError>> for DeleteModelCommand {}

impl crate::cqrs::middleware::Command for DeleteModelCommand {}

#[tracing::instrument(skip(pool), fields(model_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteModelCommand,
) -> Result<DeleteModelResponse, DeleteModelError> {
    let result = sqlx::query("DELETE FROM models WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await
        .map_err(|e| {
            if db::is_foreign_key_violation(&e) {
                DeleteModelError::InUse(command.id)
            } else {
                DeleteModelError::Database(e)
            }
        })?;

    if result.rows_affected() == 0 {
        return Err(DeleteModelError::NotFound(command.id));
    }

    tracing::info!("Model deleted");

    Ok(DeleteModelResponse { id: command.id })
}
