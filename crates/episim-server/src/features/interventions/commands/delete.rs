use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteInterventionCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteInterventionResponse {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteInterventionError {
    #[error("Intervention '{0}' not found")]
    NotFound(Uuid),
    #[error("Intervention '{0}' is linked to a scenario and cannot be deleted")]
    InUse(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteInterventionResponse, DeleteInterventionError>>
    for DeleteInterventionCommand
{
}

impl crate::cqrs::middleware::Command for DeleteInterventionCommand {}

#[tracing::instrument(skip(pool), fields(intervention_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteInterventionCommand,
) -> Result<DeleteInterventionResponse, DeleteInterventionError> {
    let result = sqlx::query("DELETE FROM interventions WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await
        .map_err(|e| {
            if db::is_foreign_key_violation(&e) {
                DeleteInterventionError::InUse(command.id)
            } else {
                DeleteInterventionError::Database(e)
            }
        })?;

    if result.rows_affected() == 0 {
        return Err(DeleteInterventionError::NotFound(command.id));
    }

    Ok(DeleteInterventionResponse { id: command.id })
}
