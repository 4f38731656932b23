use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteNodeCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteNodeResponse {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteNodeError {
    #[error("Node '{0}' not found")]
    NotFound(Uuid),
    #[error("Node '{0}' is a member of a node list and cannot be deleted")]
    InUse(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteNodeResponse, DeleteNodeError>> for DeleteNodeCommand {}

impl crate::cqrs::middleware::Command for DeleteNodeCommand {}

#[tracing::instrument(skip(pool), fields(node_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteNodeCommand,
) -> Result<DeleteNodeResponse, DeleteNodeError> {
    let result = sqlx::query("DELETE FROM nodes WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await
        .map_err(|e| {
            if db::is_foreign_key_violation(&e) {
                DeleteNodeError::InUse(command.id)
            } else {
                DeleteNodeError::Database(e)
            }
        })?;

    if result.rows_affected() == 0 {
        return Err(DeleteNodeError::NotFound(command.id));
    }

    Ok(DeleteNodeResponse { id: command.id })
}
