use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteNodeListCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteNodeListResponse {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteNodeListError {
    #[error("Node list '{0}' not found")]
    NotFound(Uuid),
    #[error("Node list '{0}' is referenced by a scenario and cannot be deleted")]
    InUse(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteNodeListResponse, DeleteNodeListError>> for DeleteNodeListCommand {}

impl crate::cqrs::middleware::Command for DeleteNodeListCommand {}

#[tracing::instrument(skip(pool), fields(node_list_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteNodeListCommand,
) -> Result<DeleteNodeListResponse, DeleteNodeListError> {
    let result = sqlx::query("DELETE FROM node_lists WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await
        .map_err(|e| {
            if db::is_foreign_key_violation(&e) {
                DeleteNodeListError::InUse(command.id)
            } else {
                DeleteNodeListError::Database(e)
            }
        })?;

    if result.rows_affected() == 0 {
        return Err(DeleteNodeListError::NotFound(command.id));
    }

    Ok(DeleteNodeListResponse { id: command.id })
}
