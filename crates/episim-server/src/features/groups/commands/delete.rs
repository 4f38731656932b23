//! Delete group command

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteGroupCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteGroupResponse {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteGroupError {
    #[error("Group '{0}' not found")]
    NotFound(Uuid),
    #[error("Group '{0}' is referenced by a model and cannot be deleted")]
    InUse(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteGroupResponse, DeleteGroupError>> for DeleteGroupCommand {}

impl crate::cqrs::middleware::Command for DeleteGroupCommand {}

#[tracing::instrument(skip(pool), fields(group_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteGroupCommand,
) -> Result<DeleteGroupResponse, DeleteGroupError> {
    let result = sqlx::query("DELETE FROM groups WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await
        .map_err(|e| {
            if db::is_foreign_key_violation(&e) {
                DeleteGroupError::InUse(command.id)
            } else {
                DeleteGroupError::Database(e)
            }
        })?;

    if result.rows_affected() == 0 {
        return Err(DeleteGroupError::NotFound(command.id));
    }

    tracing::info!("Group deleted");

    Ok(DeleteGroupResponse { id: command.id })
}
