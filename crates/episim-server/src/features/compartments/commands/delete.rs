//! Delete compartment command

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCompartmentCommand {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCompartmentResponse {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteCompartmentError {
    #[error("Compartment '{0}' not found")]
    NotFound(Uuid),
    #[error("Compartment '{0}' is referenced by a model and cannot be deleted")]
    InUse(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteCompartmentResponse, DeleteCompartmentError>>
    for DeleteCompartmentCommand
{
}

impl crate::cqrs::middleware::Command for DeleteCompartmentCommand {}

#[tracing::instrument(skip(pool), fields(compartment_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteCompartmentCommand,
) -> Result<DeleteCompartmentResponse, DeleteCompartmentError> {
    let result = sqlx::query("DELETE FROM compartments WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await
        .map_err(|e| {
            if db::is_foreign_key_violation(&e) {
                DeleteCompartmentError::InUse(command.id)
            } else {
                DeleteCompartmentError::Database(e)
            }
        })?;

    if result.rows_affected() == 0 {
        return Err(DeleteCompartmentError::NotFound(command.id));
    }

    tracing::info!("Compartment deleted");

    Ok(DeleteCompartmentResponse { id: command.id })
}
