//! Get model query
//!
//! Returns the model with its group, compartment, and parameter membership
//! sets.

use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetModelQuery {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDetails {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub group_ids: Vec<Uuid>,
    pub compartment_ids: Vec<Uuid>,
    pub parameter_ids: Vec<Uuid>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetModelError {
    #[error("Model '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ModelDetails, GetModelError>> for GetModelQuery {}

impl crate::cqrs::middleware::Query for GetModelQuery {}

#[derive(Debug, sqlx::FromRow)]
struct ModelRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

#[tracing::instrument(skip(pool), fields(model_id = %query.id))]
pub async fn handle(pool: PgPool, query: GetModelQuery) -> Result<ModelDetails, GetModelError> {
    let row = sqlx::query_as::<_, ModelRow>(
        "SELECT id, name, description, created_at FROM models WHERE id = $1",
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetModelError::NotFound(query.id))?;

    let group_ids = sqlx::query_scalar::<_, Uuid>(
        "SELECT group_id FROM model_groups WHERE model_id = $1",
    )
    .bind(query.id)
    .fetch_all(&pool)
    .await?;

    let compartment_ids = sqlx::query_scalar::<_, Uuid>(
        "SELECT compartment_id FROM model_compartments WHERE model_id = $1",
    )
    .bind(query.id)
    .fetch_all(&pool)
    .await?;

    let parameter_ids = sqlx::query_scalar::<_, Uuid>(
        "SELECT parameter_id FROM model_parameters WHERE model_id = $1",
    )
    .bind(query.id)
    .fetch_all(&pool)
    .await?;

    Ok(ModelDetails {
        id: row.id,
        name: row.name,
        description: row.description,
        created_at: row.created_at,
        group_ids,
        compartment_ids,
        parameter_ids,
    })
}
