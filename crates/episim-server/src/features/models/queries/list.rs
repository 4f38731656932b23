use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListModelsQuery {}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ModelSummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListModelsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<ModelSummary>, ListModelsError>> for ListModelsQuery {}

impl crate::cqrs::middleware::Query for ListModelsQuery {}

#[tracing::instrument(skip(pool, _query))]
pub async fn handle(
    pool: PgPool,
    _query: ListModelsQuery,
) -> Result<Vec<ModelSummary>, ListModelsError> {
    let models = sqlx::query_as::<_, ModelSummary>(
        "SELECT id, name, description, created_at FROM models ORDER BY name",
    )
    .fetch_all(&pool)
    .await?;

    Ok(models)
}
