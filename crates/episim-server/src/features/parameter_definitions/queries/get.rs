use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetParameterDefinitionQuery {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ParameterDefinitionDetails {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetParameterDefinitionError {
    #[error("Parameter definition '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ParameterDefinitionDetails, GetParameterDefinitionError>>
    for GetParameterDefinitionQuery
{
}

impl crate::cqrs::middleware::Query for GetParameterDefinitionQuery {}

#[tracing::instrument(skip(pool), fields(parameter_id = %query.id))]
pub async fn handle(
    pool: PgPool,
    query: GetParameterDefinitionQuery,
) -> Result<ParameterDefinitionDetails, GetParameterDefinitionError> {
    sqlx::query_as::<_, ParameterDefinitionDetails>(
        "SELECT id, name, description, created_at FROM parameter_definitions WHERE id = $1",
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetParameterDefinitionError::NotFound(query.id))
}
