use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::get::ParameterDefinitionDetails;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListParameterDefinitionsQuery {}

#[derive(Debug, thiserror::Error)]
pub enum ListParameterDefinitionsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<ParameterDefinitionDetails>, ListParameterDefinitionsError>>
    for ListParameterDefinitionsQuery
{
}

impl crate::cqrs::middleware::Query for ListParameterDefinitionsQuery {}

#[tracing::instrument(skip(pool, _query))]
pub async fn handle(
    pool: PgPool,
    _query: ListParameterDefinitionsQuery,
) -> Result<Vec<ParameterDefinitionDetails>, ListParameterDefinitionsError> {
    let definitions = sqlx::query_as::<_, ParameterDefinitionDetails>(
        "SELECT id, name, description, created_at FROM parameter_definitions ORDER BY name",
    )
    .fetch_all(&pool)
    .await?;

    Ok(definitions)
}
