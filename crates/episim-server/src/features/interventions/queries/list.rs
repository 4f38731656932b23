use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::get::InterventionDetails;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListInterventionsQuery {}

#[derive(Debug, thiserror::Error)]
pub enum ListInterventionsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<InterventionDetails>, ListInterventionsError>> for ListInterventionsQuery {}

impl crate::cqrs::middleware::Query for ListInterventionsQuery {}

#[tracing::instrument(skip(pool, _query))]
pub async fn handle(
    pool: PgPool,
    _query: ListInterventionsQuery,
) -> Result<Vec<InterventionDetails>, ListInterventionsError> {
    let interventions = sqlx::query_as::<_, InterventionDetails>(
        "SELECT id, name, description, created_at FROM interventions ORDER BY name",
    )
    .fetch_all(&pool)
    .await?;

    Ok(interventions)
}
