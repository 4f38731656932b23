//! List compartments query

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::get::CompartmentDetails;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListCompartmentsQuery {}

#[derive(Debug, thiserror::Error)]
pub enum ListCompartmentsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<CompartmentDetails>, ListCompartmentsError>> for ListCompartmentsQuery {}

impl crate::cqrs::middleware::Query for ListCompartmentsQuery {}

#[tracing::instrument(skip(pool, _query))]
pub async fn handle(
    pool: PgPool,
    _query: ListCompartmentsQuery,
) -> Result<Vec<CompartmentDetails>, ListCompartmentsError> {
    let compartments = sqlx::query_as::<_, CompartmentDetails>(
        "SELECT id, name, description, tags, created_at FROM compartments ORDER BY name",
    )
    .fetch_all(&pool)
    .await?;

    Ok(compartments)
}
