use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::get::NodeDetails;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListNodesQuery {}

#[derive(Debug, thiserror::Error)]
pub enum ListNodesError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<NodeDetails>, ListNodesError>> for ListNodesQuery {}

impl crate::cqrs::middleware::Query for ListNodesQuery {}

#[tracing::instrument(skip(pool, _query))]
pub async fn handle(
    pool: PgPool,
    _query: ListNodesQuery,
) -> Result<Vec<NodeDetails>, ListNodesError> {
    let nodes = sqlx::query_as::<_, NodeDetails>(
        "SELECT id, name, code, description, created_at FROM nodes ORDER BY code",
    )
    .fetch_all(&pool)
    .await?;

    Ok(nodes)
}
