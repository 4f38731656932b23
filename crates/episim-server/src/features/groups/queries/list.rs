//! List groups query

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::get::GroupDetails;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListGroupsQuery {}

#[derive(Debug, thiserror::Error)]
pub enum ListGroupsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<GroupDetails>, ListGroupsError>> for ListGroupsQuery {}

impl crate::cqrs::middleware::Query for ListGroupsQuery {}

#[tracing::instrument(skip(pool, _query))]
pub async fn handle(
    pool: PgPool,
    _query: ListGroupsQuery,
) -> Result<Vec<GroupDetails>, ListGroupsError> {
    let groups = sqlx::query_as::<_, GroupDetails>(
        "SELECT id, name, description, category, created_at FROM groups ORDER BY name",
    )
    .fetch_all(&pool)
    .await?;

    Ok(groups)
}
