use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListNodeListsQuery {}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NodeListSummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub node_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListNodeListsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<NodeListSummary>, ListNodeListsError>> for ListNodeListsQuery {}

impl crate::cqrs::middleware::Query for ListNodeListsQuery {}

#[tracing::instrument(skip(pool, _query))]
pub async fn handle(
    pool: PgPool,
    _query: ListNodeListsQuery,
) -> Result<Vec<NodeListSummary>, ListNodeListsError> {
    let lists = sqlx::query_as::<_, NodeListSummary>(
        "SELECT nl.id, nl.name, nl.description, \
                COUNT(l.node_id) AS node_count, nl.created_at \
         FROM node_lists nl \
         LEFT JOIN node_list_nodes l ON l.node_list_id = nl.id \
         GROUP BY nl.id, nl.name, nl.description, nl.created_at \
         ORDER BY nl.name",
    )
    .fetch_all(&pool)
    .await?;

    Ok(lists)
}
