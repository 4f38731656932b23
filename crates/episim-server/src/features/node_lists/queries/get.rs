//! Get node list query
//!
//! Returns the list with its members in stored order.

use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetNodeListQuery {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NodeListMember {
    pub id: Uuid,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeListDetails {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub nodes: Vec<NodeListMember>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetNodeListError {
    #[error("Node list '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<NodeListDetails, GetNodeListError>> for GetNodeListQuery {}

impl crate::cqrs::middleware::Query for GetNodeListQuery {}

#[derive(Debug, sqlx::FromRow)]
struct NodeListRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

#[tracing::instrument(skip(pool), fields(node_list_id = %query.id))]
pub async fn handle(
    pool: PgPool,
    query: GetNodeListQuery,
) -> Result<NodeListDetails, GetNodeListError> {
    let row = sqlx::query_as::<_, NodeListRow>(
        "SELECT id, name, description, created_at FROM node_lists WHERE id = $1",
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetNodeListError::NotFound(query.id))?;

    let nodes = sqlx::query_as::<_, NodeListMember>(
        "SELECT n.id, n.name, n.code FROM nodes n \
         JOIN node_list_nodes l ON l.node_id = n.id \
         WHERE l.node_list_id = $1 ORDER BY l.position",
    )
    .bind(query.id)
    .fetch_all(&pool)
    .await?;

    Ok(NodeListDetails {
        id: row.id,
        name: row.name,
        description: row.description,
        created_at: row.created_at,
        nodes,
    })
}
