use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetNodeQuery {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NodeDetails {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetNodeError {
    #[error("Node '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<NodeDetails, GetNodeError>> for GetNodeQuery {}

impl crate::cqrs::middleware::Query for GetNodeQuery {}

#[tracing::instrument(skip(pool), fields(node_id = %query.id))]
pub async fn handle(pool: PgPool, query: GetNodeQuery) -> Result<NodeDetails, GetNodeError> {
    sqlx::query_as::<_, NodeDetails>(
        "SELECT id, name, code, description, created_at FROM nodes WHERE id = $1",
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetNodeError::NotFound(query.id))
}
