//! Get group query

use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetGroupQuery {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GroupDetails {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetGroupError {
    #[error("Group '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<GroupDetails, GetGroupError>> for GetGroupQuery {}

impl crate::cqrs::middleware::Query for GetGroupQuery {}

#[tracing::instrument(skip(pool), fields(group_id = %query.id))]
pub async fn handle(pool: PgPool, query: GetGroupQuery) -> Result<GroupDetails, GetGroupError> {
    sqlx::query_as::<_, GroupDetails>(
        "SELECT id, name, description, category, created_at FROM groups WHERE id = $1",
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetGroupError::NotFound(query.id))
}
