//! Get compartment query

use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCompartmentQuery {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompartmentDetails {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetCompartmentError {
    #[error("Compartment '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CompartmentDetails, GetCompartmentError>> for GetCompartmentQuery {}

impl crate::cqrs::middleware::Query for GetCompartmentQuery {}

#[tracing::instrument(skip(pool), fields(compartment_id = %query.id))]
pub async fn handle(
    pool: PgPool,
    query: GetCompartmentQuery,
) -> Result<CompartmentDetails, GetCompartmentError> {
    sqlx::query_as::<_, CompartmentDetails>(
        "SELECT id, name, description, tags, created_at FROM compartments WHERE id = $1",
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetCompartmentError::NotFound(query.id))
}
