use chrono::{DateTime, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetInterventionQuery {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InterventionDetails {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetInterventionError {
    #[error("Intervention '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<InterventionDetails, GetInterventionError>> for GetInterventionQuery {}

impl crate::cqrs::middleware::Query for GetInterventionQuery {}

#[tracing::instrument(skip(pool), fields(intervention_id = %query.id))]
pub async fn handle(
    pool: PgPool,
    query: GetInterventionQuery,
) -> Result<InterventionDetails, GetInterventionError> {
    sqlx::query_as::<_, InterventionDetails>(
        "SELECT id, name, description, created_at FROM interventions WHERE id = $1",
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetInterventionError::NotFound(query.id))
}
