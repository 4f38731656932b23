use chrono::{DateTime, NaiveDate, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListScenariosQuery {}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScenarioSummary {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub model_id: Uuid,
    pub node_list_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub simulated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListScenariosError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<ScenarioSummary>, ListScenariosError>> for ListScenariosQuery {}

impl crate::cqrs::middleware::Query for ListScenariosQuery {}

#[tracing::instrument(skip(pool, _query))]
pub async fn handle(
    pool: PgPool,
    _query: ListScenariosQuery,
) -> Result<Vec<ScenarioSummary>, ListScenariosError> {
    let scenarios = sqlx::query_as::<_, ScenarioSummary>(
        "SELECT id, name, description, model_id, node_list_id, start_date, end_date, \
                simulated_at \
         FROM scenarios ORDER BY submitted_at DESC",
    )
    .fetch_all(&pool)
    .await?;

    Ok(scenarios)
}
