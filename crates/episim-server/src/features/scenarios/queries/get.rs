//! Get scenario query

use chrono::{DateTime, NaiveDate, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetScenarioQuery {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScenarioParameterValue {
    pub parameter_id: Uuid,
    pub value_min: f64,
    pub value_max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDetails {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub model_id: Uuid,
    pub node_list_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub submitted_at: DateTime<Utc>,
    /// Stamped by the last successful data import, if any.
    pub simulated_at: Option<DateTime<Utc>>,
    pub parameter_values: Vec<ScenarioParameterValue>,
    pub linked_interventions: Vec<Uuid>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetScenarioError {
    #[error("Scenario '{0}' not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<ScenarioDetails, GetScenarioError>> for GetScenarioQuery {}

impl crate::cqrs::middleware::Query for GetScenarioQuery {}

#[derive(Debug, sqlx::FromRow)]
struct ScenarioRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    model_id: Uuid,
    node_list_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    submitted_at: DateTime<Utc>,
    simulated_at: Option<DateTime<Utc>>,
}

#[tracing::instrument(skip(pool), fields(scenario_id = %query.id))]
pub async fn handle(
    pool: PgPool,
    query: GetScenarioQuery,
) -> Result<ScenarioDetails, GetScenarioError> {
    let row = sqlx::query_as::<_, ScenarioRow>(
        "SELECT id, name, description, model_id, node_list_id, start_date, end_date, \
                submitted_at, simulated_at \
         FROM scenarios WHERE id = $1",
    )
    .bind(query.id)
    .fetch_optional(&pool)
    .await?
    .ok_or(GetScenarioError::NotFound(query.id))?;

    let parameter_values = sqlx::query_as::<_, ScenarioParameterValue>(
        "SELECT parameter_id, value_min, value_max \
         FROM scenario_parameter_values WHERE scenario_id = $1",
    )
    .bind(query.id)
    .fetch_all(&pool)
    .await?;

    let linked_interventions = sqlx::query_scalar::<_, Uuid>(
        "SELECT intervention_id FROM scenario_interventions WHERE scenario_id = $1",
    )
    .bind(query.id)
    .fetch_all(&pool)
    .await?;

    Ok(ScenarioDetails {
        id: row.id,
        name: row.name,
        description: row.description,
        model_id: row.model_id,
        node_list_id: row.node_list_id,
        start_date: row.start_date,
        end_date: row.end_date,
        submitted_at: row.submitted_at,
        simulated_at: row.simulated_at,
        parameter_values,
        linked_interventions,
    })
}
