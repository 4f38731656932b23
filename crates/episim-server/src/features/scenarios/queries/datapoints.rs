//! Filtered datapoint query
//!
//! Returns a scenario's imported datapoints, optionally filtered by node
//! codes, group names, compartment names, percentiles, and date range.
//! Consumers query by filter; row order carries no meaning beyond the
//! day-major sort applied here for stable output.

use chrono::NaiveDate;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListDatapointsQuery {
    pub scenario_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compartments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentiles: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DatapointRecord {
    pub day: NaiveDate,
    pub node: String,
    #[serde(rename = "group")]
    pub group_name: String,
    pub compartment: String,
    pub percentile: i32,
    pub value: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum ListDatapointsError {
    #[error("Scenario '{0}' not found")]
    ScenarioNotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Vec<DatapointRecord>, ListDatapointsError>> for ListDatapointsQuery {}

impl crate::cqrs::middleware::Query for ListDatapointsQuery {}

#[tracing::instrument(skip(pool, query), fields(scenario_id = %query.scenario_id))]
pub async fn handle(
    pool: PgPool,
    query: ListDatapointsQuery,
) -> Result<Vec<DatapointRecord>, ListDatapointsError> {
    let scenario_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM scenarios WHERE id = $1)")
            .bind(query.scenario_id)
            .fetch_one(&pool)
            .await?;
    if !scenario_exists {
        return Err(ListDatapointsError::ScenarioNotFound(query.scenario_id));
    }

    let mut builder = QueryBuilder::new(
        "SELECT d.day, n.code AS node, g.name AS group_name, c.name AS compartment, \
                d.percentile, d.value \
         FROM datapoints d \
         JOIN nodes n ON n.id = d.node_id \
         JOIN groups g ON g.id = d.group_id \
         JOIN compartments c ON c.id = d.compartment_id \
         WHERE d.scenario_id = ",
    );
    builder.push_bind(query.scenario_id);

    if let Some(nodes) = &query.nodes {
        builder.push(" AND n.code = ANY(");
        builder.push_bind(nodes);
        builder.push(")");
    }
    if let Some(groups) = &query.groups {
        builder.push(" AND g.name = ANY(");
        builder.push_bind(groups);
        builder.push(")");
    }
    if let Some(compartments) = &query.compartments {
        builder.push(" AND c.name = ANY(");
        builder.push_bind(compartments);
        builder.push(")");
    }
    if let Some(percentiles) = &query.percentiles {
        builder.push(" AND d.percentile = ANY(");
        builder.push_bind(percentiles);
        builder.push(")");
    }
    if let Some(start_date) = query.start_date {
        builder.push(" AND d.day >= ");
        builder.push_bind(start_date);
    }
    if let Some(end_date) = query.end_date {
        builder.push(" AND d.day <= ");
        builder.push_bind(end_date);
    }

    builder.push(" ORDER BY d.day, n.code, g.name, d.percentile");

    let datapoints = builder
        .build_query_as::<DatapointRecord>()
        .fetch_all(&pool)
        .await?;

    Ok(datapoints)
}
