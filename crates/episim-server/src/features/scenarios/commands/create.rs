//! Create scenario command

use chrono::NaiveDate;
use episim_common::types::DateSpan;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::features::shared::validation::{validate_name, NameValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterValueInput {
    pub parameter_id: Uuid,
    pub value_min: f64,
    pub value_max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScenarioCommand {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub model_id: Uuid,
    pub node_list_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub parameter_values: Vec<ParameterValueInput>,
    #[serde(default)]
    pub linked_interventions: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScenarioResponse {
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateScenarioError {
    #[error(transparent)]
    Name(#[from] NameValidationError),
    #[error("End date {end} precedes start date {start}")]
    InvalidDateSpan { start: NaiveDate, end: NaiveDate },
    #[error("Parameter value range is inverted (min {min} > max {max})")]
    InvalidParameterRange { min: f64, max: f64 },
    #[error("Model '{0}' not found")]
    ModelNotFound(Uuid),
    #[error("Node list '{0}' not found")]
    NodeListNotFound(Uuid),
    #[error("Scenario references an unknown {0}")]
    UnknownReference(&'static str),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CreateScenarioResponse, CreateScenarioError>> for CreateScenarioCommand {}

impl crate::cqrs::middleware::Command for CreateScenarioCommand {}

impl CreateScenarioCommand {
    pub fn validate(&self) -> Result<(), CreateScenarioError> {
        validate_name(&self.name, 255)?;
        DateSpan::new(self.start_date, self.end_date).map_err(|_| {
            CreateScenarioError::InvalidDateSpan {
                start: self.start_date,
                end: self.end_date,
            }
        })?;
        for value in &self.parameter_values {
            if value.value_min > value.value_max {
                return Err(CreateScenarioError::InvalidParameterRange {
                    min: value.value_min,
                    max: value.value_max,
                });
            }
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name, model_id = %command.model_id))]
pub async fn handle(
    pool: PgPool,
    command: CreateScenarioCommand,
) -> Result<CreateScenarioResponse, CreateScenarioError> {
    command.validate()?;

    let model_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM models WHERE id = $1)")
            .bind(command.model_id)
            .fetch_one(&pool)
            .await?;
    if !model_exists {
        return Err(CreateScenarioError::ModelNotFound(command.model_id));
    }

    let node_list_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM node_lists WHERE id = $1)")
            .bind(command.node_list_id)
            .fetch_one(&pool)
            .await?;
    if !node_list_exists {
        return Err(CreateScenarioError::NodeListNotFound(command.node_list_id));
    }

    let mut tx = pool.begin().await?;

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO scenarios (name, description, model_id, node_list_id, start_date, end_date) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(&command.name)
    .bind(&command.description)
    .bind(command.model_id)
    .bind(command.node_list_id)
    .bind(command.start_date)
    .bind(command.end_date)
    .fetch_one(&mut *tx)
    .await?;

    for value in &command.parameter_values {
        sqlx::query(
            "INSERT INTO scenario_parameter_values \
                 (scenario_id, parameter_id, value_min, value_max) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(value.parameter_id)
        .bind(value.value_min)
        .bind(value.value_max)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if db::is_foreign_key_violation(&e) {
                CreateScenarioError::UnknownReference("parameter definition")
            } else {
                CreateScenarioError::Database(e)
            }
        })?;
    }

    for intervention_id in &command.linked_interventions {
        sqlx::query(
            "INSERT INTO scenario_interventions (scenario_id, intervention_id) VALUES ($1, $2)",
        )
        .bind(id)
        .bind(intervention_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if db::is_foreign_key_violation(&e) {
                CreateScenarioError::UnknownReference("intervention")
            } else {
                CreateScenarioError::Database(e)
            }
        })?;
    }

    tx.commit().await?;

    tracing::info!(scenario_id = %id, "Scenario created");

    Ok(CreateScenarioResponse { id })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn base_command() -> CreateScenarioCommand {
        CreateScenarioCommand {
            name: "baseline".to_string(),
            description: None,
            model_id: Uuid::new_v4(),
            node_list_id: Uuid::new_v4(),
            start_date: date(2024, 3, 1),
            end_date: date(2024, 3, 31),
            parameter_values: vec![],
            linked_interventions: vec![],
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(base_command().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_inverted_dates() {
        let mut cmd = base_command();
        cmd.end_date = date(2024, 2, 1);
        assert!(matches!(
            cmd.validate(),
            Err(CreateScenarioError::InvalidDateSpan { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_inverted_parameter_range() {
        let mut cmd = base_command();
        cmd.parameter_values.push(ParameterValueInput {
            parameter_id: Uuid::new_v4(),
            value_min: 2.0,
            value_max: 1.0,
        });
        assert!(matches!(
            cmd.validate(),
            Err(CreateScenarioError::InvalidParameterRange { .. })
        ));
    }
}
