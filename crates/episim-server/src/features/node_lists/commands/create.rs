//! Create node list command

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::features::shared::validation::{validate_name, NameValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNodeListCommand {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Member node ids; order is preserved.
    pub node_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNodeListResponse {
    pub id: Uuid,
    pub nodes: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateNodeListError {
    #[error(transparent)]
    Name(#[from] NameValidationError),
    #[error("Node list must contain at least one node")]
    NodesRequired,
    #[error("Node list contains duplicate node ids")]
    DuplicateNodes,
    #[error("Node list references an unknown node")]
    UnknownNode,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<CreateNodeListResponse, CreateNodeListError>> for CreateNodeListCommand {}

impl crate::cqrs::middleware::Command for CreateNodeListCommand {}

impl CreateNodeListCommand {
    pub fn validate(&self) -> Result<(), CreateNodeListError> {
        validate_name(&self.name, 255)?;
        if self.node_ids.is_empty() {
            return Err(CreateNodeListError::NodesRequired);
        }
        let mut seen = std::collections::HashSet::new();
        if !self.node_ids.iter().all(|id| seen.insert(id)) {
            return Err(CreateNodeListError::DuplicateNodes);
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(name = %command.name, nodes = command.node_ids.len()))]
pub async fn handle(
    pool: PgPool,
    command: CreateNodeListCommand,
) -> Result<CreateNodeListResponse, CreateNodeListError> {
    command.validate()?;

    let mut tx = pool.begin().await?;

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO node_lists (name, description) VALUES ($1, $2) RETURNING id",
    )
    .bind(&command.name)
    .bind(&command.description)
    .fetch_one(&mut *tx)
    .await?;

    for (position, node_id) in command.node_ids.iter().enumerate() {
        sqlx::query(
            "INSERT INTO node_list_nodes (node_list_id, node_id, position) VALUES ($1, $2, $3)",
        )
        .bind(id)
        .bind(node_id)
        .bind(position as i32)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if db::is_foreign_key_violation(&e) {
                CreateNodeListError::UnknownNode
            } else {
                CreateNodeListError::Database(e)
            }
        })?;
    }

    tx.commit().await?;

    tracing::info!(node_list_id = %id, "Node list created");

    Ok(CreateNodeListResponse {
        id,
        nodes: command.node_ids.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_requires_nodes() {
        let cmd = CreateNodeListCommand {
            name: "districts".to_string(),
            description: None,
            node_ids: vec![],
        };
        assert!(matches!(
            cmd.validate(),
            Err(CreateNodeListError::NodesRequired)
        ));
    }

    #[test]
    fn test_validation_rejects_duplicates() {
        let id = Uuid::new_v4();
        let cmd = CreateNodeListCommand {
            name: "districts".to_string(),
            description: None,
            node_ids: vec![id, id],
        };
        assert!(matches!(
            cmd.validate(),
            Err(CreateNodeListError::DuplicateNodes)
        ));
    }
}
