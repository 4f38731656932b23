use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::ApiResponse;
use crate::error::AppError;

use super::commands::{CreateNodeCommand, CreateNodeError, DeleteNodeCommand, DeleteNodeError};
use super::queries::{GetNodeError, GetNodeQuery, ListNodesError, ListNodesQuery};

pub fn nodes_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_node))
        .route("/", get(list_nodes))
        .route("/:id", get(get_node))
        .route("/:id", delete(delete_node))
}

#[derive(Debug, thiserror::Error)]
enum NodesApiError {
    #[error(transparent)]
    Create(#[from] CreateNodeError),
    #[error(transparent)]
    Delete(#[from] DeleteNodeError),
    #[error(transparent)]
    Get(#[from] GetNodeError),
    #[error(transparent)]
    List(#[from] ListNodesError),
}

impl IntoResponse for NodesApiError {
    fn into_response(self) -> Response {
        let app_error = match self {
            NodesApiError::Create(CreateNodeError::Database(e)) => AppError::Database(e),
            NodesApiError::Create(e @ CreateNodeError::Duplicate(_)) => {
                AppError::Conflict(e.to_string())
            },
            NodesApiError::Create(e) => AppError::Validation(e.to_string()),
            NodesApiError::Delete(DeleteNodeError::Database(e)) => AppError::Database(e),
            NodesApiError::Delete(e @ DeleteNodeError::NotFound(_)) => {
                AppError::NotFound(e.to_string())
            },
            NodesApiError::Delete(e @ DeleteNodeError::InUse(_)) => {
                AppError::Conflict(e.to_string())
            },
            NodesApiError::Get(GetNodeError::Database(e)) => AppError::Database(e),
            NodesApiError::Get(e @ GetNodeError::NotFound(_)) => AppError::NotFound(e.to_string()),
            NodesApiError::List(ListNodesError::Database(e)) => AppError::Database(e),
        };
        app_error.into_response()
    }
}

#[tracing::instrument(skip(pool, command))]
async fn create_node(
    State(pool): State<PgPool>,
    Json(command): Json<CreateNodeCommand>,
) -> Result<Response, NodesApiError> {
    let response = super::commands::create::handle(pool, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool))]
async fn list_nodes(State(pool): State<PgPool>) -> Result<Response, NodesApiError> {
    let response = super::queries::list::handle(pool, ListNodesQuery::default()).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}

#[tracing::instrument(skip(pool))]
async fn get_node(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Response, NodesApiError> {
    let response = super::queries::get::handle(pool, GetNodeQuery { id }).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}

#[tracing::instrument(skip(pool))]
async fn delete_node(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Response, NodesApiError> {
    let response = super::commands::delete::handle(pool, DeleteNodeCommand { id }).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}
