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

use super::commands::{
    CreateNodeListCommand, CreateNodeListError, DeleteNodeListCommand, DeleteNodeListError,
};
use super::queries::{GetNodeListError, GetNodeListQuery, ListNodeListsError, ListNodeListsQuery};

pub fn node_lists_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_node_list))
        .route("/", get(list_node_lists))
        .route("/:id", get(get_node_list))
        .route("/:id", delete(delete_node_list))
}

#[derive(Debug, thiserror::Error)]
enum NodeListsApiError {
    #[error(transparent)]
    Create(#[from] CreateNodeListError),
    #[error(transparent)]
    Delete(#[from] DeleteNodeListError),
    #[error(transparent)]
    Get(#[from] GetNodeListError),
    #[error(transparent)]
    List(#[from] ListNodeListsError),
}

impl IntoResponse for NodeListsApiError {
    fn into_response(self) -> Response {
        let app_error = match self {
            NodeListsApiError::Create(CreateNodeListError::Database(e)) => AppError::Database(e),
            NodeListsApiError::Create(e) => AppError::Validation(e.to_string()),
            NodeListsApiError::Delete(DeleteNodeListError::Database(e)) => AppError::Database(e),
            NodeListsApiError::Delete(e @ DeleteNodeListError::NotFound(_)) => {
                AppError::NotFound(e.to_string())
            },
            NodeListsApiError::Delete(e @ DeleteNodeListError::InUse(_)) => {
                AppError::Conflict(e.to_string())
            },
            NodeListsApiError::Get(GetNodeListError::Database(e)) => AppError::Database(e),
            NodeListsApiError::Get(e @ GetNodeListError::NotFound(_)) => {
                AppError::NotFound(e.to_string())
            },
            NodeListsApiError::List(ListNodeListsError::Database(e)) => AppError::Database(e),
        };
        app_error.into_response()
    }
}

#[tracing::instrument(skip(pool, command))]
async fn create_node_list(
    State(pool): State<PgPool>,
    Json(command): Json<CreateNodeListCommand>,
) -> Result<Response, NodeListsApiError> {
    let response = super::commands::create::handle(pool, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool))]
async fn list_node_lists(State(pool): State<PgPool>) -> Result<Response, NodeListsApiError> {
    let response = super::queries::list::handle(pool, ListNodeListsQuery::default()).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}

#[tracing::instrument(skip(pool))]
async fn get_node_list(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Response, NodeListsApiError> {
    let response = super::queries::get::handle(pool, GetNodeListQuery { id }).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}

#[tracing::instrument(skip(pool))]
async fn delete_node_list(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Response, NodeListsApiError> {
    let response = super::commands::delete::handle(pool, DeleteNodeListCommand { id }).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}
