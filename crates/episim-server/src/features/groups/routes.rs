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
    CreateGroupCommand, CreateGroupError, DeleteGroupCommand, DeleteGroupError,
};
use super::queries::{GetGroupError, GetGroupQuery, ListGroupsError, ListGroupsQuery};

pub fn groups_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_group))
        .route("/", get(list_groups))
        .route("/:id", get(get_group))
        .route("/:id", delete(delete_group))
}

#[derive(Debug, thiserror::Error)]
enum GroupsApiError {
    #[error(transparent)]
    Create(#[from] CreateGroupError),
    #[error(transparent)]
    Delete(#[from] DeleteGroupError),
    #[error(transparent)]
    Get(#[from] GetGroupError),
    #[error(transparent)]
    List(#[from] ListGroupsError),
}

impl IntoResponse for GroupsApiError {
    fn into_response(self) -> Response {
        let app_error = match self {
            GroupsApiError::Create(CreateGroupError::Database(e)) => AppError::Database(e),
            GroupsApiError::Create(CreateGroupError::Duplicate(name)) => {
                AppError::Conflict(format!("Group '{}' already exists", name))
            },
            GroupsApiError::Create(e) => AppError::Validation(e.to_string()),
            GroupsApiError::Delete(DeleteGroupError::Database(e)) => AppError::Database(e),
            GroupsApiError::Delete(DeleteGroupError::NotFound(id)) => {
                AppError::NotFound(format!("Group '{}' not found", id))
            },
            GroupsApiError::Delete(e @ DeleteGroupError::InUse(_)) => {
                AppError::Conflict(e.to_string())
            },
            GroupsApiError::Get(GetGroupError::Database(e)) => AppError::Database(e),
            GroupsApiError::Get(GetGroupError::NotFound(id)) => {
                AppError::NotFound(format!("Group '{}' not found", id))
            },
            GroupsApiError::List(ListGroupsError::Database(e)) => AppError::Database(e),
        };
        app_error.into_response()
    }
}

#[tracing::instrument(skip(pool, command))]
async fn create_group(
    State(pool): State<PgPool>,
    Json(command): Json<CreateGroupCommand>,
) -> Result<Response, GroupsApiError> {
    let response = super::commands::create::handle(pool, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool))]
async fn list_groups(State(pool): State<PgPool>) -> Result<Response, GroupsApiError> {
    let response = super::queries::list::handle(pool, ListGroupsQuery::default()).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}

#[tracing::instrument(skip(pool))]
async fn get_group(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Response, GroupsApiError> {
    let response = super::queries::get::handle(pool, GetGroupQuery { id }).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}

#[tracing::instrument(skip(pool))]
async fn delete_group(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Response, GroupsApiError> {
    let response = super::commands::delete::handle(pool, DeleteGroupCommand { id }).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}
