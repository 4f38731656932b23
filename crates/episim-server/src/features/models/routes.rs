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
    CreateModelCommand, CreateModelError, DeleteModelCommand, DeleteModelError,
};
use super::queries::{GetModelError, GetModelQuery, ListModelsError, ListModelsQuery};

pub fn models_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_model))
        .route("/", get(list_models))
        .route("/:id", get(get_model))
        .route("/:id", delete(delete_model))
}

#[derive(Debug, thiserror::Error)]
enum ModelsApiError {
    #[error(transparent)]
    Create(#[from] CreateModelError),
    #[error(transparent)]
    Delete(#[from] DeleteModelError),
    #[error(transparent)]
    Get(#[from] GetModelError),
    #[error(transparent)]
    List(#[from] ListModelsError),
}

impl IntoResponse for ModelsApiError {
    fn into_response(self) -> Response {
        let app_error = match self {
            ModelsApiError::Create(CreateModelError::Database(e)) => AppError::Database(e),
            ModelsApiError::Create(e) => AppError::Validation(e.to_string()),
            ModelsApiError::Delete(DeleteModelError::Database(e)) => AppError::Database(e),
            ModelsApiError::Delete(e @ DeleteModelError::NotFound(_)) => {
                AppError::NotFound(e.to_string())
            },
            ModelsApiError::Delete(e @ DeleteModelError::InUse(_)) => {
                AppError::Conflict(e.to_string())
            },
            ModelsApiError::Get(GetModelError::Database(e)) => AppError::Database(e),
            ModelsApiError::Get(e @ GetModelError::NotFound(_)) => {
                AppError::NotFound(e.to_string())
            },
            ModelsApiError::List(ListModelsError::Database(e)) => AppError::Database(e),
        };
        app_error.into_response()
    }
}

#[tracing::instrument(skip(pool, command))]
async fn create_model(
    State(pool): State<PgPool>,
    Json(command): Json<CreateModelCommand>,
) -> Result<Response, ModelsApiError> {
    let response = super::commands::create::handle(pool, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool))]
async fn list_models(State(pool): State<PgPool>) -> Result<Response, ModelsApiError> {
    let response = super::queries::list::handle(pool, ListModelsQuery::default()).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}

#[tracing::instrument(skip(pool))]
async fn get_model(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Response, ModelsApiError> {
    let response = super::queries::get::handle(pool, GetModelQuery { id }).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}

#[tracing::instrument(skip(pool))]
async fn delete_model(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Response, ModelsApiError> {
    let response = super::commands::delete::handle(pool, DeleteModelCommand { id }).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}
