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
    CreateParameterDefinitionCommand, CreateParameterDefinitionError,
    DeleteParameterDefinitionCommand, DeleteParameterDefinitionError,
};
use super::queries::{
    GetParameterDefinitionError, GetParameterDefinitionQuery, ListParameterDefinitionsError,
    ListParameterDefinitionsQuery,
};

pub fn parameter_definitions_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_parameter_definition))
        .route("/", get(list_parameter_definitions))
        .route("/:id", get(get_parameter_definition))
        .route("/:id", delete(delete_parameter_definition))
}

#[derive(Debug, thiserror::Error)]
enum ParameterDefinitionsApiError {
    #[error(transparent)]
    Create(#[from] CreateParameterDefinitionError),
    #[error(transparent)]
    Delete(#[from] DeleteParameterDefinitionError),
    #[error(transparent)]
    Get(#[from] GetParameterDefinitionError),
    #[error(transparent)]
    List(#[from] ListParameterDefinitionsError),
}

impl IntoResponse for ParameterDefinitionsApiError {
    fn into_response(self) -> Response {
        use ParameterDefinitionsApiError as E;
        let app_error = match self {
            E::Create(CreateParameterDefinitionError::Database(e)) => AppError::Database(e),
            E::Create(e) => AppError::Validation(e.to_string()),
            E::Delete(DeleteParameterDefinitionError::Database(e)) => AppError::Database(e),
            E::Delete(e @ DeleteParameterDefinitionError::NotFound(_)) => {
                AppError::NotFound(e.to_string())
            },
            E::Delete(e @ DeleteParameterDefinitionError::InUse(_)) => {
                AppError::Conflict(e.to_string())
            },
            E::Get(GetParameterDefinitionError::Database(e)) => AppError::Database(e),
            E::Get(e @ GetParameterDefinitionError::NotFound(_)) => {
                AppError::NotFound(e.to_string())
            },
            E::List(ListParameterDefinitionsError::Database(e)) => AppError::Database(e),
        };
        app_error.into_response()
    }
}

#[tracing::instrument(skip(pool, command))]
async fn create_parameter_definition(
    State(pool): State<PgPool>,
    Json(command): Json<CreateParameterDefinitionCommand>,
) -> Result<Response, ParameterDefinitionsApiError> {
    let response = super::commands::create::handle(pool, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool))]
async fn list_parameter_definitions(
    State(pool): State<PgPool>,
) -> Result<Response, ParameterDefinitionsApiError> {
    let response =
        super::queries::list::handle(pool, ListParameterDefinitionsQuery::default()).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}

#[tracing::instrument(skip(pool))]
async fn get_parameter_definition(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Response, ParameterDefinitionsApiError> {
    let response =
        super::queries::get::handle(pool, GetParameterDefinitionQuery { id }).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}

#[tracing::instrument(skip(pool))]
async fn delete_parameter_definition(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Response, ParameterDefinitionsApiError> {
    let response =
        super::commands::delete::handle(pool, DeleteParameterDefinitionCommand { id }).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}
