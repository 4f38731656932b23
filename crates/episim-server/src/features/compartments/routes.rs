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
    CreateCompartmentCommand, CreateCompartmentError, DeleteCompartmentCommand,
    DeleteCompartmentError,
};
use super::queries::{
    GetCompartmentError, GetCompartmentQuery, ListCompartmentsError, ListCompartmentsQuery,
};

pub fn compartments_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_compartment))
        .route("/", get(list_compartments))
        .route("/:id", get(get_compartment))
        .route("/:id", delete(delete_compartment))
}

#[derive(Debug, thiserror::Error)]
enum CompartmentsApiError {
    #[error(transparent)]
    Create(#[from] CreateCompartmentError),
    #[error(transparent)]
    Delete(#[from] DeleteCompartmentError),
    #[error(transparent)]
    Get(#[from] GetCompartmentError),
    #[error(transparent)]
    List(#[from] ListCompartmentsError),
}

impl IntoResponse for CompartmentsApiError {
    fn into_response(self) -> Response {
        let app_error = match self {
            CompartmentsApiError::Create(CreateCompartmentError::Database(e)) => {
                AppError::Database(e)
            },
            CompartmentsApiError::Create(e @ CreateCompartmentError::Duplicate(_)) => {
                AppError::Conflict(e.to_string())
            },
            CompartmentsApiError::Create(e) => AppError::Validation(e.to_string()),
            CompartmentsApiError::Delete(DeleteCompartmentError::Database(e)) => {
                AppError::Database(e)
            },
            CompartmentsApiError::Delete(e @ DeleteCompartmentError::NotFound(_)) => {
                AppError::NotFound(e.to_string())
            },
            CompartmentsApiError::Delete(e @ DeleteCompartmentError::InUse(_)) => {
                AppError::Conflict(e.to_string())
            },
            CompartmentsApiError::Get(GetCompartmentError::Database(e)) => AppError::Database(e),
            CompartmentsApiError::Get(e @ GetCompartmentError::NotFound(_)) => {
                AppError::NotFound(e.to_string())
            },
            CompartmentsApiError::List(ListCompartmentsError::Database(e)) => {
                AppError::Database(e)
            },
        };
        app_error.into_response()
    }
}

#[tracing::instrument(skip(pool, command))]
async fn create_compartment(
    State(pool): State<PgPool>,
    Json(command): Json<CreateCompartmentCommand>,
) -> Result<Response, CompartmentsApiError> {
    let response = super::commands::create::handle(pool, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool))]
async fn list_compartments(State(pool): State<PgPool>) -> Result<Response, CompartmentsApiError> {
    let response = super::queries::list::handle(pool, ListCompartmentsQuery::default()).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}

#[tracing::instrument(skip(pool))]
async fn get_compartment(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Response, CompartmentsApiError> {
    let response = super::queries::get::handle(pool, GetCompartmentQuery { id }).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}

#[tracing::instrument(skip(pool))]
async fn delete_compartment(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Response, CompartmentsApiError> {
    let response =
        super::commands::delete::handle(pool, DeleteCompartmentCommand { id }).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}
