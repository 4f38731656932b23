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
    CreateInterventionCommand, CreateInterventionError, DeleteInterventionCommand,
    DeleteInterventionError,
};
use super::queries::{
    GetInterventionError, GetInterventionQuery, ListInterventionsError, ListInterventionsQuery,
};

pub fn interventions_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_intervention))
        .route("/", get(list_interventions))
        .route("/:id", get(get_intervention))
        .route("/:id", delete(delete_intervention))
}

#[derive(Debug, thiserror::Error)]
enum InterventionsApiError {
    #[error(transparent)]
    Create(#[from] CreateInterventionError),
    #[error(transparent)]
    Delete(#[from] DeleteInterventionError),
    #[error(transparent)]
    Get(#[from] GetInterventionError),
    #[error(transparent)]
    List(#[from] ListInterventionsError),
}

impl IntoResponse for InterventionsApiError {
    fn into_response(self) -> Response {
        let app_error = match self {
            InterventionsApiError::Create(CreateInterventionError::Database(e)) => {
                AppError::Database(e)
            },
            InterventionsApiError::Create(e) => AppError::Validation(e.to_string()),
            InterventionsApiError::Delete(DeleteInterventionError::Database(e)) => {
                AppError::Database(e)
            },
            InterventionsApiError::Delete(e @ DeleteInterventionError::NotFound(_)) => {
                AppError::NotFound(e.to_string())
            },
            InterventionsApiError::Delete(e @ DeleteInterventionError::InUse(_)) => {
                AppError::Conflict(e.to_string())
            },
            InterventionsApiError::Get(GetInterventionError::Database(e)) => AppError::Database(e),
            InterventionsApiError::Get(e @ GetInterventionError::NotFound(_)) => {
                AppError::NotFound(e.to_string())
            },
            InterventionsApiError::List(ListInterventionsError::Database(e)) => {
                AppError::Database(e)
            },
        };
        app_error.into_response()
    }
}

#[tracing::instrument(skip(pool, command))]
async fn create_intervention(
    State(pool): State<PgPool>,
    Json(command): Json<CreateInterventionCommand>,
) -> Result<Response, InterventionsApiError> {
    let response = super::commands::create::handle(pool, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool))]
async fn list_interventions(State(pool): State<PgPool>) -> Result<Response, InterventionsApiError> {
    let response = super::queries::list::handle(pool, ListInterventionsQuery::default()).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}

#[tracing::instrument(skip(pool))]
async fn get_intervention(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Response, InterventionsApiError> {
    let response = super::queries::get::handle(pool, GetInterventionQuery { id }).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}

#[tracing::instrument(skip(pool))]
async fn delete_intervention(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Response, InterventionsApiError> {
    let response =
        super::commands::delete::handle(pool, DeleteInterventionCommand { id }).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}
