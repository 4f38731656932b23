use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::error::AppError;
use crate::import::{pipeline::failure_payload, ImportError, ImportPipeline};

use super::commands::{
    CreateScenarioCommand, CreateScenarioError, DeleteScenarioCommand, DeleteScenarioError,
};
use super::queries::{
    GetScenarioError, GetScenarioQuery, ListDatapointsError, ListDatapointsQuery,
    ListScenariosError, ListScenariosQuery,
};

/// State for the scenarios slice: plain catalog access plus the import
/// pipeline for the simulation-data upload.
#[derive(Clone)]
pub struct ScenariosState {
    pub db: PgPool,
    pub import: ImportPipeline,
}

pub fn scenarios_routes(max_upload_bytes: usize) -> Router<ScenariosState> {
    Router::new()
        .route("/", post(create_scenario))
        .route("/", get(list_scenarios))
        .route("/:id", get(get_scenario))
        .route("/:id", delete(delete_scenario))
        .route(
            "/:id/simulation-data",
            put(import_simulation_data).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/:id/datapoints", get(list_datapoints))
}

#[derive(Debug, thiserror::Error)]
enum ScenariosApiError {
    #[error(transparent)]
    Create(#[from] CreateScenarioError),
    #[error(transparent)]
    Delete(#[from] DeleteScenarioError),
    #[error(transparent)]
    Get(#[from] GetScenarioError),
    #[error(transparent)]
    List(#[from] ListScenariosError),
    #[error(transparent)]
    Datapoints(#[from] ListDatapointsError),
    #[error("Invalid query parameter: {0}")]
    InvalidQueryParam(String),
}

impl IntoResponse for ScenariosApiError {
    fn into_response(self) -> Response {
        let app_error = match self {
            ScenariosApiError::Create(CreateScenarioError::Database(e)) => AppError::Database(e),
            ScenariosApiError::Create(e @ CreateScenarioError::ModelNotFound(_))
            | ScenariosApiError::Create(e @ CreateScenarioError::NodeListNotFound(_)) => {
                AppError::NotFound(e.to_string())
            },
            ScenariosApiError::Create(e) => AppError::Validation(e.to_string()),
            ScenariosApiError::Delete(DeleteScenarioError::Database(e)) => AppError::Database(e),
            ScenariosApiError::Delete(e @ DeleteScenarioError::NotFound(_)) => {
                AppError::NotFound(e.to_string())
            },
            ScenariosApiError::Get(GetScenarioError::Database(e)) => AppError::Database(e),
            ScenariosApiError::Get(e @ GetScenarioError::NotFound(_)) => {
                AppError::NotFound(e.to_string())
            },
            ScenariosApiError::List(ListScenariosError::Database(e)) => AppError::Database(e),
            ScenariosApiError::Datapoints(ListDatapointsError::Database(e)) => {
                AppError::Database(e)
            },
            ScenariosApiError::Datapoints(e @ ListDatapointsError::ScenarioNotFound(_)) => {
                AppError::NotFound(e.to_string())
            },
            ScenariosApiError::InvalidQueryParam(msg) => AppError::Validation(msg),
        };
        app_error.into_response()
    }
}

#[tracing::instrument(skip(state, command))]
async fn create_scenario(
    State(state): State<ScenariosState>,
    Json(command): Json<CreateScenarioCommand>,
) -> Result<Response, ScenariosApiError> {
    let response = super::commands::create::handle(state.db, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state))]
async fn list_scenarios(State(state): State<ScenariosState>) -> Result<Response, ScenariosApiError> {
    let response = super::queries::list::handle(state.db, ListScenariosQuery::default()).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}

#[tracing::instrument(skip(state))]
async fn get_scenario(
    State(state): State<ScenariosState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ScenariosApiError> {
    let response = super::queries::get::handle(state.db, GetScenarioQuery { id }).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}

#[tracing::instrument(skip(state))]
async fn delete_scenario(
    State(state): State<ScenariosState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ScenariosApiError> {
    let response = super::commands::delete::handle(state.db, DeleteScenarioCommand { id }).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}

/// Query-string filters for the datapoint listing; list-valued filters are
/// comma separated.
#[derive(Debug, Default, Deserialize)]
struct DatapointFilterParams {
    nodes: Option<String>,
    groups: Option<String>,
    compartments: Option<String>,
    percentiles: Option<String>,
    #[serde(rename = "startDate")]
    start_date: Option<NaiveDate>,
    #[serde(rename = "endDate")]
    end_date: Option<NaiveDate>,
}

fn split_csv(raw: &Option<String>) -> Option<Vec<String>> {
    raw.as_ref().map(|value| {
        value
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect()
    })
}

#[tracing::instrument(skip(state, params))]
async fn list_datapoints(
    State(state): State<ScenariosState>,
    Path(id): Path<Uuid>,
    Query(params): Query<DatapointFilterParams>,
) -> Result<Response, ScenariosApiError> {
    let percentiles = match &params.percentiles {
        None => None,
        Some(raw) => Some(
            raw.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|part| {
                    part.parse::<i32>().map_err(|_| {
                        ScenariosApiError::InvalidQueryParam(format!(
                            "'{}' is not a valid percentile",
                            part
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
        ),
    };

    let query = ListDatapointsQuery {
        scenario_id: id,
        nodes: split_csv(&params.nodes),
        groups: split_csv(&params.groups),
        compartments: split_csv(&params.compartments),
        percentiles,
        start_date: params.start_date,
        end_date: params.end_date,
    };

    let response = super::queries::datapoints::handle(state.db, query).await?;
    Ok(Json(ApiResponse::success(response)).into_response())
}

#[tracing::instrument(skip(state, multipart))]
async fn import_simulation_data(
    State(state): State<ScenariosState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Response {
    let mut upload: Option<(String, Vec<u8>)> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let Some(filename) = field.file_name().map(str::to_string) else {
                    continue;
                };
                match field.bytes().await {
                    Ok(bytes) => {
                        upload = Some((filename, bytes.to_vec()));
                        break;
                    },
                    Err(e) => {
                        return AppError::Validation(format!("Failed to read upload: {}", e))
                            .into_response();
                    },
                }
            },
            Ok(None) => break,
            Err(e) => {
                return AppError::Validation(format!("Malformed multipart body: {}", e))
                    .into_response();
            },
        }
    }

    let Some((filename, payload)) = upload else {
        return AppError::Validation("No file provided".to_string()).into_response();
    };

    match state.import.run(id, &filename, payload).await {
        Ok(outcome) => {
            (StatusCode::CREATED, Json(ApiResponse::success(outcome))).into_response()
        },
        Err(err) => import_error_response(err),
    }
}

/// Map pipeline errors onto the HTTP contract: validation problems are 422
/// (with the per-percentile report as details), a missing scenario is 404,
/// catalog integrity and I/O faults are 500.
fn import_error_response(err: ImportError) -> Response {
    match err {
        ImportError::Validation { report } => {
            let details = serde_json::json!(failure_payload(&report));
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::with_details(
                    "VALIDATION_ERROR",
                    format!(
                        "Simulation data rejected for {} percentile(s)",
                        report.by_percentile().len()
                    ),
                    details,
                )),
            )
                .into_response()
        },
        ImportError::ScenarioNotFound(id) => {
            AppError::NotFound(format!("Scenario '{}' not found", id)).into_response()
        },
        e @ (ImportError::EmptyUpload
        | ImportError::UnsupportedExtension(_)
        | ImportError::InvalidArchive(_)
        | ImportError::MalformedLayout(_)
        | ImportError::NoPercentileFolders) => {
            AppError::Validation(e.to_string()).into_response()
        },
        ImportError::CatalogIntegrity(msg) => AppError::Internal(msg).into_response(),
        ImportError::TaskJoin(msg) => AppError::Internal(msg).into_response(),
        ImportError::Io(e) => AppError::Io(e).into_response(),
        ImportError::Database(e) => AppError::Database(e).into_response(),
    }
}
