use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;

use solace_core::s3_keys;
use solace_fhir::datastore::{self, DatastoreSummary, ExportRequest, ImportRequest, JobSummary};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DatastoreStatus {
    pub message: &'static str,
    pub datastore: DatastoreSummary,
}

pub async fn datastore_status(
    State(state): State<AppState>,
) -> Result<Json<DatastoreStatus>, ApiError> {
    let datastore_id = state.settings.datastore_id()?;
    let found = datastore::find_active_datastore(&state.healthlake, datastore_id).await?;

    match found {
        Some(datastore) => Ok(Json(DatastoreStatus {
            message: "Connected successfully",
            datastore,
        })),
        None => Err(ApiError::NotFound("Datastore not found".to_string())),
    }
}

/// Start a bulk export of the datastore into the output bucket.
pub async fn start_export(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<JobSummary>), ApiError> {
    let settings = &state.settings;
    let request = ExportRequest {
        datastore_id: settings.datastore_id()?.to_string(),
        output_uri: s3_keys::export_uri(settings.export_bucket()?),
        kms_key_id: settings.kms_key_id()?.to_string(),
        data_access_role_arn: settings.healthlake_role_arn()?.to_string(),
    };

    let job = datastore::start_export(&state.healthlake, &request).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

pub async fn get_export(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobSummary>, ApiError> {
    let datastore_id = state.settings.datastore_id()?;
    let job = datastore::describe_export(&state.healthlake, datastore_id, &job_id).await?;
    Ok(Json(job))
}

/// Start a bulk import from the import bucket's `healthlake-import/` folder.
pub async fn start_import(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<JobSummary>), ApiError> {
    let settings = &state.settings;
    let bucket = settings.import_bucket()?;
    let request = ImportRequest {
        datastore_id: settings.datastore_id()?.to_string(),
        input_uri: s3_keys::import_input_uri(bucket),
        output_uri: s3_keys::import_results_uri(bucket),
        kms_key_id: settings.kms_key_id()?.to_string(),
        data_access_role_arn: settings.healthlake_role_arn()?.to_string(),
    };

    let job = datastore::start_import(&state.healthlake, &request).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

pub async fn get_import(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobSummary>, ApiError> {
    let datastore_id = state.settings.datastore_id()?;
    let job = datastore::describe_import(&state.healthlake, datastore_id, &job_id).await?;
    Ok(Json(job))
}
