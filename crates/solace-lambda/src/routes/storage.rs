use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use solace_core::s3_keys;
use solace_storage::objects::{self, ObjectMeta};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StorageStatus {
    pub status: &'static str,
    pub message: &'static str,
}

/// Reachability of the temp bucket. A failed check is reported in the
/// body with a 500 rather than as an API error.
pub async fn storage_status(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<StorageStatus>), ApiError> {
    let bucket = state.settings.temp_bucket()?;

    match objects::check_bucket(&state.s3, bucket).await {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(StorageStatus {
                status: "connected",
                message: "Successfully connected to S3",
            }),
        )),
        Err(e) => {
            tracing::warn!(bucket, error = %e, "storage check failed");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StorageStatus {
                    status: "error",
                    message: "Failed to connect to S3",
                }),
            ))
        }
    }
}

pub async fn list_exported_files(
    State(state): State<AppState>,
) -> Result<Json<Vec<ObjectMeta>>, ApiError> {
    let bucket = state.settings.export_bucket()?;
    let files = objects::list_objects_with_metadata(
        &state.s3,
        bucket,
        &state.settings.region,
        s3_keys::EXPORTS_PREFIX,
    )
    .await?;
    Ok(Json(files))
}
