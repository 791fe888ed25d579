use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use solace_core::models::document::{DocumentDraft, DocumentRecord};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DocumentSearch {
    pub title: Option<String>,
}

pub async fn search_documents(
    State(state): State<AppState>,
    Query(search): Query<DocumentSearch>,
) -> Result<Json<Vec<DocumentRecord>>, ApiError> {
    let documents = state.fhir.search_documents(search.title.as_deref()).await?;
    Ok(Json(documents))
}

pub async fn upload_document(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<DocumentDraft>,
) -> Result<(StatusCode, Json<DocumentRecord>), ApiError> {
    draft.validate()?;
    let document = state.fhir.upload_document(&draft).await?;
    Ok((StatusCode::CREATED, Json(document)))
}
