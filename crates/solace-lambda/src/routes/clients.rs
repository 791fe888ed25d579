use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use solace_core::models::client::{ClientDraft, ClientRecord};
use solace_core::models::note::{NoteDraft, NoteRecord};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ClientSearch {
    pub name: Option<String>,
}

pub async fn search_clients(
    State(state): State<AppState>,
    Query(search): Query<ClientSearch>,
) -> Result<Json<Vec<ClientRecord>>, ApiError> {
    let clients = state.fhir.search_clients(search.name.as_deref()).await?;
    Ok(Json(clients))
}

pub async fn create_client(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<ClientDraft>,
) -> Result<(StatusCode, Json<ClientRecord>), ApiError> {
    draft.validate()?;
    let client = state.fhir.create_client(&draft).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClientRecord>, ApiError> {
    Ok(Json(state.fhir.get_client(&id).await?))
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(draft): ApiJson<ClientDraft>,
) -> Result<Json<ClientRecord>, ApiError> {
    draft.validate()?;
    Ok(Json(state.fhir.update_client(&id, &draft).await?))
}

/// Soft delete. The resource stays in the store with status `inactive`.
pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClientRecord>, ApiError> {
    Ok(Json(state.fhir.deactivate_client(&id).await?))
}

pub async fn create_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(draft): ApiJson<NoteDraft>,
) -> Result<(StatusCode, Json<NoteRecord>), ApiError> {
    draft.validate()?;
    let note = state.fhir.create_note(&id, &draft.content).await?;
    Ok((StatusCode::CREATED, Json(note)))
}
