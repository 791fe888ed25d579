use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use solace_core::models::client::{ClientDraft, ClientRecord, ClientStatus};
use solace_core::models::document::{DocumentDraft, DocumentRecord};
use solace_core::models::note::NoteRecord;

use crate::error::FhirError;
use crate::mapper;
use crate::resource::{Bundle, DOCUMENT_REFERENCE, DocumentReference, PATIENT, Patient};
use crate::signer::RequestSigner;

/// SigV4 unreserved characters. Query values are encoded with this set so
/// the URL that is signed and the URL that is sent are identical.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub const ENDPOINT_VAR: &str = "AWS_HEALTHLAKE_ENDPOINT";

/// Signed REST client for the FHIR store.
///
/// Constructed once by the composition root and shared by cloning.
#[derive(Debug, Clone)]
pub struct FhirClient {
    http: reqwest::Client,
    signer: RequestSigner,
    endpoint: Option<String>,
}

impl FhirClient {
    /// `endpoint` is the datastore base URL, e.g.
    /// `https://healthlake.us-east-1.amazonaws.com/datastore/{id}/r4`.
    /// A missing endpoint fails each call rather than construction.
    pub fn new(http: reqwest::Client, signer: RequestSigner, endpoint: Option<String>) -> Self {
        let endpoint = endpoint
            .map(|e| e.trim().trim_end_matches('/').to_string())
            .filter(|e| !e.is_empty());
        Self {
            http,
            signer,
            endpoint,
        }
    }

    // ── Clients (Patient) ────────────────────────────────────────────────────

    /// Search patients by name. No matches yields an empty list.
    pub async fn search_clients(&self, name: Option<&str>) -> Result<Vec<ClientRecord>, FhirError> {
        let url = self.search_url(PATIENT, "name", name)?;
        let bundle: Bundle<Patient> = self.get_json(&url).await?;
        let clients = mapper::records_from_bundle(bundle, mapper::client_from_patient);
        info!(count = clients.len(), "client search complete");
        Ok(clients)
    }

    pub async fn create_client(&self, draft: &ClientDraft) -> Result<ClientRecord, FhirError> {
        let url = self.resource_url(PATIENT, None)?;
        let patient = mapper::patient_from_draft(draft);
        let created: Patient = self.send_json(Method::POST, &url, &patient).await?;
        let record = mapper::client_from_patient(created);
        info!(client_id = record.id(), "client created");
        Ok(record)
    }

    pub async fn get_client(&self, id: &str) -> Result<ClientRecord, FhirError> {
        let patient = self.get_patient(id).await?;
        Ok(mapper::client_from_patient(patient))
    }

    /// Replace the fields a draft controls. A status change in the draft
    /// must be a valid transition from the stored status.
    pub async fn update_client(
        &self,
        id: &str,
        draft: &ClientDraft,
    ) -> Result<ClientRecord, FhirError> {
        let mut patient = self.get_patient(id).await?;
        let current = mapper::status(&patient.extension).unwrap_or(ClientStatus::Active);
        let next = match draft.status {
            Some(requested) => current.transition(requested)?,
            None => current,
        };

        mapper::apply_draft(&mut patient, draft, next);
        self.put_patient(id, patient).await
    }

    /// Soft delete: flip the status extension to `Inactive`.
    pub async fn deactivate_client(&self, id: &str) -> Result<ClientRecord, FhirError> {
        let mut patient = self.get_patient(id).await?;
        let current = mapper::status(&patient.extension).unwrap_or(ClientStatus::Active);
        let next = current.transition(ClientStatus::Inactive)?;

        mapper::set_status_extension(&mut patient.extension, next);
        let record = self.put_patient(id, patient).await?;
        info!(client_id = id, "client deactivated");
        Ok(record)
    }

    async fn get_patient(&self, id: &str) -> Result<Patient, FhirError> {
        let url = self.resource_url(PATIENT, Some(id))?;
        self.get_json(&url).await
    }

    async fn put_patient(&self, id: &str, mut patient: Patient) -> Result<ClientRecord, FhirError> {
        let url = self.resource_url(PATIENT, Some(id))?;
        if patient.id.is_none() {
            patient.id = Some(id.to_string());
        }
        let updated: Patient = self.send_json(Method::PUT, &url, &patient).await?;
        Ok(mapper::client_from_patient(updated))
    }

    // ── Notes and documents (DocumentReference) ──────────────────────────────

    pub async fn create_note(&self, client_id: &str, content: &str) -> Result<NoteRecord, FhirError> {
        let url = self.resource_url(DOCUMENT_REFERENCE, None)?;
        let note = mapper::note_from_draft(client_id, content);
        let created: DocumentReference = self.send_json(Method::POST, &url, &note).await?;
        let record = mapper::note_from_reference(created);
        info!(client_id, note_id = %record.id, "note created");
        Ok(record)
    }

    /// Search knowledge-base documents by title. No matches yields an empty
    /// list.
    pub async fn search_documents(
        &self,
        title: Option<&str>,
    ) -> Result<Vec<DocumentRecord>, FhirError> {
        let url = self.search_url(DOCUMENT_REFERENCE, "title", title)?;
        let bundle: Bundle<DocumentReference> = self.get_json(&url).await?;
        let documents = mapper::records_from_bundle(bundle, mapper::document_from_reference);
        info!(count = documents.len(), "document search complete");
        Ok(documents)
    }

    pub async fn upload_document(&self, draft: &DocumentDraft) -> Result<DocumentRecord, FhirError> {
        let url = self.resource_url(DOCUMENT_REFERENCE, None)?;
        let document = mapper::document_from_draft(draft);
        let created: DocumentReference = self.send_json(Method::POST, &url, &document).await?;
        let record = DocumentRecord {
            id: created.id.unwrap_or_default(),
            title: draft.title.clone(),
            content: draft.content.clone(),
        };
        info!(document_id = %record.id, "document uploaded");
        Ok(record)
    }

    // ── Transport ────────────────────────────────────────────────────────────

    fn endpoint(&self) -> Result<&str, FhirError> {
        self.endpoint
            .as_deref()
            .ok_or(FhirError::MissingConfig(ENDPOINT_VAR))
    }

    pub fn resource_url(&self, resource_type: &str, id: Option<&str>) -> Result<String, FhirError> {
        let base = self.endpoint()?;
        Ok(match id {
            Some(id) => format!(
                "{base}/{resource_type}/{}",
                utf8_percent_encode(id, QUERY_VALUE)
            ),
            None => format!("{base}/{resource_type}"),
        })
    }

    pub fn search_url(
        &self,
        resource_type: &str,
        param: &str,
        value: Option<&str>,
    ) -> Result<String, FhirError> {
        let url = self.resource_url(resource_type, None)?;
        Ok(match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => format!("{url}?{param}={}", utf8_percent_encode(value, QUERY_VALUE)),
            None => url,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FhirError> {
        let response = self.execute(Method::GET, url, Vec::new()).await?;
        read_json(response).await
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: &B,
    ) -> Result<T, FhirError> {
        let payload = serde_json::to_vec(body)?;
        let response = self.execute(method, url, payload).await?;
        read_json(response).await
    }

    async fn execute(&self, method: Method, url: &str, body: Vec<u8>) -> Result<Response, FhirError> {
        let headers = self.signer.sign(method.as_str(), url, &body)?;

        let mut request = self.http.request(method.clone(), url);
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if !body.is_empty() {
            request = request.body(body);
        }

        let response = request.send().await?;
        check_status(&method, url, response).await
    }
}

async fn check_status(method: &Method, url: &str, response: Response) -> Result<Response, FhirError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            warn!(%method, url, status = status.as_u16(), "clinical data store rejected credentials");
            Err(FhirError::Unauthorized {
                status: status.as_u16(),
            })
        }
        StatusCode::NOT_FOUND | StatusCode::GONE => Err(FhirError::NotFound(url.to_string())),
        _ => {
            warn!(%method, url, status = status.as_u16(), "unexpected status from clinical data store");
            Err(FhirError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            })
        }
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, FhirError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
