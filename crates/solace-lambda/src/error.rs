use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use solace_bedrock::error::BedrockError;
use solace_cipher::error::CipherError;
use solace_core::error::CoreError;
use solace_fhir::error::FhirError;
use solace_fhir::signer::SignerError;
use solace_storage::error::StorageError;

pub const UPSTREAM_AUTH_MESSAGE: &str = "clinical data store authentication failed";

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    /// A required environment value is absent.
    MissingConfig(&'static str),
    /// The clinical data store rejected our credentials.
    UpstreamAuth(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::MissingConfig(var) => {
                tracing::error!(error_kind = "configuration", var, "required configuration missing");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
            ApiError::UpstreamAuth(msg) => {
                tracing::error!(error_kind = "authentication", "upstream auth failure: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, UPSTREAM_AUTH_MESSAGE.to_string())
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<FhirError> for ApiError {
    fn from(e: FhirError) -> Self {
        match e {
            FhirError::MissingConfig(var) => ApiError::MissingConfig(var),
            FhirError::Signer(SignerError::MissingCredentials) => {
                ApiError::MissingConfig("AWS_ACCESS_KEY_ID")
            }
            FhirError::Unauthorized { status } => {
                ApiError::UpstreamAuth(format!("remote returned {status}"))
            }
            FhirError::NotFound(what) => ApiError::NotFound(format!("not found: {what}")),
            FhirError::Core(core) => core.into(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<CipherError> for ApiError {
    fn from(e: CipherError) -> Self {
        ApiError::BadRequest(format!("message could not be decrypted: {e}"))
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::BucketNotFound { bucket } => {
                ApiError::NotFound(format!("bucket not found: {bucket}"))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<BedrockError> for ApiError {
    fn from(e: BedrockError) -> Self {
        ApiError::Internal(e.to_string())
    }
}
