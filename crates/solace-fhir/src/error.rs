use thiserror::Error;

use solace_core::error::CoreError;

use crate::signer::SignerError;

#[derive(Debug, Error)]
pub enum FhirError {
    #[error("missing configuration: {0} is not set")]
    MissingConfig(&'static str),

    #[error(transparent)]
    Signer(#[from] SignerError),

    #[error("clinical data store rejected credentials (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("unexpected status {status} from clinical data store: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("HealthLake control-plane error: {0}")]
    Datastore(String),
}
