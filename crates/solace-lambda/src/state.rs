use std::sync::Arc;

use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_healthlake::Client as HealthLakeClient;
use aws_sdk_s3::Client as S3Client;

use solace_cipher::MessageCipher;
use solace_fhir::client::FhirClient;

use crate::config::Settings;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub fhir: FhirClient,
    pub healthlake: HealthLakeClient,
    pub s3: S3Client,
    pub bedrock: BedrockClient,
    pub cipher: MessageCipher,
}
