use std::sync::Arc;

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_credential_types::provider::ProvideCredentials;
use tracing_subscriber::EnvFilter;

use solace_cipher::MessageCipher;
use solace_fhir::client::FhirClient;
use solace_fhir::signer::{HEALTHLAKE_SERVICE, RequestSigner, redact_access_key};
use solace_lambda::config::Settings;
use solace_lambda::state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Local development only; Lambda sets the environment directly.
    dotenvy::dotenv().ok();

    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let settings = Settings::from_env();

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(settings.region.clone()))
        .load()
        .await;

    let credentials = resolve_credentials(&sdk_config).await;
    let signer = RequestSigner::new(credentials, settings.region.clone(), HEALTHLAKE_SERVICE);
    let fhir = FhirClient::new(
        reqwest::Client::new(),
        signer,
        settings.healthlake_endpoint.clone(),
    );

    let state = AppState {
        fhir,
        healthlake: aws_sdk_healthlake::Client::new(&sdk_config),
        s3: aws_sdk_s3::Client::new(&sdk_config),
        bedrock: aws_sdk_bedrockruntime::Client::new(&sdk_config),
        cipher: MessageCipher::new(settings.encryption_key.clone()),
        settings: Arc::new(settings),
    };

    let app = solace_lambda::router(state);

    lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))
}

/// Resolve signing credentials once from the SDK provider chain.
///
/// Absent credentials are not fatal here; FHIR calls fail individually.
async fn resolve_credentials(sdk_config: &aws_config::SdkConfig) -> Option<Credentials> {
    let provider = sdk_config.credentials_provider()?;
    match provider.provide_credentials().await {
        Ok(credentials) => {
            tracing::info!(
                access_key = %redact_access_key(credentials.access_key_id()),
                "signing credentials resolved"
            );
            Some(credentials)
        }
        Err(e) => {
            tracing::warn!(error = %e, "no signing credentials resolved");
            None
        }
    }
}
