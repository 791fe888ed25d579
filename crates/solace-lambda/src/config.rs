//! Environment configuration.
//!
//! Loaded once at startup. Values needed by only some routes are optional
//! here and checked per call, so a missing bucket name fails the storage
//! routes without taking down the client routes.

use std::env;

use solace_bedrock::chat::DEFAULT_MODEL_ID;

use crate::error::ApiError;

pub const REGION_VAR: &str = "AWS_REGION";
pub const HEALTHLAKE_ENDPOINT_VAR: &str = solace_fhir::client::ENDPOINT_VAR;
pub const DATASTORE_ID_VAR: &str = solace_fhir::datastore::DATASTORE_ID_VAR;
pub const TEMP_BUCKET_VAR: &str = "AWS_S3_BUCKET_TEMP";
pub const EXPORT_BUCKET_VAR: &str = "AWS_S3_BUCKET_HEALTHLAKE_OUTPUT";
pub const IMPORT_BUCKET_VAR: &str = "AWS_S3_BUCKET";
pub const KMS_KEY_VAR: &str = "AWS_KMS_KEY_ID";
pub const HEALTHLAKE_ROLE_VAR: &str = "AWS_HEALTHLAKE_ROLE_ARN";
pub const ENCRYPTION_KEY_VAR: &str = "SOLACE_ENCRYPTION_KEY";
pub const CHAT_MODEL_VAR: &str = "SOLACE_CHAT_MODEL_ID";

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_ENCRYPTION_KEY: &str = "default-key";

#[derive(Debug, Clone)]
pub struct Settings {
    pub region: String,
    pub healthlake_endpoint: Option<String>,
    pub datastore_id: Option<String>,
    pub temp_bucket: Option<String>,
    pub export_bucket: Option<String>,
    pub import_bucket: Option<String>,
    pub kms_key_id: Option<String>,
    pub healthlake_role_arn: Option<String>,
    pub encryption_key: String,
    pub chat_model_id: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            region: get(REGION_VAR).unwrap_or_else(|| DEFAULT_REGION.to_string()),
            healthlake_endpoint: get(HEALTHLAKE_ENDPOINT_VAR),
            datastore_id: get(DATASTORE_ID_VAR),
            temp_bucket: get(TEMP_BUCKET_VAR),
            export_bucket: get(EXPORT_BUCKET_VAR),
            import_bucket: get(IMPORT_BUCKET_VAR),
            kms_key_id: get(KMS_KEY_VAR),
            healthlake_role_arn: get(HEALTHLAKE_ROLE_VAR),
            encryption_key: get(ENCRYPTION_KEY_VAR)
                .unwrap_or_else(|| DEFAULT_ENCRYPTION_KEY.to_string()),
            chat_model_id: get(CHAT_MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
        }
    }

    pub fn datastore_id(&self) -> Result<&str, ApiError> {
        require(&self.datastore_id, DATASTORE_ID_VAR)
    }

    pub fn temp_bucket(&self) -> Result<&str, ApiError> {
        require(&self.temp_bucket, TEMP_BUCKET_VAR)
    }

    pub fn export_bucket(&self) -> Result<&str, ApiError> {
        require(&self.export_bucket, EXPORT_BUCKET_VAR)
    }

    pub fn import_bucket(&self) -> Result<&str, ApiError> {
        require(&self.import_bucket, IMPORT_BUCKET_VAR)
    }

    pub fn kms_key_id(&self) -> Result<&str, ApiError> {
        require(&self.kms_key_id, KMS_KEY_VAR)
    }

    pub fn healthlake_role_arn(&self) -> Result<&str, ApiError> {
        require(&self.healthlake_role_arn, HEALTHLAKE_ROLE_VAR)
    }
}

fn require<'a>(value: &'a Option<String>, var: &'static str) -> Result<&'a str, ApiError> {
    value.as_deref().ok_or(ApiError::MissingConfig(var))
}
