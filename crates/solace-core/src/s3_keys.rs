//! S3 key/path conventions.
//!
//! Pure string functions with no AWS SDK dependency. They define where
//! HealthLake exports land and where import jobs read from and report to.

pub const EXPORTS_PREFIX: &str = "exports/";
pub const IMPORT_INPUT_PREFIX: &str = "healthlake-import/";
pub const IMPORT_RESULTS_PREFIX: &str = "import-results/";

/// S3 URI handed to HealthLake as the export destination.
pub fn export_uri(bucket: &str) -> String {
    format!("s3://{bucket}/{EXPORTS_PREFIX}")
}

/// Folder an import job reads NDJSON from.
pub fn import_input_uri(bucket: &str) -> String {
    format!("s3://{bucket}/{IMPORT_INPUT_PREFIX}")
}

pub fn import_results_uri(bucket: &str) -> String {
    format!("s3://{bucket}/{IMPORT_RESULTS_PREFIX}")
}

/// Virtual-hosted-style HTTPS URL of an object.
pub fn object_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{bucket}.s3.{region}.amazonaws.com/{key}")
}
