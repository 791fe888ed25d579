//! HealthLake control-plane calls: datastore lookup and bulk import and
//! export jobs.
//!
//! These go through the AWS SDK rather than the signed REST client.

use aws_sdk_healthlake::Client;
use aws_sdk_healthlake::types::{
    DatastoreFilter, DatastoreProperties, DatastoreStatus, InputDataConfig, JobStatus,
    OutputDataConfig, S3Configuration,
};
use serde::Serialize;
use tracing::info;

use crate::error::FhirError;

pub const DATASTORE_ID_VAR: &str = "AWS_HEALTHLAKE_DATASTORE_ID";

/// Summary of a HealthLake datastore, safe to return to the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DatastoreSummary {
    pub datastore_id: String,
    pub name: Option<String>,
    pub status: String,
    pub type_version: String,
    pub endpoint: String,
}

/// Parameters for a FHIR bulk export to S3.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub datastore_id: String,
    /// Destination, e.g. `s3://bucket/exports/`.
    pub output_uri: String,
    pub kms_key_id: String,
    pub data_access_role_arn: String,
}

/// Parameters for a bulk import of FHIR NDJSON from S3.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub datastore_id: String,
    /// Folder holding the NDJSON files, e.g. `s3://bucket/healthlake-import/`.
    pub input_uri: String,
    /// Where HealthLake writes the per-file results.
    pub output_uri: String,
    pub kms_key_id: String,
    pub data_access_role_arn: String,
}

/// Status of an import or export job.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub job_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Find the configured datastore among the ACTIVE ones.
///
/// Returns `None` when it is absent or not active.
pub async fn find_active_datastore(
    client: &Client,
    datastore_id: &str,
) -> Result<Option<DatastoreSummary>, FhirError> {
    let filter = DatastoreFilter::builder()
        .datastore_status(DatastoreStatus::Active)
        .build();
    let mut next_token: Option<String> = None;

    loop {
        let resp = client
            .list_fhir_datastores()
            .filter(filter.clone())
            .set_next_token(next_token.take())
            .send()
            .await
            .map_err(|e| FhirError::Datastore(e.into_service_error().to_string()))?;

        if let Some(found) = resp
            .datastore_properties_list()
            .iter()
            .find(|p| p.datastore_id() == datastore_id)
        {
            info!(datastore_id, "datastore found");
            return Ok(Some(summarize(found)));
        }

        match resp.next_token() {
            Some(token) => next_token = Some(token.to_string()),
            None => return Ok(None),
        }
    }
}

/// Start a FHIR export job into S3.
pub async fn start_export(
    client: &Client,
    request: &ExportRequest,
) -> Result<JobSummary, FhirError> {
    let s3 = s3_output(&request.output_uri, &request.kms_key_id)?;

    let resp = client
        .start_fhir_export_job()
        .datastore_id(&request.datastore_id)
        .output_data_config(OutputDataConfig::S3Configuration(s3))
        .data_access_role_arn(&request.data_access_role_arn)
        .send()
        .await
        .map_err(|e| FhirError::Datastore(e.into_service_error().to_string()))?;

    let job = started(resp.job_id(), resp.job_status());

    info!(job_id = %job.job_id, output_uri = %request.output_uri, "export job started");

    Ok(job)
}

/// Look up the status of an export job.
pub async fn describe_export(
    client: &Client,
    datastore_id: &str,
    job_id: &str,
) -> Result<JobSummary, FhirError> {
    let resp = client
        .describe_fhir_export_job()
        .datastore_id(datastore_id)
        .job_id(job_id)
        .send()
        .await
        .map_err(|e| {
            let err = e.into_service_error();
            if err.is_resource_not_found_exception() {
                FhirError::NotFound(format!("export job {job_id}"))
            } else {
                FhirError::Datastore(err.to_string())
            }
        })?;

    let props = resp.export_job_properties();
    Ok(JobSummary {
        job_id: props.job_id().to_string(),
        status: props.job_status().as_str().to_string(),
        message: props.message().map(|m| m.to_string()),
    })
}

/// Start a FHIR import job reading NDJSON from S3.
pub async fn start_import(
    client: &Client,
    request: &ImportRequest,
) -> Result<JobSummary, FhirError> {
    let s3 = s3_output(&request.output_uri, &request.kms_key_id)?;

    let resp = client
        .start_fhir_import_job()
        .datastore_id(&request.datastore_id)
        .input_data_config(InputDataConfig::S3Uri(request.input_uri.clone()))
        .job_output_data_config(OutputDataConfig::S3Configuration(s3))
        .data_access_role_arn(&request.data_access_role_arn)
        .send()
        .await
        .map_err(|e| FhirError::Datastore(e.into_service_error().to_string()))?;

    let job = started(resp.job_id(), resp.job_status());

    info!(job_id = %job.job_id, input_uri = %request.input_uri, "import job started");

    Ok(job)
}

/// Look up the status of an import job.
pub async fn describe_import(
    client: &Client,
    datastore_id: &str,
    job_id: &str,
) -> Result<JobSummary, FhirError> {
    let resp = client
        .describe_fhir_import_job()
        .datastore_id(datastore_id)
        .job_id(job_id)
        .send()
        .await
        .map_err(|e| {
            let err = e.into_service_error();
            if err.is_resource_not_found_exception() {
                FhirError::NotFound(format!("import job {job_id}"))
            } else {
                FhirError::Datastore(err.to_string())
            }
        })?;

    let props = resp.import_job_properties();
    Ok(JobSummary {
        job_id: props.job_id().to_string(),
        status: props.job_status().as_str().to_string(),
        message: props.message().map(|m| m.to_string()),
    })
}

fn s3_output(uri: &str, kms_key_id: &str) -> Result<S3Configuration, FhirError> {
    S3Configuration::builder()
        .s3_uri(uri)
        .kms_key_id(kms_key_id)
        .build()
        .map_err(|e| FhirError::Datastore(e.to_string()))
}

fn started(job_id: &str, status: &JobStatus) -> JobSummary {
    JobSummary {
        job_id: job_id.to_string(),
        status: status.as_str().to_string(),
        message: None,
    }
}

fn summarize(props: &DatastoreProperties) -> DatastoreSummary {
    DatastoreSummary {
        datastore_id: props.datastore_id().to_string(),
        name: props.datastore_name().map(|n| n.to_string()),
        status: props.datastore_status().as_str().to_string(),
        type_version: props.datastore_type_version().as_str().to_string(),
        endpoint: props.datastore_endpoint().to_string(),
    }
}
