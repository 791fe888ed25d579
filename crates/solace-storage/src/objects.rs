use aws_sdk_s3::Client;
use serde::Serialize;
use tracing::info;

use solace_core::s3_keys;

use crate::error::StorageError;

/// Check that a bucket exists and the caller can reach it.
pub async fn check_bucket(client: &Client, bucket: &str) -> Result<(), StorageError> {
    client
        .head_bucket()
        .bucket(bucket)
        .send()
        .await
        .map_err(|e| {
            let err = e.into_service_error();
            if err.is_not_found() {
                StorageError::BucketNotFound {
                    bucket: bucket.to_string(),
                }
            } else {
                StorageError::HeadBucket(err.to_string())
            }
        })?;

    info!(bucket, "bucket reachable");
    Ok(())
}

/// An exported file, as listed for the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub key: String,
    /// HTTPS URL of the object. Reading it still needs S3 credentials.
    pub url: String,
    pub size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

impl ObjectMeta {
    pub fn new(
        bucket: &str,
        region: &str,
        key: &str,
        size: i64,
        last_modified: Option<String>,
    ) -> Self {
        Self {
            key: key.to_string(),
            url: s3_keys::object_url(bucket, region, key),
            size,
            last_modified,
        }
    }
}

/// List every object under `prefix`, following continuation pages.
/// Folder placeholder keys (ending in `/`) are skipped.
pub async fn list_objects_with_metadata(
    client: &Client,
    bucket: &str,
    region: &str,
    prefix: &str,
) -> Result<Vec<ObjectMeta>, StorageError> {
    let mut pages = client
        .list_objects_v2()
        .bucket(bucket)
        .prefix(prefix)
        .into_paginator()
        .send();

    let mut objects = Vec::new();
    while let Some(page) = pages.next().await {
        let page =
            page.map_err(|e| StorageError::ListObjects(e.into_service_error().to_string()))?;
        objects.extend(page.contents().iter().filter_map(|obj| {
            let key = obj.key().filter(|k| !k.ends_with('/'))?;
            Some(ObjectMeta::new(
                bucket,
                region,
                key,
                obj.size().unwrap_or(0),
                obj.last_modified().map(|t| t.to_string()),
            ))
        }));
    }

    info!(bucket, prefix, count = objects.len(), "objects listed");
    Ok(objects)
}
