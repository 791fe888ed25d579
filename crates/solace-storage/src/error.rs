use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("bucket not found: {bucket}")]
    BucketNotFound { bucket: String },

    #[error("S3 HeadBucket error: {0}")]
    HeadBucket(String),

    #[error("S3 ListObjects error: {0}")]
    ListObjects(String),
}
