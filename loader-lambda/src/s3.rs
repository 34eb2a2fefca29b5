use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::{Client, error::DisplayErrorContext, operation::get_object::GetObjectError};
use loader_core::{FetchError, ObjectFetcher};
use tracing::debug;

/// Reads uploaded objects from a single bucket.
#[derive(Debug, Clone)]
pub struct S3ObjectFetcher {
    client: Client,
    bucket: String,
}

impl S3ObjectFetcher {
    pub fn new(config: &SdkConfig, bucket: impl Into<String>) -> Self {
        Self {
            client: Client::new(config),
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ObjectFetcher for S3ObjectFetcher {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, FetchError> {
        debug!(bucket = %self.bucket, key, "fetching object");

        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| match err.into_service_error() {
                GetObjectError::NoSuchKey(_) => FetchError::NotFound {
                    key: key.to_string(),
                },
                other => FetchError::Unavailable {
                    key: key.to_string(),
                    reason: DisplayErrorContext(&other).to_string(),
                },
            })?;

        let body = output.body.collect().await;
        let data = body.map_err(|err| FetchError::Unavailable {
            key: key.to_string(),
            reason: err.to_string(),
        })?;

        Ok(data.into_bytes().to_vec())
    }
}
