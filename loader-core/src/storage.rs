use async_trait::async_trait;

use crate::error::FetchError;

/// Read access to the bucket that receives uploaded CSV files.
#[async_trait]
pub trait ObjectFetcher: Send + Sync {
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, FetchError>;
}
