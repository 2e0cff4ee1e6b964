use crate::error::FetchError;
use async_trait::async_trait;
use labelpress_types::AssetRecord;

/// Where asset records come from.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetches one asset by its numeric id. A single attempt, no retry.
    async fn fetch(&self, id: u64) -> Result<AssetRecord, FetchError>;

    /// A short name for logs.
    fn name(&self) -> &'static str;
}
