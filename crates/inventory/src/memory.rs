use crate::error::FetchError;
use crate::source::AssetSource;
use async_trait::async_trait;
use labelpress_types::AssetRecord;
use std::collections::HashMap;

/// A failure the in-memory source reports instead of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectedFailure {
    Unauthorized,
    Status(u16),
    Unavailable(String),
}

/// Serves records from memory. Unknown ids are `NotFound`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssetSource {
    records: HashMap<u64, AssetRecord>,
    failures: HashMap<u64, InjectedFailure>,
}

impl InMemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, record: AssetRecord) -> Self {
        self.records.insert(record.id, record);
        self
    }

    pub fn with_failure(mut self, id: u64, failure: InjectedFailure) -> Self {
        self.failures.insert(id, failure);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<AssetRecord> for InMemoryAssetSource {
    fn from_iter<I: IntoIterator<Item = AssetRecord>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with_asset)
    }
}

#[async_trait]
impl AssetSource for InMemoryAssetSource {
    async fn fetch(&self, id: u64) -> Result<AssetRecord, FetchError> {
        if let Some(failure) = self.failures.get(&id) {
            return Err(match failure {
                InjectedFailure::Unauthorized => FetchError::Unauthorized,
                InjectedFailure::Status(status) => FetchError::Status { id, status: *status },
                InjectedFailure::Unavailable(reason) => FetchError::Unavailable(reason.clone()),
            });
        }
        self.records.get(&id).cloned().ok_or(FetchError::NotFound { id })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
