use crate::error::FetchError;
use crate::source::AssetSource;
use async_trait::async_trait;
use labelpress_types::AssetRecord;
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the inventory's `GET /api/v1/hardware/{id}` endpoint.
#[derive(Debug, Clone)]
pub struct HttpAssetSource {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpAssetSource {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    pub fn asset_url(&self, id: u64) -> String {
        format!("{}/api/v1/hardware/{}", self.base_url, id)
    }
}

#[async_trait]
impl AssetSource for HttpAssetSource {
    async fn fetch(&self, id: u64) -> Result<AssetRecord, FetchError> {
        let url = self.asset_url(id);
        log::debug!("Fetching asset {} from {}", id, url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        interpret(id, status, &body)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Maps an API response onto a record or a typed failure.
///
/// The API reports some missing assets as `200 {"status": "error", ...}`.
fn interpret(id: u64, status: StatusCode, body: &[u8]) -> Result<AssetRecord, FetchError> {
    match status {
        StatusCode::UNAUTHORIZED => return Err(FetchError::Unauthorized),
        StatusCode::NOT_FOUND => return Err(FetchError::NotFound { id }),
        s if !s.is_success() => return Err(FetchError::Status { id, status: s.as_u16() }),
        _ => {}
    }

    let decode = |e: serde_json::Error| FetchError::Decode { id, message: e.to_string() };
    let value: Value = serde_json::from_slice(body).map_err(decode)?;
    if value.get("status").and_then(Value::as_str) == Some("error") {
        log::debug!("Inventory reported an error for asset {}: {}", id, value["messages"]);
        return Err(FetchError::NotFound { id });
    }
    serde_json::from_value(value).map_err(decode)
}
