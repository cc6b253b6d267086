//! reqwest-backed client for the Baleen backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::error::{ApiError, Result};
use super::models::{
    AboutInfo, DatabaseInfo, DatabaseTestResult, Dataset, DatasetDetail, LogCount, LogEntry,
    NiordConfig, NiordStatus, Page, PageRequest, ReloadResult, Subscriber,
};

/// Default number of log lines requested per fetch.
pub const DEFAULT_LOG_LIMIT: u32 = 1000;

/// A full reload re-imports every warning from Niord and outlasts the
/// regular request timeout.
pub const RELOAD_TIMEOUT: Duration = Duration::from_secs(300);

const DATASETS: &str = "api/s124-datasets";
const SUBSCRIBERS: &str = "api/subscribers";
const LOGS: &str = "api/logs";
const ABOUT: &str = "api/about";
const NIORD_CONFIG: &str = "api/niord/config";

/// Every backend call the console makes.
///
/// One method per endpoint, no retries or caching. Views hold this behind an
/// `Arc<dyn BaleenApi>` so tests can substitute an in-process fake.
#[async_trait]
pub trait BaleenApi: Send + Sync {
    /// Base URL shown to the user.
    fn base_url(&self) -> &str;

    async fn datasets(&self, request: &PageRequest) -> Result<Page<Dataset>>;
    async fn dataset_details(&self, id: i64) -> Result<DatasetDetail>;
    async fn dataset_count(&self) -> Result<u64>;
    async fn niord_status(&self) -> Result<NiordStatus>;
    async fn clear_datasets(&self) -> Result<()>;
    /// Declared failures (`success: false`) come back as `Ok`.
    async fn reload_from_niord(&self) -> Result<ReloadResult>;

    async fn subscribers(&self) -> Result<Vec<Subscriber>>;
    async fn clear_subscribers(&self) -> Result<()>;

    async fn logs(&self, limit: u32) -> Result<Vec<LogEntry>>;
    async fn clear_logs(&self) -> Result<()>;
    async fn log_count(&self) -> Result<u64>;

    async fn about(&self) -> Result<AboutInfo>;
    async fn database_info(&self) -> Result<DatabaseInfo>;
    async fn test_database(&self) -> Result<DatabaseTestResult>;
    async fn niord_config(&self) -> Result<NiordConfig>;
}

/// HTTP implementation of [`BaleenApi`].
#[derive(Clone)]
pub struct BaleenClient {
    base: Url,
    display_url: String,
    client: Client,
}

impl BaleenClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Connection)?;
        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        // Joining relative paths only appends when the base ends in '/'.
        let base = Url::parse(&format!("{trimmed}/"))?;
        Ok(Self {
            base,
            display_url: trimmed.to_string(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(%url, "GET");
        let resp = self.client.get(url).send().await?;
        decode_json(resp).await
    }

    async fn delete(&self, url: Url) -> Result<()> {
        tracing::debug!(%url, "DELETE");
        let resp = self.client.delete(url).send().await?;
        expect_success(resp).await
    }
}

#[async_trait]
impl BaleenApi for BaleenClient {
    fn base_url(&self) -> &str {
        &self.display_url
    }

    async fn datasets(&self, request: &PageRequest) -> Result<Page<Dataset>> {
        let mut url = self.endpoint(DATASETS)?;
        url.query_pairs_mut()
            .extend_pairs(request.query_pairs().iter().map(|(k, v)| (*k, v.as_str())));
        self.get_json(url).await
    }

    async fn dataset_details(&self, id: i64) -> Result<DatasetDetail> {
        let url = self.endpoint(&format!("{DATASETS}/{id}/details"))?;
        self.get_json(url).await
    }

    async fn dataset_count(&self) -> Result<u64> {
        let url = self.endpoint(&format!("{DATASETS}/count"))?;
        self.get_json(url).await
    }

    async fn niord_status(&self) -> Result<NiordStatus> {
        let url = self.endpoint(&format!("{DATASETS}/niord-status"))?;
        self.get_json(url).await
    }

    async fn clear_datasets(&self) -> Result<()> {
        let url = self.endpoint(&format!("{DATASETS}/clear"))?;
        self.delete(url).await
    }

    async fn reload_from_niord(&self) -> Result<ReloadResult> {
        let url = self.endpoint(&format!("{DATASETS}/reload-from-niord"))?;
        tracing::debug!(%url, "POST");
        let resp = self.client.post(url).timeout(RELOAD_TIMEOUT).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        // 400/500 responses still carry a ReloadResult explaining the failure.
        match serde_json::from_str::<ReloadResult>(&body) {
            Ok(result) => {
                if !result.success {
                    log::warn!("Reload from Niord declined ({status}): {}", result.message);
                }
                Ok(result)
            }
            Err(_) if !status.is_success() => Err(status_error(status, &body)),
            Err(e) => Err(ApiError::Decode {
                status: status.as_u16(),
                message: e.to_string(),
            }),
        }
    }

    async fn subscribers(&self) -> Result<Vec<Subscriber>> {
        let url = self.endpoint(SUBSCRIBERS)?;
        self.get_json(url).await
    }

    async fn clear_subscribers(&self) -> Result<()> {
        let url = self.endpoint(SUBSCRIBERS)?;
        self.delete(url).await
    }

    async fn logs(&self, limit: u32) -> Result<Vec<LogEntry>> {
        let mut url = self.endpoint(LOGS)?;
        url.query_pairs_mut().append_pair("limit", &limit.to_string());
        self.get_json(url).await
    }

    async fn clear_logs(&self) -> Result<()> {
        let url = self.endpoint(LOGS)?;
        self.delete(url).await
    }

    async fn log_count(&self) -> Result<u64> {
        let url = self.endpoint(&format!("{LOGS}/count"))?;
        let count: LogCount = self.get_json(url).await?;
        Ok(count.count)
    }

    async fn about(&self) -> Result<AboutInfo> {
        let url = self.endpoint(ABOUT)?;
        self.get_json(url).await
    }

    async fn database_info(&self) -> Result<DatabaseInfo> {
        let url = self.endpoint(&format!("{ABOUT}/database"))?;
        self.get_json(url).await
    }

    async fn test_database(&self) -> Result<DatabaseTestResult> {
        let url = self.endpoint(&format!("{ABOUT}/database/test"))?;
        tracing::debug!(%url, "POST");
        let resp = self.client.post(url).send().await?;
        decode_json(resp).await
    }

    async fn niord_config(&self) -> Result<NiordConfig> {
        let url = self.endpoint(NIORD_CONFIG)?;
        self.get_json(url).await
    }
}

async fn decode_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(status_error(status, &body));
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
        status: status.as_u16(),
        message: e.to_string(),
    })
}

async fn expect_success(resp: Response) -> Result<()> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let body = resp.text().await.unwrap_or_default();
    Err(status_error(status, &body))
}

/// Build a status error, preferring the `message`/`error` field of a Spring
/// error body over the raw text.
fn status_error(status: StatusCode, body: &str) -> ApiError {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error"]
                .iter()
                .filter_map(|key| v.get(*key).and_then(|m| m.as_str()))
                .find(|m| !m.trim().is_empty())
                .map(str::to_string)
        });

    let message = from_json.unwrap_or_else(|| {
        let text = body.trim();
        if text.is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            text.to_string()
        }
    });

    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}
