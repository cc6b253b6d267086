//! Common Test Utilities
//!
//! Shared helpers used across test modules:
//! - Record builders (`fixtures`)
//! - `FakeApi`, an in-process `BaleenApi` that records every call
//! - `test_services` / `settle` for driving views without a terminal

pub mod fixtures;

pub use fixtures::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::core::api::{
    AboutInfo, ApiError, BaleenApi, DatabaseInfo, DatabaseTestResult, Dataset, DatasetDetail,
    LogEntry, NiordConfig, NiordStatus, Page, PageRequest, ReloadResult, Result, Subscriber,
};
use crate::core::preferences::MemoryPreferenceStore;
use crate::tui::events::AppEvent;
use crate::tui::services::{Services, ViewSettings};

pub const FAKE_BASE_URL: &str = "http://baleen.test:8080";

// =============================================================================
// Fake backend
// =============================================================================

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Datasets(PageRequest),
    DatasetDetails(i64),
    DatasetCount,
    NiordStatus,
    ClearDatasets,
    ReloadFromNiord,
    Subscribers,
    ClearSubscribers,
    Logs(u32),
    ClearLogs,
    LogCount,
    About,
    DatabaseInfo,
    TestDatabase,
    NiordConfig,
}

/// In-memory backend. Datasets are paged in insertion order; every call is
/// appended to `calls`.
pub struct FakeApi {
    pub datasets: Mutex<Vec<Dataset>>,
    pub subscribers: Mutex<Vec<Subscriber>>,
    pub logs: Mutex<Vec<LogEntry>>,
    pub niord_configured: AtomicBool,
    pub reload_result: Mutex<Option<ReloadResult>>,
    /// When set, reads fail with this HTTP status.
    pub fail_reads: Mutex<Option<u16>>,
    /// When set, clear operations fail with this HTTP status.
    pub fail_clears: Mutex<Option<u16>>,
    /// When set, reload-from-Niord wipes the datasets and then fails with
    /// this HTTP status, as a backend that lost Niord mid-import does.
    pub fail_reload: Mutex<Option<u16>>,
    calls: Mutex<Vec<Call>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            datasets: Mutex::new(Vec::new()),
            subscribers: Mutex::new(Vec::new()),
            logs: Mutex::new(Vec::new()),
            niord_configured: AtomicBool::new(false),
            reload_result: Mutex::new(None),
            fail_reads: Mutex::new(None),
            fail_clears: Mutex::new(None),
            fail_reload: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_datasets(self, datasets: Vec<Dataset>) -> Self {
        *self.datasets.lock().unwrap() = datasets;
        self
    }

    pub fn with_subscribers(self, subscribers: Vec<Subscriber>) -> Self {
        *self.subscribers.lock().unwrap() = subscribers;
        self
    }

    pub fn with_logs(self, logs: Vec<LogEntry>) -> Self {
        *self.logs.lock().unwrap() = logs;
        self
    }

    pub fn with_niord(self, configured: bool) -> Self {
        self.niord_configured.store(configured, Ordering::SeqCst);
        self
    }

    pub fn fail_reads_with(&self, status: Option<u16>) {
        *self.fail_reads.lock().unwrap() = status;
    }

    pub fn fail_clears_with(&self, status: Option<u16>) {
        *self.fail_clears.lock().unwrap() = status;
    }

    pub fn fail_reload_with(&self, status: Option<u16>) {
        *self.fail_reload.lock().unwrap() = status;
    }

    pub fn set_reload_result(&self, result: ReloadResult) {
        *self.reload_result.lock().unwrap() = Some(result);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    /// Page requests issued so far, in order.
    pub fn dataset_requests(&self) -> Vec<PageRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Datasets(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn read_guard(&self) -> Result<()> {
        match *self.fail_reads.lock().unwrap() {
            Some(status) => Err(status_error(status)),
            None => Ok(()),
        }
    }

    fn clear_guard(&self) -> Result<()> {
        match *self.fail_clears.lock().unwrap() {
            Some(status) => Err(status_error(status)),
            None => Ok(()),
        }
    }
}

pub fn status_error(status: u16) -> ApiError {
    ApiError::Status {
        status,
        message: format!("fake failure {status}"),
    }
}

#[async_trait]
impl BaleenApi for FakeApi {
    fn base_url(&self) -> &str {
        FAKE_BASE_URL
    }

    async fn datasets(&self, request: &PageRequest) -> Result<Page<Dataset>> {
        self.record(Call::Datasets(request.clone()));
        self.read_guard()?;
        let all = self.datasets.lock().unwrap().clone();
        Ok(Page::slice(all, request))
    }

    async fn dataset_details(&self, id: i64) -> Result<DatasetDetail> {
        self.record(Call::DatasetDetails(id));
        self.read_guard()?;
        let found = self.datasets.lock().unwrap().iter().find(|d| d.id == id).cloned();
        match found {
            Some(dataset) => Ok(DatasetDetail {
                dataset,
                gml: Some(format!("<S124:Dataset gml:id=\"NW-{id}\"/>")),
            }),
            None => Err(status_error(404)),
        }
    }

    async fn dataset_count(&self) -> Result<u64> {
        self.record(Call::DatasetCount);
        self.read_guard()?;
        Ok(self.datasets.lock().unwrap().len() as u64)
    }

    async fn niord_status(&self) -> Result<NiordStatus> {
        self.record(Call::NiordStatus);
        self.read_guard()?;
        Ok(NiordStatus {
            configured: self.niord_configured.load(Ordering::SeqCst),
        })
    }

    async fn clear_datasets(&self) -> Result<()> {
        self.record(Call::ClearDatasets);
        self.clear_guard()?;
        self.datasets.lock().unwrap().clear();
        Ok(())
    }

    async fn reload_from_niord(&self) -> Result<ReloadResult> {
        self.record(Call::ReloadFromNiord);
        if let Some(status) = *self.fail_reload.lock().unwrap() {
            self.datasets.lock().unwrap().clear();
            return Err(status_error(status));
        }
        let configured = self.reload_result.lock().unwrap().clone();
        Ok(configured.unwrap_or(ReloadResult {
            success: true,
            datasets_loaded: self.datasets.lock().unwrap().len() as u32,
            message: "Reloaded".into(),
        }))
    }

    async fn subscribers(&self) -> Result<Vec<Subscriber>> {
        self.record(Call::Subscribers);
        self.read_guard()?;
        Ok(self.subscribers.lock().unwrap().clone())
    }

    async fn clear_subscribers(&self) -> Result<()> {
        self.record(Call::ClearSubscribers);
        self.clear_guard()?;
        self.subscribers.lock().unwrap().clear();
        Ok(())
    }

    async fn logs(&self, limit: u32) -> Result<Vec<LogEntry>> {
        self.record(Call::Logs(limit));
        self.read_guard()?;
        let logs = self.logs.lock().unwrap();
        let skip = logs.len().saturating_sub(limit as usize);
        Ok(logs[skip..].to_vec())
    }

    async fn clear_logs(&self) -> Result<()> {
        self.record(Call::ClearLogs);
        self.clear_guard()?;
        self.logs.lock().unwrap().clear();
        Ok(())
    }

    async fn log_count(&self) -> Result<u64> {
        self.record(Call::LogCount);
        self.read_guard()?;
        Ok(self.logs.lock().unwrap().len() as u64)
    }

    async fn about(&self) -> Result<AboutInfo> {
        self.record(Call::About);
        self.read_guard()?;
        Ok(AboutInfo {
            backend_url: String::new(),
            version: "1.4.0".into(),
        })
    }

    async fn database_info(&self) -> Result<DatabaseInfo> {
        self.record(Call::DatabaseInfo);
        self.read_guard()?;
        Ok(DatabaseInfo {
            url: Some("jdbc:postgresql://db:5432/baleen".into()),
            username: Some("baleen".into()),
            driver_class_name: Some("org.postgresql.Driver".into()),
            database_product_name: Some("PostgreSQL".into()),
            database_product_version: Some("16.2".into()),
            connection_status: Some("Connected".into()),
        })
    }

    async fn test_database(&self) -> Result<DatabaseTestResult> {
        self.record(Call::TestDatabase);
        self.read_guard()?;
        Ok(DatabaseTestResult {
            success: true,
            message: "Database connection successful".into(),
            database_info: None,
            error_code: None,
            sql_state: None,
        })
    }

    async fn niord_config(&self) -> Result<NiordConfig> {
        self.record(Call::NiordConfig);
        self.read_guard()?;
        let endpoint = self
            .niord_configured
            .load(Ordering::SeqCst)
            .then(|| "https://niord.example.org".to_string());
        Ok(NiordConfig { endpoint })
    }
}

// =============================================================================
// Services
// =============================================================================

/// Services wired to `api` and an in-memory preference store.
pub fn test_services(api: Arc<FakeApi>) -> (Services, mpsc::UnboundedReceiver<AppEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let services = Services::new(
        api,
        Arc::new(MemoryPreferenceStore::new()),
        ViewSettings::default(),
        tx,
    );
    (services, rx)
}

/// Let spawned fetches finish, calling `poll` between yields.
pub async fn settle(mut poll: impl FnMut()) {
    for _ in 0..20 {
        tokio::task::yield_now().await;
        poll();
    }
}

/// Drain queued notification messages.
pub fn notifications(rx: &mut mpsc::UnboundedReceiver<AppEvent>) -> Vec<String> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let AppEvent::Notification(n) = event {
            out.push(n.message);
        }
    }
    out
}
