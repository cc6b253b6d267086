//! Wire types for the Baleen backend REST API.
//!
//! All payloads are camelCase JSON. The console never edits these records;
//! they are snapshots received from the backend and rendered as-is.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Column whose sort direction defaults to ascending.
pub const ID_COLUMN: &str = "id";

// ── Paging ──────────────────────────────────────────────────────────────────

/// One page of a server-side paged listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    /// Zero-based index of this page.
    pub number: u32,
    pub size: u32,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    /// Wrap an unpaged listing as a single page.
    pub fn single(items: Vec<T>) -> Self {
        let len = items.len();
        Self {
            content: items,
            total_elements: len as u64,
            total_pages: if len == 0 { 0 } else { 1 },
            number: 0,
            size: len as u32,
            first: true,
            last: true,
        }
    }

    /// Slice an already-sorted listing into the page described by `request`.
    ///
    /// Pages past the end come back with empty content but correct totals.
    pub fn slice(items: Vec<T>, request: &PageRequest) -> Self {
        let size = request.size.max(1);
        let total_elements = items.len() as u64;
        let total_pages = total_elements.div_ceil(size as u64) as u32;
        let start = request.page as usize * size as usize;
        let content: Vec<T> = items.into_iter().skip(start).take(size as usize).collect();

        Self {
            content,
            total_elements,
            total_pages,
            number: request.page,
            size,
            first: request.page == 0,
            last: request.page + 1 >= total_pages,
        }
    }
}

/// Sort direction as the backend spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Arrow shown next to the sorted column header.
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort column plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    /// Sort order used the first time a column is selected.
    ///
    /// The identifier column starts ascending, everything else descending.
    pub fn default_for(column: &str) -> Self {
        let direction = if column == ID_COLUMN {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };
        Self::new(column, direction)
    }

    pub fn toggled(&self) -> Self {
        Self::new(self.column.clone(), self.direction.toggled())
    }
}

/// Parameters of a single page fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: SortSpec,
}

impl PageRequest {
    pub fn new(page: u32, size: u32, sort: SortSpec) -> Self {
        Self { page, size, sort }
    }

    /// Query string pairs in the order the backend documents them.
    pub fn query_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("sortBy", self.sort.column.clone()),
            ("sortDirection", self.sort.direction.as_str().to_string()),
        ]
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}

// ── S-124 datasets ──────────────────────────────────────────────────────────

/// Summary of an S-124 navigational warning dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: i64,
    pub mrn: Option<String>,
    pub uuid: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
    pub data_product_version: Option<String>,
    pub geometry_wkt: Option<String>,
    #[serde(default)]
    pub referenced_dataset_ids: Vec<i64>,
}

/// A dataset together with its raw GML document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDetail {
    #[serde(flatten)]
    pub dataset: Dataset,
    pub gml: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NiordStatus {
    pub configured: bool,
}

/// Outcome of a reload-from-Niord request.
///
/// The backend sends this body for failures too, with `success: false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReloadResult {
    pub success: bool,
    #[serde(default)]
    pub datasets_loaded: u32,
    #[serde(default)]
    pub message: String,
}

// ── Subscribers ─────────────────────────────────────────────────────────────

/// A SECOM subscription registered with the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: Uuid,
    pub data_product_type: Option<String>,
    pub product_version: Option<String>,
    pub container_type: Option<String>,
    pub unlocode: Option<String>,
    pub wkt: Option<String>,
    pub subscription_start: Option<DateTime<Utc>>,
    pub subscription_end: Option<DateTime<Utc>>,
    pub node_mrn: Option<String>,
}

impl Subscriber {
    /// Columns the subscriber table can be sorted by.
    pub const SORT_COLUMNS: [&'static str; 7] = [
        "nodeMrn",
        "dataProductType",
        "productVersion",
        "containerType",
        "unlocode",
        "subscriptionStart",
        "subscriptionEnd",
    ];

    /// A subscription without an end, or ending after `now`, is active.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        match self.subscription_end {
            None => true,
            Some(end) => end > now,
        }
    }

    /// Compare two subscribers on a wire column name. Absent values sort first.
    pub fn compare_by(&self, other: &Self, column: &str) -> Ordering {
        match column {
            "nodeMrn" => self.node_mrn.cmp(&other.node_mrn),
            "dataProductType" => self.data_product_type.cmp(&other.data_product_type),
            "productVersion" => self.product_version.cmp(&other.product_version),
            "containerType" => self.container_type.cmp(&other.container_type),
            "unlocode" => self.unlocode.cmp(&other.unlocode),
            "subscriptionStart" => self.subscription_start.cmp(&other.subscription_start),
            "subscriptionEnd" => self.subscription_end.cmp(&other.subscription_end),
            _ => self.id.cmp(&other.id),
        }
    }
}

// ── Logs ────────────────────────────────────────────────────────────────────

/// Severity of a backend log line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    /// Anything the backend emits that is not one of the five standard levels.
    Other(String),
}

impl LogLevel {
    /// The standard levels in filter-cycle order.
    pub const STANDARD: [LogLevel; 5] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
            LogLevel::Other(s) => s,
        }
    }

    /// Parse one of the standard level names. Returns `None` for anything else,
    /// including the empty string used for "all levels".
    pub fn parse_standard(s: &str) -> Option<LogLevel> {
        match LogLevel::from(s.to_string()) {
            LogLevel::Other(_) => None,
            level => Some(level),
        }
    }
}

impl From<String> for LogLevel {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ERROR" => LogLevel::Error,
            "WARN" => LogLevel::Warn,
            "INFO" => LogLevel::Info,
            "DEBUG" => LogLevel::Debug,
            "TRACE" => LogLevel::Trace,
            _ => LogLevel::Other(s),
        }
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line from the backend's in-memory log buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Timestamp as already formatted by the backend.
    pub timestamp: String,
    pub level: LogLevel,
    #[serde(default)]
    pub logger: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub thread: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogCount {
    pub count: u64,
}

// ── About / system ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutInfo {
    /// Left empty by the backend; the console fills in its own base URL.
    #[serde(default)]
    pub backend_url: String,
    #[serde(default)]
    pub version: String,
}

/// Database connection metadata reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseInfo {
    pub url: Option<String>,
    pub username: Option<String>,
    pub driver_class_name: Option<String>,
    pub database_product_name: Option<String>,
    pub database_product_version: Option<String>,
    pub connection_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseProduct {
    pub product: String,
    pub version: String,
    pub driver: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseTestResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub database_info: Option<DatabaseProduct>,
    pub error_code: Option<i64>,
    pub sql_state: Option<String>,
}

/// Niord endpoint configuration; `endpoint` is absent when unconfigured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NiordConfig {
    pub endpoint: Option<String>,
}
