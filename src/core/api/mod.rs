//! Baleen backend REST API
//!
//! - `models`: wire DTOs (pages, datasets, subscribers, log entries, system info)
//! - `error`: `ApiError` taxonomy and user-facing messages
//! - `client`: `BaleenApi` trait and the reqwest-backed `BaleenClient`

pub mod client;
pub mod error;
pub mod models;

pub use client::{BaleenApi, BaleenClient, DEFAULT_LOG_LIMIT};
pub use error::{ApiError, ErrorKind, Result};
pub use models::{
    AboutInfo, DatabaseInfo, DatabaseProduct, DatabaseTestResult, Dataset, DatasetDetail, LogEntry,
    LogLevel, NiordConfig, NiordStatus, Page, PageRequest, ReloadResult, SortDirection, SortSpec,
    Subscriber, ID_COLUMN,
};
