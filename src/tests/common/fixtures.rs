//! Test Fixtures
//!
//! Builders for the backend records the views display.

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::core::api::{Dataset, DatasetDetail, LogEntry, LogLevel, Subscriber};

// =============================================================================
// Datasets
// =============================================================================

/// Fixed reference instant so fixtures are reproducible.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
}

/// A dataset whose fields are derived from `id`.
pub fn dataset(id: i64) -> Dataset {
    Dataset {
        id,
        mrn: Some(format!("urn:mrn:s124:NW-{id:03}-25")),
        uuid: Some(Uuid::from_u128(id as u128).to_string()),
        created_at: Some(base_time() + Duration::minutes(id)),
        valid_from: Some(base_time()),
        valid_to: None,
        data_product_version: Some("2.0.0".into()),
        geometry_wkt: Some("POINT (10.5 56.2)".into()),
        referenced_dataset_ids: Vec::new(),
    }
}

/// `count` datasets with ids `1..=count`.
pub fn datasets(count: usize) -> Vec<Dataset> {
    (1..=count as i64).map(dataset).collect()
}

pub fn dataset_detail(id: i64) -> DatasetDetail {
    DatasetDetail {
        dataset: dataset(id),
        gml: Some(format!(
            "<S124:Dataset gml:id=\"NW-{id}\">\n  <S124:NavigationalWarning/>\n</S124:Dataset>"
        )),
    }
}

// =============================================================================
// Subscribers
// =============================================================================

/// An active S-124 subscriber.
pub fn subscriber(n: u32) -> Subscriber {
    Subscriber {
        id: Uuid::from_u128(n as u128),
        data_product_type: Some("S124".into()),
        product_version: Some("2.0.0".into()),
        container_type: Some("S100_DataSet".into()),
        unlocode: None,
        wkt: None,
        subscription_start: Some(base_time() + Duration::hours(n as i64)),
        subscription_end: None,
        node_mrn: Some(format!("urn:mrn:mcp:device:mcc:dk:node-{n:02}")),
    }
}

pub fn subscribers(count: u32) -> Vec<Subscriber> {
    (1..=count).map(subscriber).collect()
}

// =============================================================================
// Logs
// =============================================================================

pub fn log_entry(level: LogLevel, message: &str) -> LogEntry {
    LogEntry {
        timestamp: "2025-03-01 10:00:00.000".into(),
        level,
        logger: "dk.dma.baleen.s124.service.DatasetService".into(),
        message: message.into(),
        thread: "http-nio-8080-exec-1".into(),
    }
}

/// `count` INFO entries.
pub fn log_entries(count: usize) -> Vec<LogEntry> {
    (0..count)
        .map(|i| log_entry(LogLevel::Info, &format!("entry {i}")))
        .collect()
}
