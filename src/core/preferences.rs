//! Persisted view preferences.
//!
//! Only two keys exist today: whether the log tail follows new lines and which
//! level the log view is filtered to. Every entry expires one year after it
//! was last written; expired entries read as absent.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::api::LogLevel;

pub const FOLLOW_LOGS: &str = "followLogs";
pub const LOG_LEVEL_FILTER: &str = "logLevelFilter";

/// Lifetime of a stored preference.
pub const EXPIRY_DAYS: i64 = 365;

/// File name inside the data directory.
pub const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("Preference file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Preference file is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Preference store lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, PreferenceError>;

/// String key-value store.
#[cfg_attr(test, mockall::automock)]
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

// ── Log view preferences ───────────────────────────────────────────────────

/// Log view settings read from a [`PreferenceStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPreferences {
    pub follow: bool,
    /// `None` shows all levels.
    pub filter: Option<LogLevel>,
}

impl Default for LogPreferences {
    fn default() -> Self {
        Self {
            follow: true,
            filter: None,
        }
    }
}

impl LogPreferences {
    /// Follow is on unless the stored value is exactly `"false"`. Unknown
    /// filter values fall back to all levels.
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let follow = store.get(FOLLOW_LOGS).as_deref() != Some("false");
        let filter = store
            .get(LOG_LEVEL_FILTER)
            .and_then(|v| LogLevel::parse_standard(&v));
        Self { follow, filter }
    }

    pub fn save_follow(store: &dyn PreferenceStore, follow: bool) -> Result<()> {
        store.set(FOLLOW_LOGS, if follow { "true" } else { "false" })
    }

    pub fn save_filter(store: &dyn PreferenceStore, filter: Option<&LogLevel>) -> Result<()> {
        store.set(LOG_LEVEL_FILTER, filter.map(LogLevel::as_str).unwrap_or(""))
    }
}

// ── File store ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPreference {
    value: String,
    expires_at: DateTime<Utc>,
}

/// JSON file of `{ key: { value, expiresAt } }`, rewritten on every set.
pub struct FilePreferenceStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, StoredPreference>>,
}

impl FilePreferenceStore {
    /// Load the store at `path`. A missing file is an empty store; an
    /// unreadable one is logged and replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                log::warn!("Ignoring corrupt preference file {:?}: {}", path, e);
                HashMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Standard location inside the data directory.
    pub fn in_data_dir(data_dir: &Path) -> Result<Self> {
        Self::open(data_dir.join(PREFERENCES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<String> {
        let entries = self.entries.lock().ok()?;
        entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone())
    }

    pub fn set_at(&self, key: &str, value: &str, now: DateTime<Utc>) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| PreferenceError::Poisoned)?;
        entries.insert(
            key.to_string(),
            StoredPreference {
                value: value.to_string(),
                expires_at: now + Duration::days(EXPIRY_DAYS),
            },
        );
        entries.retain(|_, entry| entry.expires_at > now);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&*entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.get_at(key, Utc::now())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_at(key, value, Utc::now())
    }
}

// ── Memory store ───────────────────────────────────────────────────────────

/// Non-persistent store, used when the data directory is unavailable.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .map_err(|_| PreferenceError::Poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
