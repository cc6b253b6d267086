use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::api::{BaleenApi, BaleenClient};
use crate::core::preferences::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};

use super::events::{AppEvent, Notification, NotificationLevel};

/// View-facing subset of the configuration.
#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub page_size: u32,
    pub log_limit: u32,
    pub poll_interval: Duration,
}

impl ViewSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            page_size: config.api.page_size.max(1),
            log_limit: config.api.log_limit,
            poll_interval: config.poll_interval(),
        }
    }
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Centralized handle to the backend client and local stores.
///
/// Created once at startup and passed by reference to views. Spawned fetches
/// clone `api` and move it into their task.
pub struct Services {
    pub api: Arc<dyn BaleenApi>,
    pub preferences: Arc<dyn PreferenceStore>,
    pub settings: ViewSettings,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    /// Build the HTTP client and open the preference file.
    ///
    /// An invalid base URL is fatal. An unreadable preference file degrades
    /// to an in-memory store.
    pub fn init(
        config: &AppConfig,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let client = BaleenClient::new(&config.api.base_url, config.timeout())?;
        log::info!("Backend client targeting {}", client.base_url());

        let data_dir = config.data_dir();
        let preferences: Arc<dyn PreferenceStore> =
            match FilePreferenceStore::in_data_dir(&data_dir) {
                Ok(store) => {
                    log::info!("Preferences at {}", store.path().display());
                    Arc::new(store)
                }
                Err(e) => {
                    log::warn!("Preferences unavailable ({e}); changes will not persist");
                    Arc::new(MemoryPreferenceStore::new())
                }
            };

        Ok(Self::new(
            Arc::new(client),
            preferences,
            ViewSettings::from_config(config),
            event_tx,
        ))
    }

    pub fn new(
        api: Arc<dyn BaleenApi>,
        preferences: Arc<dyn PreferenceStore>,
        settings: ViewSettings,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            api,
            preferences,
            settings,
            event_tx,
        }
    }

    /// Queue a notification for the overlay. The id is assigned by AppState.
    pub fn notify(&self, message: impl Into<String>, level: NotificationLevel) {
        let _ = self.event_tx.send(AppEvent::Notification(Notification {
            id: 0,
            message: message.into(),
            level,
            ttl_ticks: 0,
        }));
    }
}
