use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of environment overrides, e.g. `BALEEN_API__BASE_URL`.
pub const ENV_PREFIX: &str = "BALEEN_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Figment(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Figment(Box::new(err))
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub tui: TuiConfig,
    pub data: DataConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the Baleen backend, without the `/api` suffix.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Rows per page in the dataset and subscriber tables.
    pub page_size: u32,
    /// Number of log lines requested per fetch.
    pub log_limit: u32,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
    /// Log tail refresh period in milliseconds.
    pub poll_interval_ms: u64,
    /// Enable mouse support in the terminal.
    pub mouse_enabled: bool,
}

/// Data directory configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
            page_size: 20,
            log_limit: crate::core::api::DEFAULT_LOG_LIMIT,
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 50,
            poll_interval_ms: crate::core::polling::DEFAULT_POLL_INTERVAL.as_millis() as u64,
            mouse_enabled: false,
        }
    }
}

/// Result of [`AppConfig::load`]. A failed load still carries usable
/// defaults alongside the error.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub path: PathBuf,
    pub error: Option<ConfigError>,
}

impl LoadedConfig {
    /// Log where the configuration came from, or why defaults are in use.
    pub fn report(&self) {
        match &self.error {
            None => log::info!("Loaded config (file: {})", self.path.display()),
            Some(e) => log::warn!(
                "Failed to load config from {}: {e}; using defaults",
                self.path.display()
            ),
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/baleen-console/config.toml` and
    /// `BALEEN_*` environment variables. Falls back to defaults on error.
    ///
    /// Nothing is logged here: logging needs the resolved data directory, so
    /// the caller reports the outcome once the subscriber is installed.
    pub fn load() -> LoadedConfig {
        Self::load_or_default(Self::config_path())
    }

    pub fn load_or_default(path: PathBuf) -> LoadedConfig {
        match Self::load_from(&path) {
            Ok(config) => LoadedConfig {
                config,
                path,
                error: None,
            },
            Err(e) => LoadedConfig {
                config: Self::default(),
                path,
                error: Some(e),
            },
        }
    }

    /// Strict load from an explicit file. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::figment(path).extract()?)
    }

    /// Defaults, then the TOML file, then the environment.
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("baleen-console"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.api.timeout_secs)
    }

    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tui.poll_interval_ms.max(100))
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("baleen-console").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
