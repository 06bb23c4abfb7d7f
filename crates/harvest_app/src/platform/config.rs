//! RON config file. Every field is optional; missing ones take the defaults
//! tuned for the chatgpt.com history sidebar.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use harvest_core::Timings;
use harvest_engine::{AtomicFileWriter, FetchSettings, Locators, PersistError};
use harvest_logging::{harvest_info, Phase};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
    #[error("failed to write config: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum FetchMode {
    /// Fetch images from inside the page, with its cookies.
    Page,
    /// Fetch images with a standalone HTTP client.
    Direct,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub output_dir: PathBuf,
    pub locators: LocatorConfig,
    pub timings: TimingConfig,
    pub fetch: FetchConfig,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("harvest-output"),
            locators: LocatorConfig::default(),
            timings: TimingConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    pub container: String,
    pub item: String,
    pub activation_handle: String,
    pub title: String,
    pub title_attribute: String,
    pub title_fallback: String,
    pub item_id_attribute: String,
    pub image: String,
    pub image_region: Option<String>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        let defaults = Locators::default();
        Self {
            container: defaults.container,
            item: defaults.item,
            activation_handle: defaults.activation_handle,
            title: defaults.title,
            title_attribute: defaults.title_attribute,
            title_fallback: defaults.title_fallback,
            item_id_attribute: defaults.item_id_attribute,
            image: defaults.image,
            image_region: defaults.image_region,
        }
    }
}

impl From<LocatorConfig> for Locators {
    fn from(config: LocatorConfig) -> Self {
        Self {
            container: config.container,
            item: config.item,
            activation_handle: config.activation_handle,
            title: config.title,
            title_attribute: config.title_attribute,
            title_fallback: config.title_fallback,
            item_id_attribute: config.item_id_attribute,
            image: config.image,
            image_region: config.image_region,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub start_delay_ms: u64,
    pub readiness_poll_ms: u64,
    /// `None` polls for the container forever.
    pub readiness_max_attempts: Option<u32>,
    pub scroll_interval_ms: u64,
    pub stall_threshold: u32,
    pub settle_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        let defaults = Timings::default();
        Self {
            start_delay_ms: millis(defaults.start_delay),
            readiness_poll_ms: millis(defaults.readiness_poll_interval),
            readiness_max_attempts: defaults.readiness_max_attempts,
            scroll_interval_ms: millis(defaults.scroll_interval),
            stall_threshold: defaults.stall_threshold,
            settle_delay_ms: millis(defaults.settle_delay),
        }
    }
}

impl From<&TimingConfig> for Timings {
    fn from(config: &TimingConfig) -> Self {
        Self {
            start_delay: Duration::from_millis(config.start_delay_ms),
            readiness_poll_interval: Duration::from_millis(config.readiness_poll_ms),
            readiness_max_attempts: config.readiness_max_attempts,
            scroll_interval: Duration::from_millis(config.scroll_interval_ms),
            stall_threshold: config.stall_threshold,
            settle_delay: Duration::from_millis(config.settle_delay_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub mode: FetchMode,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let defaults = FetchSettings::default();
        Self {
            mode: FetchMode::Page,
            connect_timeout_ms: millis(defaults.connect_timeout),
            request_timeout_ms: millis(defaults.request_timeout),
            redirect_limit: defaults.redirect_limit,
            max_bytes: defaults.max_bytes,
        }
    }
}

impl From<&FetchConfig> for FetchSettings {
    fn from(config: &FetchConfig) -> Self {
        Self {
            connect_timeout: Duration::from_millis(config.connect_timeout_ms),
            request_timeout: Duration::from_millis(config.request_timeout_ms),
            redirect_limit: config.redirect_limit,
            max_bytes: config.max_bytes,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Reads `path`; a missing file yields the defaults.
pub fn load(path: &Path) -> Result<HarvestConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            harvest_info!(Phase::Startup, "No config at {:?}; using defaults", path);
            return Ok(HarvestConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    harvest_info!(Phase::Startup, "Loaded config from {:?}", path);
    Ok(config)
}

/// Writes `config` as pretty RON to `path`.
pub fn save(path: &Path, config: &HarvestConfig) -> Result<PathBuf, ConfigError> {
    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(config, pretty)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let writer = AtomicFileWriter::new(dir);
    Ok(writer.write(&filename, content.as_bytes())?)
}
