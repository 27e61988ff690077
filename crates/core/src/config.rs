//! Application configuration backed by the `config` crate.
//!
//! Values are layered: built-in defaults, then the user's
//! `config.toml`, then `GAMEVAULT_*` environment variables
//! (`GAMEVAULT_API__BASE_URL=...` for nested keys).

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Directory name used under the platform config and data dirs.
pub const APP_DIR: &str = "gamevault";
/// File name of the user configuration.
pub const CONFIG_FILE: &str = "config.toml";
/// Backend origin used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Top-level configuration for the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend connection settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Connectivity polling settings.
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
    /// Inventory display thresholds.
    #[serde(default)]
    pub inventory: InventoryConfig,
    /// Directory holding the session file, logs and report exports.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Optional colour overrides for the terminal UI.
    #[serde(default)]
    pub theme: ThemeConfig,
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend origin, including any path prefix.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Settings for the background connectivity probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectivityConfig {
    /// Seconds between probes.
    pub interval_secs: u64,
    /// Timeout applied to each probe.
    pub probe_timeout_secs: u64,
}

/// Inventory presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Items at or below this quantity are flagged as low stock.
    pub low_stock_threshold: i64,
    /// Number of rows shown in "recent items" lists.
    pub recent_limit: usize,
}

/// Hex colour overrides (`#rrggbb` or `#rgb`).
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub accent: Option<String>,
    pub muted: Option<String>,
    pub success: Option<String>,
    pub warning: Option<String>,
    pub danger: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
        }
    }
}

impl ApiConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            probe_timeout_secs: 5,
        }
    }
}

impl ConnectivityConfig {
    /// Poll interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    /// Probe timeout as a [`Duration`].
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs.max(1))
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: crate::reports::LOW_STOCK_THRESHOLD,
            recent_limit: 10,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            connectivity: ConnectivityConfig::default(),
            inventory: InventoryConfig::default(),
            data_dir: default_data_dir(),
            theme: ThemeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location plus environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration from an explicit file (which may be missing).
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let defaults = toml::to_string(&AppConfig::default())
            .context("failed to serialise default configuration")?;

        let settings = Config::builder()
            .add_source(File::from_str(&defaults, FileFormat::Toml))
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("GAMEVAULT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    /// Path of the persisted session file.
    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }

    /// Directory receiving report exports.
    pub fn reports_dir(&self) -> PathBuf {
        self.data_dir.join("reports")
    }

    /// Directory receiving log files.
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

/// Location of the user configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Write a default configuration file if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    write_default_config(config_path())
}

/// Write the default configuration to `path` unless the file already exists.
pub fn write_default_config(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    let serialized = toml::to_string_pretty(&AppConfig::default())
        .context("failed to serialise default configuration")?;
    fs::write(path, serialized)
        .with_context(|| format!("failed to write config {}", path.display()))?;
    info!(path = %path.display(), "wrote default configuration");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("absent.toml"))?;
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.connectivity.interval_secs, 60);
        assert_eq!(config.inventory.low_stock_threshold, 2);
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
data_dir = "/tmp/vault"

[api]
base_url = "https://inventory.example.com/api"
timeout_secs = 3

[inventory]
low_stock_threshold = 5
recent_limit = 4
"#,
        )?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.api.base_url, "https://inventory.example.com/api");
        assert_eq!(config.api.timeout(), Duration::from_secs(3));
        assert_eq!(config.inventory.low_stock_threshold, 5);
        assert_eq!(config.inventory.recent_limit, 4);
        assert_eq!(config.connectivity.probe_timeout_secs, 5);
        assert_eq!(config.session_path(), PathBuf::from("/tmp/vault/session.json"));
        Ok(())
    }

    #[test]
    fn default_config_is_written_once() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join(CONFIG_FILE);
        write_default_config(&path)?;
        assert!(path.is_file());

        fs::write(&path, "[api]\nbase_url = \"http://custom\"\ntimeout_secs = 1\n")?;
        write_default_config(&path)?;
        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.api.base_url, "http://custom");
        Ok(())
    }
}
