//! Configuration management for Quotient.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. Marketplace credentials are only ever
//! read from the environment, never serialized to disk.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main application configuration.
///
/// Loaded from `~/.config/quotient/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Marketplace site and credential settings
    pub marketplace: MarketplaceSettings,
    /// Supplier selection settings
    pub selection: SelectionSettings,
    /// Batch execution settings
    pub batch: BatchSettings,
    /// Browser automation settings
    pub browser: BrowserSettings,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if the file
    /// does not exist.
    ///
    /// # Errors
    /// Fails when the config directory cannot be determined, or when the
    /// file exists but cannot be read or parsed.
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            tracing::debug!("no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `QUOTIENT_ACCOUNT` / `QUOTIENT_USERNAME` / `QUOTIENT_PASSWORD`:
    ///   marketplace credentials (never read from the config file)
    /// - `QUOTIENT_WORKERS`: override worker count
    /// - `QUOTIENT_BASE_DELAY_MS`: override the pre-submission base delay
    /// - `QUOTIENT_HEADLESS`: override browser headless mode (true/false)
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;

        if let Ok(val) = std::env::var("QUOTIENT_ACCOUNT") {
            config.marketplace.account = val;
        }
        if let Ok(val) = std::env::var("QUOTIENT_USERNAME") {
            config.marketplace.username = val;
        }
        if let Ok(val) = std::env::var("QUOTIENT_PASSWORD") {
            config.marketplace.password = val;
        }

        if let Ok(val) = std::env::var("QUOTIENT_WORKERS") {
            if let Ok(workers) = val.parse() {
                config.batch.workers = workers;
                tracing::debug!("batch.workers overridden from env: {}", workers);
            }
        }

        if let Ok(val) = std::env::var("QUOTIENT_BASE_DELAY_MS") {
            if let Ok(delay) = val.parse() {
                config.batch.base_delay_ms = delay;
                tracing::debug!("batch.base_delay_ms overridden from env: {}", delay);
            }
        }

        if let Ok(val) = std::env::var("QUOTIENT_HEADLESS") {
            if let Ok(headless) = val.parse() {
                config.browser.headless = headless;
                tracing::debug!("browser.headless overridden from env: {}", headless);
            }
        }

        Ok(config)
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist. Credentials are
    /// not serialized.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Path of the configuration file, under the XDG config directory
    /// (`~/.config/quotient/config.toml` on Linux).
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "quotient", "quotient").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Data directory for lock files and reports, under the XDG data
    /// directory (`~/.local/share/quotient` on Linux).
    pub fn data_dir() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "quotient", "quotient").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Directory holding run lock files: the configured override or
    /// `<data_dir>/locks`.
    pub fn lock_dir(&self) -> ConfigResult<PathBuf> {
        match &self.batch.lock_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::data_dir()?.join("locks")),
        }
    }

    /// Validate values that serde cannot check structurally.
    ///
    /// # Errors
    /// Returns error for a zero worker count, a zero per-region cap, or a
    /// jitter spread outside `[0, 1)`.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.batch.workers == 0 {
            return Err(ConfigError::InvalidValue {
                field: "batch.workers".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.selection.max_suppliers_per_region == 0 {
            return Err(ConfigError::InvalidValue {
                field: "selection.max_suppliers_per_region".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..1.0).contains(&self.batch.jitter) {
            return Err(ConfigError::InvalidValue {
                field: "batch.jitter".to_string(),
                reason: "must be in [0, 1)".to_string(),
            });
        }
        Ok(())
    }
}

/// Marketplace site and credential settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketplaceSettings {
    /// Marketplace base URL
    pub base_url: String,
    /// Account number (from `QUOTIENT_ACCOUNT`, not the config file)
    #[serde(skip)]
    pub account: String,
    /// Login user name (from `QUOTIENT_USERNAME`, not the config file)
    #[serde(skip)]
    pub username: String,
    /// Login password (from `QUOTIENT_PASSWORD`, not the config file)
    #[serde(skip)]
    pub password: String,
    /// Message attached to Europe-region submissions
    pub europe_comment: String,
}

impl Default for MarketplaceSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.netcomponents.com".to_string(),
            account: String::new(),
            username: String::new(),
            password: String::new(),
            europe_comment: "Please confirm country of origin.".to_string(),
        }
    }
}

impl MarketplaceSettings {
    /// Whether all credentials needed for login are present.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.account.is_empty() && !self.username.is_empty() && !self.password.is_empty()
    }
}

/// Supplier selection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    /// Maximum suppliers selected per non-excluded region
    pub max_suppliers_per_region: usize,
    /// Date codes within this many years count as fresh
    pub date_code_window_years: i32,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            max_suppliers_per_region: 3,
            date_code_window_years: 2,
        }
    }
}

/// Batch execution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Number of parallel submission workers
    pub workers: usize,
    /// Base delay before each submission, in milliseconds
    pub base_delay_ms: u64,
    /// Jitter spread applied to delays (0.4 = +/-40%)
    pub jitter: f64,
    /// Override for the lock file directory
    pub lock_dir: Option<PathBuf>,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            workers: 3,
            base_delay_ms: 2000,
            jitter: 0.4,
            lock_dir: None,
        }
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Navigation timeout in seconds
    pub navigation_timeout_secs: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1400,
            window_height: 1000,
            navigation_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.selection.max_suppliers_per_region, 3);
        assert_eq!(config.selection.date_code_window_years, 2);
        assert_eq!(config.batch.workers, 3);
        assert!((config.batch.jitter - 0.4).abs() < f64::EPSILON);
        assert!(config.browser.headless);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[marketplace]"));
        assert!(toml_str.contains("[selection]"));
        assert!(toml_str.contains("[batch]"));
        // Credentials must never reach disk
        assert!(!toml_str.contains("password"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.batch.workers, config.batch.workers);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[batch]
workers = 5

[selection]
max_suppliers_per_region = 2
"#;

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.batch.workers, 5);
        assert_eq!(config.selection.max_suppliers_per_region, 2);
        // These should be defaults
        assert_eq!(config.batch.base_delay_ms, 2000);
        assert!(config.browser.headless);
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let mut config = AppConfig::default();
        config.batch.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_jitter() {
        let mut config = AppConfig::default();
        config.batch.jitter = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_lock_dir_override() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let mut config = AppConfig::default();
        config.batch.lock_dir = Some(tmp.path().to_path_buf());
        assert_eq!(config.lock_dir().expect("lock dir"), tmp.path());
    }

    #[test]
    fn test_credentials_presence() {
        let mut settings = MarketplaceSettings::default();
        assert!(!settings.has_credentials());
        settings.account = "12345".to_string();
        settings.username = "buyer".to_string();
        settings.password = "secret".to_string();
        assert!(settings.has_credentials());
    }
}
