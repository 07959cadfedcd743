//! Configuration loading and validation.
//!
//! SupplySync reads a TOML file with three sections:
//!
//! ```toml
//! [interface]
//! user_code = "ARRAY.INTM"
//! department_code = "01.7020"
//!
//! [paths]
//! download_dir = "/srv/supply-sync/BATCH"
//! processed_dir = "/srv/supply-sync/PROCESSED"
//! upload_dir = "/srv/supply-sync/HHT"
//! hht_file = "/srv/supply-sync/HHT/SupplySync.hht"
//! log_dir = "/srv/supply-sync/logs"
//!
//! [readiness]
//! attempts = 100
//! interval_ms = 100
//! ```
//!
//! On first run the file is created with defaults rooted at the platform data
//! directory. The configuration is loaded and validated once at startup and
//! handed to the pipeline as a value.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::app::models::TransmissionContext;
use crate::app::services::readiness_gate::ReadinessGate;
use crate::constants::{
    APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_DEPARTMENT_CODE, DEFAULT_DOWNLOAD_DIR_NAME,
    DEFAULT_HHT_FILE_NAME, DEFAULT_LOG_DIR_NAME, DEFAULT_PROCESSED_DIR_NAME,
    DEFAULT_READINESS_ATTEMPTS, DEFAULT_READINESS_INTERVAL_MS, DEFAULT_UPLOAD_DIR_NAME,
    DEFAULT_USER_CODE, field_widths,
};
use crate::{Error, Result};

/// Complete SupplySync configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// MEDITECH interface identifiers
    pub interface: InterfaceConfig,

    /// Directories and the transmission file
    pub paths: PathsConfig,

    /// Readiness gate tuning
    #[serde(default)]
    pub readiness: ReadinessConfig,
}

/// MEDITECH interface identifiers written into every transmission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceConfig {
    pub user_code: String,
    pub department_code: String,
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            user_code: DEFAULT_USER_CODE.to_string(),
            department_code: DEFAULT_DEPARTMENT_CODE.to_string(),
        }
    }
}

/// Filesystem locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory watched for new batch files
    pub download_dir: PathBuf,

    /// Archive for parsed batch files
    pub processed_dir: PathBuf,

    /// Directory holding the transmission file
    pub upload_dir: PathBuf,

    /// Transmission file picked up by MEDITECH
    pub hht_file: PathBuf,

    /// Directory for the service log file
    pub log_dir: PathBuf,
}

impl PathsConfig {
    /// Default layout under a base directory
    pub fn under(base: &Path) -> Self {
        let upload_dir = base.join(DEFAULT_UPLOAD_DIR_NAME);
        Self {
            download_dir: base.join(DEFAULT_DOWNLOAD_DIR_NAME),
            processed_dir: base.join(DEFAULT_PROCESSED_DIR_NAME),
            hht_file: upload_dir.join(DEFAULT_HHT_FILE_NAME),
            upload_dir,
            log_dir: base.join(DEFAULT_LOG_DIR_NAME),
        }
    }
}

/// Readiness gate tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessConfig {
    /// Scans for the sentinel before a batch file is abandoned
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Delay between scans in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_attempts() -> u32 {
    DEFAULT_READINESS_ATTEMPTS
}

fn default_interval_ms() -> u64 {
    DEFAULT_READINESS_INTERVAL_MS
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::with_base_dir(&Self::default_base_dir())
    }
}

impl Config {
    /// Default configuration with every path under `base`
    pub fn with_base_dir(base: &Path) -> Self {
        Self {
            interface: InterfaceConfig::default(),
            paths: PathsConfig::under(base),
            readiness: ReadinessConfig::default(),
        }
    }

    /// Application directory under the platform data directory
    pub fn default_base_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("./data"))
            .join(APP_DIR_NAME)
    }

    /// Location of the configuration file when `--config` is not given
    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join(CONFIG_FILE_NAME)
    }

    /// Read and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read config file: {}", path.display()),
                e,
            )
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            Error::configuration(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load the configuration, writing the defaults first if the file is missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            info!("Created default configuration: {}", path.display());
            return Ok(config);
        }
        Self::load(path)
    }

    /// Write the configuration as TOML, creating the parent directory
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::configuration(format!("Failed to serialize configuration: {}", e))
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::io(
                    format!("Failed to create config directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        std::fs::write(path, content).map_err(|e| {
            Error::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let user_code = &self.interface.user_code;
        if user_code.trim().is_empty() {
            return Err(Error::configuration("interface.user_code must not be empty"));
        }
        if user_code.chars().count() > field_widths::GROUP_USER_CODE {
            return Err(Error::configuration(format!(
                "interface.user_code '{}' exceeds {} characters",
                user_code,
                field_widths::GROUP_USER_CODE
            )));
        }

        let department_code = &self.interface.department_code;
        if department_code.chars().count() > field_widths::DEPARTMENT_CODE {
            return Err(Error::configuration(format!(
                "interface.department_code '{}' exceeds {} characters",
                department_code,
                field_widths::DEPARTMENT_CODE
            )));
        }

        if self.readiness.attempts == 0 {
            return Err(Error::configuration("readiness.attempts must be >= 1"));
        }

        if self.paths.download_dir == self.paths.processed_dir {
            return Err(Error::configuration(
                "paths.download_dir and paths.processed_dir must differ",
            ));
        }

        if self.paths.hht_file.file_name().is_none() {
            return Err(Error::configuration(format!(
                "paths.hht_file '{}' does not name a file",
                self.paths.hht_file.display()
            )));
        }

        Ok(())
    }

    /// Create the download, processed and upload directories
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [
            &self.paths.download_dir,
            &self.paths.processed_dir,
            &self.paths.upload_dir,
        ] {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    Error::io(format!("Failed to create directory: {}", dir.display()), e)
                })?;
                info!("Created directory: {}", dir.display());
            }
        }
        Ok(())
    }

    /// Interface identifiers for the transmission writer
    pub fn transmission_context(&self) -> TransmissionContext {
        TransmissionContext::new(
            &self.interface.user_code,
            &self.interface.department_code,
        )
    }

    /// Readiness gate built from the readiness settings
    pub fn readiness_gate(&self) -> ReadinessGate {
        ReadinessGate::new(
            self.readiness.attempts,
            Duration::from_millis(self.readiness.interval_ms),
        )
    }
}
