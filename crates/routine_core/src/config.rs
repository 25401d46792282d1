//! Application configuration loaded from a JSON file.
//!
//! Every field has a default, so a missing file or a partial file is valid.

use crate::export::ExportOptions;
use crate::logging::default_log_level;
use crate::model::state::DEFAULT_ROUTINE_NAME;
use crate::notify::{DEFAULT_NOTIFICATION_TTL, MAX_NOTIFICATION_TTL};
use crate::service::bootstrap::BootstrapOptions;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default store file name, relative to the working directory.
pub const DEFAULT_STORE_FILE: &str = "routine.sqlite3";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    /// Absolute log directory; logs go to stderr when unset.
    pub log_dir: Option<String>,
    pub store_path: PathBuf,
    /// Name of the routine created on first run.
    pub default_routine_name: String,
    /// Whether first run starts with the predefined slots.
    pub seed_default_slots: bool,
    pub notification_ttl_ms: u64,
    pub export: ExportOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level().to_string(),
            log_dir: None,
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            default_routine_name: DEFAULT_ROUTINE_NAME.to_string(),
            seed_default_slots: false,
            notification_ttl_ms: u64::try_from(DEFAULT_NOTIFICATION_TTL.as_millis())
                .unwrap_or(u64::MAX),
            export: ExportOptions::default(),
        }
    }
}

impl AppConfig {
    pub fn bootstrap_options(&self) -> BootstrapOptions {
        BootstrapOptions {
            default_routine_name: self.default_routine_name.clone(),
            seed_default_slots: self.seed_default_slots,
        }
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms).min(MAX_NOTIFICATION_TTL)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Reads `path`. A missing file yields the defaults; a malformed one is an
/// error.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(raw) => Ok(serde_json::from_str(&raw)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(err) => Err(err.into()),
    }
}
