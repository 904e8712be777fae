use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

use crate::constants::{DEFAULT_LOG_NAME, DEFAULT_MAX_LOG_FILES};

/// Top-level configuration of a rulekit host.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RulekitConfigInner {
    pub codec: CodecConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct RulekitConfig {
    #[serde(flatten, default)]
    inner: Arc<RulekitConfigInner>,
}

impl Deref for RulekitConfig {
    type Target = RulekitConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for RulekitConfig {
    fn deref_mut(&mut self) -> &mut RulekitConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Rule serializer settings.
#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Indented, multi-line output.
    pub pretty: bool,
    /// `module:<crate>` or `type:<tag>` entries known to every call.
    pub default_sources: Vec<String>,
}

/// Logging subsystem settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Identifies the process in logs and prefixes rolling file names.
    pub name: String,
    pub console: bool,
    pub level: LogLevel,
    /// Explicit filter directives, e.g. `rulekit_codec=trace,info`.
    pub filter: Option<String>,
    pub file: Option<FileLogConfig>,
}

/// Rolling file output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    pub directory: PathBuf,
    pub rotation: LogRotation,
    pub max_files: usize,
    pub json: bool,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

// --- Default ---

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_LOG_NAME.to_owned(),
            console: true,
            level: LogLevel::default(),
            filter: None,
            file: None,
        }
    }
}

impl Default for FileLogConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            rotation: LogRotation::default(),
            max_files: DEFAULT_MAX_LOG_FILES,
            json: false,
        }
    }
}
