//! Engine configuration
//!
//! Loaded from a TOML file, then overridden from the environment:
//!
//! ```toml
//! delimiter = "_"
//!
//! [logging]
//! level = "info"
//! format = "console"
//! ```
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `AUTOQUERY_DELIMITER` | `delimiter` |
//! | `AUTOQUERY_LOG` | `logging.level` |

use crate::error::{AutoQueryError, Result};
use crate::generators::DEFAULT_DELIMITER;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ENV_DELIMITER: &str = "AUTOQUERY_DELIMITER";
pub const ENV_LOG_LEVEL: &str = "AUTOQUERY_LOG";

/// Log level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert to tracing level filter string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Console,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

/// Query engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Separator between metric name segments
    pub delimiter: String,
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            delimiter: DEFAULT_DELIMITER.to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| AutoQueryError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Apply `AUTOQUERY_*` variables on top of this config
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(delimiter) = lookup(ENV_DELIMITER) {
            self.delimiter = delimiter;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = LogLevel::parse(&level).ok_or_else(|| {
                AutoQueryError::config(format!("{} has unknown level '{}'", ENV_LOG_LEVEL, level))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.logging.level = level;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.delimiter.is_empty() {
            return Err(AutoQueryError::config("delimiter must not be empty"));
        }
        Ok(())
    }
}
