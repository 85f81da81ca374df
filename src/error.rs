//! Error types for query generation and configuration

use std::path::PathBuf;
use thiserror::Error;

/// Result type for auto-query operations
pub type Result<T> = std::result::Result<T, AutoQueryError>;

/// Errors raised while deriving queries or loading configuration
#[derive(Debug, Error)]
pub enum AutoQueryError {
    /// Suffix is missing, empty, or a reserved token (`sum`, `bucket`)
    #[error("invalid metric suffix {}", describe_suffix(.suffix))]
    InvalidSuffix {
        /// The offending token, `None` when the metric had no such segment
        suffix: Option<String>,
    },

    /// Sum generator invoked on a metric that does not end in `sum`
    #[error("metric '{metric}' does not end with a \"sum\" segment")]
    MissingSumSuffix {
        /// Metric name as rejoined from its parts
        metric: String,
    },

    /// Bucket generator invoked on a metric that does not end in `bucket`
    #[error("metric '{metric}' does not end with a \"bucket\" segment")]
    MissingBucketSuffix {
        /// Metric name as rejoined from its parts
        metric: String,
    },

    /// Configuration value failed validation
    #[error("invalid configuration: {message}")]
    Config {
        /// What was wrong
        message: String,
    },

    /// Configuration file could not be read
    #[error("failed to read config file {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for `EngineConfig`
    #[error("failed to parse config: {source}")]
    ConfigParse {
        #[from]
        source: toml::de::Error,
    },
}

impl AutoQueryError {
    /// Create an InvalidSuffix error
    #[inline]
    pub fn invalid_suffix(suffix: Option<&str>) -> Self {
        Self::InvalidSuffix {
            suffix: suffix.map(str::to_string),
        }
    }

    /// Create a MissingSumSuffix error
    #[inline]
    pub fn missing_sum_suffix(metric: impl Into<String>) -> Self {
        Self::MissingSumSuffix {
            metric: metric.into(),
        }
    }

    /// Create a MissingBucketSuffix error
    #[inline]
    pub fn missing_bucket_suffix(metric: impl Into<String>) -> Self {
        Self::MissingBucketSuffix {
            metric: metric.into(),
        }
    }

    /// Create a Config error
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Short reason label used as a metrics tag
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidSuffix { .. } => "invalid_suffix",
            Self::MissingSumSuffix { .. } => "missing_sum_suffix",
            Self::MissingBucketSuffix { .. } => "missing_bucket_suffix",
            Self::Config { .. } | Self::ConfigIo { .. } | Self::ConfigParse { .. } => "config",
        }
    }
}

fn describe_suffix(suffix: &Option<String>) -> String {
    match suffix {
        None => "(missing)".to_string(),
        Some(s) if s.is_empty() => "(empty)".to_string(),
        Some(s) => format!("'{}'", s),
    }
}
