//! Application configuration loaded from TOML.
//!
//! Every section and field has a default, so a missing file or a partial
//! file both produce a usable configuration.

use crate::llm::OllamaConfig;
use crate::prioritization::{domain::CandidatePolicy, services::PrioritizationSettings};
use crate::task::domain::{EstimatedHours, TaskDomainError};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Config file path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("failed to parse config {path}: {message}")]
    Parse {
        /// Config file path.
        path: Utf8PathBuf,
        /// Parser message.
        message: String,
    },

    /// A value parsed but is not acceptable.
    #[error("invalid config value: {0}")]
    Invalid(#[from] TaskDomainError),

    /// A numeric setting is outside its accepted range.
    #[error("config value {key} = {value} is out of range: {expected}")]
    OutOfRange {
        /// Setting name.
        key: &'static str,
        /// Rejected value.
        value: u64,
        /// Accepted range.
        expected: &'static str,
    },
}

/// Which ranking oracle backs the `prioritize` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleBackend {
    /// Local ordering by due date and estimate.
    #[default]
    Deadline,
    /// Language model served through Ollama.
    Ollama,
}

/// Task store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the JSON task file.
    pub path: Utf8PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: Utf8PathBuf::from(crate::task::adapters::json_file::DEFAULT_TASKS_FILE),
        }
    }
}

/// Re-prioritization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrioritizationConfig {
    /// Seconds allowed for one oracle call.
    pub oracle_timeout_secs: u64,
    /// Days after today used as the due date of undated tasks.
    pub default_due_in_days: u32,
    /// Estimate in hours used for tasks without one.
    pub default_estimated_hours: String,
}

impl Default for PrioritizationConfig {
    fn default() -> Self {
        Self {
            oracle_timeout_secs: 30,
            default_due_in_days: 7,
            default_estimated_hours: "1".to_owned(),
        }
    }
}

impl PrioritizationConfig {
    /// Converts the section into service settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the default estimate is not a
    /// positive number of hours, and [`ConfigError::OutOfRange`] when the
    /// oracle timeout is zero.
    pub fn to_settings(&self) -> Result<PrioritizationSettings, ConfigError> {
        if self.oracle_timeout_secs == 0 {
            return Err(ConfigError::OutOfRange {
                key: "prioritization.oracle_timeout_secs",
                value: self.oracle_timeout_secs,
                expected: "at least 1 second",
            });
        }
        Ok(PrioritizationSettings {
            policy: CandidatePolicy {
                default_due_in_days: self.default_due_in_days,
                default_estimated_hours: EstimatedHours::new(
                    self.default_estimated_hours.as_str(),
                )?,
            },
            oracle_timeout: Duration::from_secs(self.oracle_timeout_secs),
        })
    }
}

/// Oracle selection and model settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Ranking backend.
    pub backend: OracleBackend,
    /// Ollama connection settings, also used for suggestions.
    pub ollama: OllamaConfig,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyflowConfig {
    /// Task store settings.
    pub store: StoreConfig,
    /// Re-prioritization settings.
    pub prioritization: PrioritizationConfig,
    /// Oracle settings.
    pub oracle: OracleConfig,
}

impl DailyflowConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not valid for this
    /// schema; `origin` names the source in the error.
    pub fn from_toml(text: &str, origin: &Utf8Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|err| ConfigError::Parse {
            path: origin.to_owned(),
            message: err.to_string(),
        })
    }

    /// Loads configuration from `path`, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file exists but cannot be read
    /// and [`ConfigError::Parse`] when it is malformed.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let read_error = |source| ConfigError::Read {
            path: path.to_owned(),
            source,
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| read_error(std::io::Error::other("path must include a file name")))?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let dir = match Dir::open_ambient_dir(parent, ambient_authority()) {
            Ok(dir) => dir,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(read_error(err)),
        };
        match dir.read_to_string(file_name) {
            Ok(text) => Self::from_toml(&text, path),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(read_error(err)),
        }
    }
}
