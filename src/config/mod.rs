//! Configuration for the mtwatch service.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Directory configuration: watcher roots and delivery filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoriesConfig {
    /// Root directories the watcher scans recursively.
    pub project_dirs: Vec<PathBuf>,
    /// Path fragments a deliverable path must contain to be processed.
    /// Empty means every path qualifies.
    #[serde(default)]
    pub delivery_dir: Vec<String>,
}

/// Blacklist of disallowed MT provider names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MtProvidersConfig {
    /// Provider-name substrings that trigger a compliance warning.
    #[serde(default)]
    pub blacklist: Vec<String>,
}

/// Watcher polling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Seconds between directory scans.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
        }
    }
}

fn default_poll_interval() -> u64 {
    5
}

impl WatchConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Retry configuration for deliverables still being written by the
/// producing translation tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum read attempts before giving up on a locked file.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Fixed delay between attempts, in seconds.
    #[serde(default = "default_retry_delay")]
    pub delay_secs: u64,
    /// Settle delay before the first attempt, in seconds. The producing tool
    /// often creates the file before it has finished writing it.
    #[serde(default = "default_settle")]
    pub settle_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_secs: default_retry_delay(),
            settle_secs: default_settle(),
        }
    }
}

fn default_max_attempts() -> u32 {
    10
}

fn default_retry_delay() -> u64 {
    2
}

fn default_settle() -> u64 {
    1
}

/// Source resolution configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Alternate sub-directory probed once when the primary path is absent.
    /// Empty disables the fallback probe.
    #[serde(default)]
    pub fallback_subdir: String,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Skip the `auto-propagated` origin category in audit lines. These are
    /// translation-memory pre-fills, not actionable MT-compliance signals.
    #[serde(default = "default_exclude_auto_propagated")]
    pub exclude_auto_propagated: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            exclude_auto_propagated: default_exclude_auto_propagated(),
        }
    }
}

fn default_exclude_auto_propagated() -> bool {
    true
}

/// Main configuration for mtwatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory configuration.
    pub directories: DirectoriesConfig,
    /// MT provider blacklist.
    #[serde(default)]
    pub mt_providers: MtProvidersConfig,
    /// Watcher polling configuration.
    #[serde(default)]
    pub watch: WatchConfig,
    /// Retry configuration.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Source resolution configuration.
    #[serde(default)]
    pub source: SourceConfig,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl Config {
    /// Load configuration from a file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::ReadFile { source })?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents)
            .map_err(|source| ConfigError::YamlParse { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.directories.project_dirs.is_empty() {
            return Err(ConfigError::NoProjectDirs);
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }
}
