//! Analyzer configuration
//!
//! Three layers, applied in order: preset defaults, YAML file, CLI overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::io::ConfigFileV1;
use super::preset::Preset;

/// Schema versions this build can read
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Trait for validatable configuration objects
pub trait Validatable {
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;
}

/// Names of the lock operations being tracked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LockConfig {
    /// Method/function name that acquires the lock
    pub acquire: String,
    /// Method/function name that releases the lock
    pub release: String,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            acquire: "RLock".to_string(),
            release: "RUnlock".to_string(),
        }
    }
}

impl Validatable for LockConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.acquire.trim().is_empty() {
            return Err(ConfigError::invalid("lock.acquire", "must not be empty"));
        }
        if self.release.trim().is_empty() {
            return Err(ConfigError::invalid("lock.release", "must not be empty"));
        }
        if self.acquire == self.release {
            return Err(ConfigError::invalid(
                "lock.release",
                format!("must differ from lock.acquire ('{}')", self.acquire),
            ));
        }
        Ok(())
    }
}

/// Which callee entries the nested-lock search may use to carry a held lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Re-root the lock path at a parameter when an argument reaches the lock
    pub follow_arguments: bool,
    /// Carry locks rooted at package-level variables into any callee
    pub follow_package_locks: bool,
}

impl SearchConfig {
    pub fn for_preset(preset: Preset) -> Self {
        match preset {
            Preset::Conservative => Self {
                follow_arguments: false,
                follow_package_locks: false,
            },
            Preset::Balanced => Self {
                follow_arguments: true,
                follow_package_locks: true,
            },
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::for_preset(Preset::default())
    }
}

/// Diagnostic output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::invalid(
                "report.format",
                format!("unknown format '{}', expected text or json", other),
            )),
        }
    }
}

/// Reporting options used by the CLI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Analyze `_test.go` files too
    #[serde(default)]
    pub include_tests: bool,
}

/// Complete analyzer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub version: u32,
    pub preset: Preset,
    pub lock: LockConfig,
    pub search: SearchConfig,
    pub report: ReportConfig,
}

impl AnalyzerConfig {
    /// Complete defaults for a preset
    pub fn preset(preset: Preset) -> Self {
        Self {
            version: 1,
            preset,
            lock: LockConfig::default(),
            search: SearchConfig::for_preset(preset),
            report: ReportConfig::default(),
        }
    }

    /// Load and validate a YAML configuration string
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(yaml)?;
        let config = file.into_config()?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML configuration file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Serialize to the YAML v1 schema
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(&ConfigFileV1::from_config(self))?)
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

impl Validatable for AnalyzerConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !SUPPORTED_VERSIONS.contains(&self.version) {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }
        self.lock.validate()
    }
}
