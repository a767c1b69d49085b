//! Configuration I/O (YAML schema)
//!
//! Every section is optional; absent values fall back to the preset.

use serde::{Deserialize, Serialize};

use super::analyzer_config::{AnalyzerConfig, LockConfig, ReportConfig};
use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    /// Base preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<Preset>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<LockConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchConfigPatch>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportConfig>,
}

/// Partial search settings; unset fields keep the preset value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_arguments: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_package_locks: Option<bool>,
}

impl ConfigFileV1 {
    /// Apply the file on top of its preset
    pub fn into_config(self) -> ConfigResult<AnalyzerConfig> {
        let version = self.version.ok_or(ConfigError::MissingVersion)?;
        let mut config = AnalyzerConfig::preset(self.preset.unwrap_or_default());
        config.version = version;

        if let Some(lock) = self.lock {
            config.lock = lock;
        }
        if let Some(search) = self.search {
            if let Some(v) = search.follow_arguments {
                config.search.follow_arguments = v;
            }
            if let Some(v) = search.follow_package_locks {
                config.search.follow_package_locks = v;
            }
        }
        if let Some(report) = self.report {
            config.report = report;
        }
        Ok(config)
    }

    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self {
            version: Some(config.version),
            preset: Some(config.preset),
            lock: Some(config.lock.clone()),
            search: Some(SearchConfigPatch {
                follow_arguments: Some(config.search.follow_arguments),
                follow_package_locks: Some(config.search.follow_package_locks),
            }),
            report: Some(config.report.clone()),
        }
    }
}
