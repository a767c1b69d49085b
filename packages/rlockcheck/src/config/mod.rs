//! Configuration System
//!
//! - Level 1: Preset (`conservative`, `balanced`)
//! - Level 2: YAML file (`version: 1` schema)
//! - Level 3: CLI flags
//!
//! # Examples
//!
//! ```rust,ignore
//! use rlockcheck::config::{AnalyzerConfig, Preset};
//!
//! let config = AnalyzerConfig::preset(Preset::Conservative);
//! let config = AnalyzerConfig::from_yaml_file("rlockcheck.yaml")?;
//! ```

pub mod analyzer_config;
pub mod error;
pub mod io;
pub mod preset;

pub use analyzer_config::{
    AnalyzerConfig, LockConfig, OutputFormat, ReportConfig, SearchConfig, Validatable,
    SUPPORTED_VERSIONS,
};
pub use error::{ConfigError, ConfigResult};
pub use io::{ConfigFileV1, SearchConfigPatch};
pub use preset::Preset;
