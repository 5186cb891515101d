//! Configuration system for the pipeline simulator.
//!
//! This module defines the configuration structures used to parameterize a run.
//! It provides:
//! 1. **Defaults:** Baseline values for pipeline width, trace window, and diagnostics.
//! 2. **Structures:** Hierarchical config for general, pipeline, and trace settings.
//! 3. **Loading:** JSON deserialization from strings or files, plus validation.
//!
//! The CLI builds a `Config` from its positional arguments, optionally layered
//! over a JSON file passed with `--config`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::error::ConfigError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Default pipeline width (1 instruction per stage per cycle).
    pub const PIPELINE_WIDTH: usize = 1;

    /// Default first trace instruction (1-based).
    pub const TRACE_START: usize = 1;

    /// Default number of trace instructions to load (the whole trace).
    pub const TRACE_COUNT: usize = usize::MAX;
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use pipesim_core::config::Config;
///
/// let json = r#"{
///     "general": { "trace_pipeline": true, "max_cycles": 100000 },
///     "pipeline": { "width": 4 },
///     "trace": { "start": 10, "count": 500 }
/// }"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert!(config.general.trace_pipeline);
/// assert_eq!(config.general.max_cycles, Some(100_000));
/// assert_eq!(config.pipeline.width, 4);
/// assert_eq!(config.trace.start, 10);
/// assert_eq!(config.trace.count, 500);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Pipeline geometry
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Trace window
    #[serde(default)]
    pub trace: TraceConfig,
}

impl Config {
    /// Parses a configuration from JSON and validates it.
    ///
    /// Missing sections and fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any validation
    /// error reported by [`Config::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// errors of [`Config::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks the invariants the pipeline relies on.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::ZeroWidth`] if `pipeline.width` is zero.
    /// * [`ConfigError::ZeroCycleLimit`] if `general.max_cycles` is `Some(0)`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if matches!(self.general.max_cycles, Some(0)) {
            return Err(ConfigError::ZeroCycleLimit);
        }
        Ok(())
    }
}

/// General simulation configuration.
///
/// Contains diagnostics and run-control settings that do not change the
/// modeled timing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    /// Dump the pipeline grid at `debug` level after every cycle
    #[serde(default)]
    pub trace_pipeline: bool,

    /// Abort the run with an error if it has not drained after this many cycles
    #[serde(default)]
    pub max_cycles: Option<u64>,
}

/// Pipeline geometry configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Superscalar width (lanes per stage)
    #[serde(default = "PipelineConfig::default_width")]
    pub width: usize,
}

impl PipelineConfig {
    /// Returns the default pipeline width.
    const fn default_width() -> usize {
        defaults::PIPELINE_WIDTH
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            width: defaults::PIPELINE_WIDTH,
        }
    }
}

/// Trace window configuration.
///
/// Selects which slice of the trace file is fed to the pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct TraceConfig {
    /// 1-based index of the first instruction to load (0 behaves like 1)
    #[serde(default = "TraceConfig::default_start")]
    pub start: usize,

    /// Maximum number of instructions to load
    #[serde(default = "TraceConfig::default_count")]
    pub count: usize,
}

impl TraceConfig {
    /// Returns the default first instruction index.
    const fn default_start() -> usize {
        defaults::TRACE_START
    }

    /// Returns the default instruction count (unbounded).
    const fn default_count() -> usize {
        defaults::TRACE_COUNT
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            start: defaults::TRACE_START,
            count: defaults::TRACE_COUNT,
        }
    }
}
