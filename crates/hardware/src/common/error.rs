//! Error definitions.
//!
//! This module defines the fallible surfaces of the simulator. It provides:
//! 1. **Configuration Errors:** Invalid pipeline geometry or unreadable config files.
//! 2. **Trace Errors:** Unreadable trace files and malformed trace lines.
//! 3. **Simulation Errors:** The umbrella type returned by the simulation driver.
//!
//! The cycle stepper itself never fails; every error here is raised either
//! before the first cycle or by the driver's optional cycle guard.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or validating a [`Config`](crate::config::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The pipeline must have at least one lane.
    #[error("pipeline width must be at least 1")]
    ZeroWidth,

    /// The cycle guard, when set, must allow at least one cycle.
    #[error("max_cycles must be at least 1 when set")]
    ZeroCycleLimit,

    /// The configuration file could not be read.
    #[error("could not read config '{path}': {source}")]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The configuration JSON is malformed or has fields of the wrong type.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors raised while loading an instruction trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace file could not be opened.
    #[error("could not read trace '{path}': {source}")]
    Io {
        /// Path of the trace file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Reading a line from an already-open trace stream failed.
    #[error("trace line {line}: read failed: {source}")]
    Read {
        /// 1-based line number that could not be read.
        line: usize,
        /// Underlying I/O or encoding failure.
        #[source]
        source: io::Error,
    },

    /// A trace line does not follow the `<pc>,<type>[,<dep>...]` format.
    #[error("trace line {line}: {reason}")]
    Malformed {
        /// 1-based line number within the trace file.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },
}

/// Errors returned by the simulation driver.
#[derive(Debug, Error)]
pub enum SimError {
    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The trace could not be loaded.
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// The pipeline did not drain within the configured cycle guard.
    #[error("simulation exceeded {limit} cycles without draining")]
    CycleLimit {
        /// The configured `max_cycles` value.
        limit: u64,
    },
}
