//! Common utilities and types used throughout the pipeline simulator.
//!
//! This module provides building blocks shared by every component. It includes:
//! 1. **Constants:** Pipeline geometry and trace-format constants.
//! 2. **Error Handling:** Configuration, trace, and simulation error types.

/// Common constants used throughout the simulator.
pub mod constants;

/// Error types for configuration, trace loading, and simulation.
pub mod error;

pub use constants::{NUM_STAGES, PIPELINE_FILL_LATENCY};
pub use error::{ConfigError, SimError, TraceError};
