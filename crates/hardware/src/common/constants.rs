//! Global Pipeline Constants.
//!
//! This module defines constants shared across the simulator. It includes:
//! 1. **Geometry:** Stage count of the pipeline grid.
//! 2. **Trace Format:** Field separators, comment markers, and class codes.
//! 3. **Timing:** The fill latency used when reasoning about drain times.

/// Number of pipeline stages (IF, ID, EX, MEM, WB).
pub const NUM_STAGES: usize = 5;

/// Cycles an instruction spends between fetch and retirement on an empty pipeline.
///
/// A run of `n` independent, non-contending instructions on a `w`-wide
/// pipeline takes `ceil(n / w) + PIPELINE_FILL_LATENCY` cycles.
pub const PIPELINE_FILL_LATENCY: u64 = NUM_STAGES as u64 - 1;

/// Field separator within a trace line.
pub const TRACE_FIELD_SEPARATOR: char = ',';

/// Lines beginning with this character are ignored by the trace parser.
pub const TRACE_COMMENT_MARKER: char = '#';

/// Trace type code for integer ALU instructions.
pub const CLASS_CODE_INTEGER: u32 = 1;

/// Trace type code for floating-point instructions.
pub const CLASS_CODE_FLOAT: u32 = 2;

/// Trace type code for branch instructions.
pub const CLASS_CODE_BRANCH: u32 = 3;

/// Trace type code for memory loads.
pub const CLASS_CODE_LOAD: u32 = 4;

/// Trace type code for memory stores.
pub const CLASS_CODE_STORE: u32 = 5;
