//! Instruction Set Model.
//!
//! The simulator does not decode real encodings: a trace already tells it the
//! class of every dynamic instruction and which earlier instructions produce
//! its operands. This module holds that abstract descriptor.
//!
//! # Contents
//!
//! * `class`: Instruction classes and their trace type codes.
//! * `instruction`: The dynamic instruction descriptor carried through the pipeline.

/// Instruction classes (integer, floating point, branch, load, store, other).
pub mod class;

/// Dynamic instruction descriptor and sequence identifiers.
pub mod instruction;

pub use class::InstClass;
pub use instruction::{InstId, Instruction};
