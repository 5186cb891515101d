//! Core processor model.
//!
//! This module contains the instruction pipeline: the stage grid, resource
//! arbitration, hazard tracking, and the cycle stepper that coordinates them.

/// Instruction pipeline implementation (grid, arbiter, queues, hazards, engine).
pub mod pipeline;

pub use self::pipeline::engine::{Pipeline, TickOutcome};
