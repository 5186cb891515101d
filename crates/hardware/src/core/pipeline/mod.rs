//! Instruction pipeline implementation.
//!
//! This module contains the W-wide, five-stage in-order pipeline model.
//! It includes the following components:
//! 1. **Grid:** The lane × stage matrix of instruction slots.
//! 2. **Arbiter:** Per-cycle ownership of the execute units and memory ports.
//! 3. **Stall queues:** FIFOs in front of EXECUTE and MEMORY and the transition policy.
//! 4. **Hazards:** Read-after-write tracking and intra-bundle squashing.
//! 5. **Engine:** The cycle stepper that ties the rest together.
//! 6. **Traits:** Common interfaces for pipeline storage.

/// Structural resource arbitration.
pub mod arbiter;

/// The cycle stepper.
pub mod engine;

/// The lane × stage instruction grid.
pub mod grid;

/// Data hazard detection and resolution.
pub mod hazards;

/// Stall queues and arbitrated stage transitions.
pub mod stall_queue;

/// Traits for pipeline storage components.
pub mod traits;
