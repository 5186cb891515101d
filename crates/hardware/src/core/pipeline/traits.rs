//! Pipeline storage interface.
//!
//! This module defines the common trait for structures that hold in-flight
//! instructions between cycles (the grid and the two stall queues). It provides
//! the emptiness check used for termination and the occupancy count used by the
//! per-cycle trace.

/// A structure holding in-flight instructions.
pub trait PipelineLatch {
    /// Checks if the latch holds no instruction.
    ///
    /// # Returns
    ///
    /// `true` if there are no valid instructions in the latch, `false` otherwise.
    fn is_empty(&self) -> bool;

    /// Number of instructions currently held.
    fn occupancy(&self) -> usize;
}
