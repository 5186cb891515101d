//! Simulation driver and instruction supply.
//!
//! It provides:
//! 1. **Sources:** The [`source::InstructionSource`] boundary and its trace-backed implementation.
//! 2. **Loading:** Opening trace files and selecting a window of them.
//! 3. **Driver:** [`simulator::Simulator`], which steps a pipeline until it drains.

pub mod loader;
pub mod simulator;
pub mod source;
