//! Superscalar in-order pipeline simulator library.
//!
//! This crate implements a trace-driven, cycle-by-cycle model of a W-wide
//! five-stage pipeline with the following:
//! 1. **Core:** Stage grid, resource arbitration, stall queues, and the cycle stepper.
//! 2. **Hazards:** Read-after-write tracking across stages and within a bundle,
//!    plus fetch blocking on branches.
//! 3. **ISA:** Instruction classes and the dynamic instruction descriptor.
//! 4. **Simulation:** Trace parsing and loading, configuration, the run driver,
//!    and statistics collection.
//!
//! # Examples
//!
//! ```
//! use pipesim_core::isa::{InstClass, Instruction};
//! use pipesim_core::sim::source::TraceSource;
//! use pipesim_core::{Config, Simulator};
//!
//! let mut config = Config::default();
//! config.pipeline.width = 2;
//! let trace = TraceSource::from_instructions(vec![
//!     Instruction::new(0x0, InstClass::Integer),
//!     Instruction::new(0x4, InstClass::Float),
//! ]);
//!
//! let stats = Simulator::new(&config, trace).unwrap().run().unwrap();
//! assert_eq!(stats.cycles, 5);
//! assert_eq!(stats.instructions_retired(), 2);
//! ```

/// Common types and constants (errors, stage count, trace format).
pub mod common;
/// Simulator configuration (defaults and hierarchical config structures).
pub mod config;
/// Pipeline model (grid, arbiter, stall queues, hazards, engine).
pub mod core;
/// Instruction classes and descriptors.
pub mod isa;
/// Instruction sources, trace loading, and the run driver.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// The cycle stepper; owns all per-run pipeline state.
pub use crate::core::Pipeline;
/// Drives a pipeline from an instruction source until it drains.
pub use crate::sim::simulator::Simulator;
/// End-of-run counters and report formatting.
pub use crate::stats::SimStats;
