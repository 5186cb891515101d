//! Simulator: owns the pipeline and its instruction source side-by-side.

use crate::common::error::{ConfigError, SimError};
use crate::config::Config;
use crate::core::pipeline::engine::{Pipeline, TickOutcome};
use crate::sim::source::InstructionSource;
use crate::stats::SimStats;

/// Top-level simulator: pipeline state + instruction supply.
#[derive(Debug)]
pub struct Simulator<S> {
    /// The pipeline being stepped.
    pub pipeline: Pipeline,
    /// Where fetched instructions come from.
    pub source: S,
    max_cycles: Option<u64>,
}

impl<S: InstructionSource> Simulator<S> {
    /// Creates a simulator for `source` with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`Config::validate`].
    pub fn new(config: &Config, source: S) -> Result<Self, ConfigError> {
        Ok(Self {
            pipeline: Pipeline::new(config)?,
            source,
            max_cycles: config.general.max_cycles,
        })
    }

    /// Advances the simulator by one clock cycle.
    pub fn tick(&mut self) -> TickOutcome {
        self.pipeline.tick(&mut self.source)
    }

    /// Steps until the pipeline drains and returns the final statistics.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::CycleLimit`] if `general.max_cycles` is set and the
    /// run needs more cycles than that.
    pub fn run(mut self) -> Result<SimStats, SimError> {
        tracing::info!(width = self.pipeline.width(), "simulation started");
        while self.tick() == TickOutcome::Running {
            let cycle = self.pipeline.cycle();
            if let Some(limit) = self.max_cycles.filter(|&limit| cycle > limit) {
                tracing::warn!(limit, "cycle limit reached");
                return Err(SimError::CycleLimit { limit });
            }
        }

        let stats = self.pipeline.into_stats();
        tracing::info!(
            cycles = stats.cycles,
            retired = stats.instructions_retired(),
            ipc = stats.ipc(),
            "simulation finished"
        );
        Ok(stats)
    }
}
