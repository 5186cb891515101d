//! Cycle stepper.
//!
//! [`Pipeline`] owns every piece of per-run state: the grid, the resource
//! arbiter, both stall queues, the hazard unit, and the statistics. One call to
//! [`Pipeline::tick`] simulates one clock cycle, walking the stages from the
//! back of the pipeline to the front:
//! 1. **Writeback:** retire WB, then move MEM into WB and free the memory ports.
//! 2. **Memory:** move EX into MEM through the MEMORY stall queue, then free
//!    the execute units.
//! 3. **Hazards:** drop resolved producers, re-check instructions waiting to
//!    enter EXECUTE, then squash intra-bundle producers.
//! 4. **Front end:** unless a data hazard freezes it, move ID into EX through the
//!    EXECUTE stall queue, move IF into ID while marking new hazards, and fetch.
//! 5. **Termination:** a cycle that leaves nothing in flight and nothing to fetch
//!    ends the run and is not counted.

use crate::common::error::ConfigError;
use crate::config::Config;
use crate::core::pipeline::arbiter::ResourceArbiter;
use crate::core::pipeline::grid::{PipelineGrid, Stage};
use crate::core::pipeline::hazards::{HazardUnit, Position, squash_intra_bundle};
use crate::core::pipeline::stall_queue::{StallQueue, Transition};
use crate::core::pipeline::traits::PipelineLatch;
use crate::isa::{InstClass, InstId};
use crate::sim::source::InstructionSource;
use crate::stats::SimStats;

/// Result of one [`Pipeline::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The cycle was counted and work remains.
    Running,
    /// The pipeline has drained and the source is exhausted.
    Drained,
}

/// A W-wide in-order five-stage pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    grid: PipelineGrid,
    arbiter: ResourceArbiter,
    ex_queue: StallQueue,
    mem_queue: StallQueue,
    hazards: HazardUnit,
    /// Set when a branch is fetched; cleared when it is accepted into MEM.
    control_hazard: bool,
    next_id: u64,
    cycle: u64,
    stats: SimStats,
    trace_pipeline: bool,
}

impl Pipeline {
    /// Builds an empty pipeline sized from `config`.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`Config::validate`].
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            grid: PipelineGrid::new(config.pipeline.width),
            arbiter: ResourceArbiter::new(),
            ex_queue: StallQueue::new(Transition::DecodeToExecute),
            mem_queue: StallQueue::new(Transition::ExecuteToMemory),
            hazards: HazardUnit::new(),
            control_hazard: false,
            next_id: 0,
            cycle: 0,
            stats: SimStats::default(),
            trace_pipeline: config.general.trace_pipeline,
        })
    }

    /// Simulates one clock cycle, pulling new instructions from `source`.
    pub fn tick<S: InstructionSource + ?Sized>(&mut self, source: &mut S) -> TickOutcome {
        self.retire();
        self.grid.shift(Stage::Memory, Stage::Writeback);
        self.arbiter.release_memory_ports();

        let to_mem = self.mem_queue.advance(&mut self.grid, &mut self.arbiter);
        self.stats.mem_deferrals += to_mem.deferred as u64;
        if to_mem.branch_accepted && self.control_hazard {
            tracing::trace!(cycle = self.cycle, "branch resolved, fetch unblocked");
            self.control_hazard = false;
        }
        self.arbiter.release_execute_units();

        let (grid, ex_queue, mem_queue) = (&self.grid, &self.ex_queue, &self.mem_queue);
        let cleared = self
            .hazards
            .clear_resolved(|id| locate(grid, ex_queue, mem_queue, id));
        let waiting = self.hazards.mark_waiting(grid, ex_queue, mem_queue);
        if cleared > 0 || waiting > 0 {
            tracing::trace!(cycle = self.cycle, cleared, waiting, "dependencies checked");
        }
        let squashed = squash_intra_bundle(&mut self.grid, &mut self.ex_queue);
        self.stats.intra_bundle_squashes += squashed as u64;

        if self.hazards.data_hazard() {
            tracing::trace!(cycle = self.cycle, "front end frozen by data hazard");
            self.stats.stalls_data += 1;
        } else {
            let to_ex = self.ex_queue.advance(&mut self.grid, &mut self.arbiter);
            self.stats.ex_deferrals += to_ex.deferred as u64;
            self.decode();
            self.fetch(source);
        }

        if self.trace_pipeline {
            let in_flight =
                self.grid.occupancy() + self.ex_queue.occupancy() + self.mem_queue.occupancy();
            tracing::debug!(cycle = self.cycle, in_flight, "pipeline state\n{}", self.grid);
        }

        if self.is_idle() && !source.has_next() {
            self.stats.cycles = self.cycle;
            return TickOutcome::Drained;
        }
        self.cycle += 1;
        self.stats.cycles = self.cycle;
        TickOutcome::Running
    }

    /// Counts and removes every instruction in WB.
    fn retire(&mut self) {
        for lane in 0..self.grid.width() {
            if let Some(inst) = self.grid.take(lane, Stage::Writeback) {
                self.stats.record_retire(inst.class);
                self.hazards.forget(inst.id);
            }
        }
    }

    /// Moves IF into ID, recording the RAW hazards of each new instruction.
    fn decode(&mut self) {
        for lane in 0..self.grid.width() {
            if let Some(inst) = self.grid.take(lane, Stage::Fetch) {
                if self.hazards.mark_raw(&inst, &self.grid, &self.mem_queue) {
                    tracing::trace!(cycle = self.cycle, lane, %inst, "waits on a producer");
                }
                self.grid.place(lane, Stage::Decode, inst);
            }
        }
    }

    /// Fills IF from `source`, stopping after a branch.
    fn fetch<S: InstructionSource + ?Sized>(&mut self, source: &mut S) {
        if self.control_hazard {
            if source.has_next() {
                self.stats.stalls_control += 1;
            }
            return;
        }

        for lane in 0..self.grid.width() {
            let Some(mut inst) = source.next_instruction() else {
                break;
            };
            inst.id = InstId(self.next_id);
            self.next_id += 1;
            self.stats.instructions_fetched += 1;

            let is_branch = inst.class == InstClass::Branch;
            self.grid.place(lane, Stage::Fetch, inst);
            if is_branch {
                self.control_hazard = true;
                break;
            }
        }
    }

    /// Returns `true` if no instruction is in the grid or a stall queue.
    pub fn is_idle(&self) -> bool {
        self.grid.is_empty() && self.ex_queue.is_empty() && self.mem_queue.is_empty()
    }

    /// Where the instruction `id` currently is.
    pub fn position_of(&self, id: InstId) -> Position {
        locate(&self.grid, &self.ex_queue, &self.mem_queue, id)
    }

    /// The pipeline grid.
    pub const fn grid(&self) -> &PipelineGrid {
        &self.grid
    }

    /// The queue in front of EXECUTE.
    pub const fn ex_queue(&self) -> &StallQueue {
        &self.ex_queue
    }

    /// The queue in front of MEMORY.
    pub const fn mem_queue(&self) -> &StallQueue {
        &self.mem_queue
    }

    /// Pending producers and the data-hazard flag.
    pub const fn hazards(&self) -> &HazardUnit {
        &self.hazards
    }

    /// Returns `true` while an unresolved branch blocks fetch.
    pub const fn control_hazard(&self) -> bool {
        self.control_hazard
    }

    /// Returns `true` while the front end is frozen.
    pub const fn data_hazard(&self) -> bool {
        self.hazards.data_hazard()
    }

    /// Cycles counted so far.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Pipeline width.
    pub const fn width(&self) -> usize {
        self.grid.width()
    }

    /// Statistics gathered so far.
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Consumes the pipeline, returning its statistics.
    pub fn into_stats(self) -> SimStats {
        self.stats
    }
}

fn locate(
    grid: &PipelineGrid,
    ex_queue: &StallQueue,
    mem_queue: &StallQueue,
    id: InstId,
) -> Position {
    if let Some((_, stage)) = grid.locate(id) {
        Position::Stage(stage)
    } else if ex_queue.contains(id) {
        Position::ExecuteQueue
    } else if mem_queue.contains(id) {
        Position::MemoryQueue
    } else {
        Position::Retired
    }
}
