//! Data Hazard Detection and Resolution.
//!
//! This module tracks read-after-write dependencies between in-flight
//! instructions. It provides:
//! 1. **Marking:** When an instruction enters DECODE, its producers that are
//!    still in EXECUTE or MEMORY are recorded in a pending set. A load or store
//!    waiting in the MEMORY stall queue counts as not having left MEMORY.
//! 2. **Clearance:** Each cycle, pending producers that have moved past the
//!    stage where their result becomes available are dropped.
//! 3. **Re-check:** Instructions still waiting to enter EXECUTE are marked
//!    again every cycle, which catches producers that reached EXECUTE after
//!    their consumer was decoded.
//! 4. **Intra-bundle squash:** Producers sharing a DECODE bundle with their
//!    consumer are pushed onto the EXECUTE stall queue.
//!
//! While any producer is pending the front end is frozen (`data_hazard`).

use std::collections::BTreeMap;

use crate::core::pipeline::grid::{PipelineGrid, Stage};
use crate::core::pipeline::stall_queue::StallQueue;
use crate::isa::{InstClass, InstId, Instruction};

/// Stage a producer of `class` must leave before its result can be consumed.
///
/// Integer and floating-point results are ready after EXECUTE; loads and stores
/// after MEMORY. Other classes never produce a tracked result.
pub const fn result_stage(class: InstClass) -> Option<Stage> {
    match class {
        InstClass::Integer | InstClass::Float => Some(Stage::Execute),
        InstClass::Load | InstClass::Store => Some(Stage::Memory),
        InstClass::Branch | InstClass::Other => None,
    }
}

/// An in-flight instruction some consumer is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Producer {
    /// Fetch sequence number.
    pub id: InstId,
    /// Program counter the consumer named.
    pub pc: u64,
    /// Producer class, which decides the pending set.
    pub class: InstClass,
}

impl From<&Instruction> for Producer {
    fn from(inst: &Instruction) -> Self {
        Self {
            id: inst.id,
            pc: inst.pc,
            class: inst.class,
        }
    }
}

/// Where a producer currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// In a grid stage.
    Stage(Stage),
    /// Waiting to enter EXECUTE.
    ExecuteQueue,
    /// Waiting to enter MEMORY.
    MemoryQueue,
    /// Retired, or otherwise no longer in the pipeline.
    Retired,
}

impl Position {
    /// Returns `true` once a producer at this position is past `required`.
    ///
    /// Queued producers have not cleared anything yet.
    pub fn has_cleared(self, required: Stage) -> bool {
        match self {
            Self::Stage(stage) => stage > required,
            Self::Retired => true,
            Self::ExecuteQueue | Self::MemoryQueue => false,
        }
    }
}

/// Pending-set bookkeeping and the `data_hazard` flag.
#[derive(Debug, Clone, Default)]
pub struct HazardUnit {
    ex_pending: BTreeMap<InstId, Producer>,
    mem_pending: BTreeMap<InstId, Producer>,
    data_hazard: bool,
}

impl HazardUnit {
    /// Creates a unit with no pending producers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the producers of `consumer` whose results are not ready yet.
    ///
    /// Integer and floating-point producers in EXECUTE join the EX-pending set.
    /// Loads and stores in EXECUTE, in MEMORY, or waiting in `mem_queue` join
    /// the MEM-pending set. Finding any such producer, new or already recorded,
    /// raises `data_hazard`.
    ///
    /// Returns `true` if a producer was found.
    pub fn mark_raw(
        &mut self,
        consumer: &Instruction,
        grid: &PipelineGrid,
        mem_queue: &StallQueue,
    ) -> bool {
        if !consumer.has_deps() {
            return false;
        }

        let in_grid = [Stage::Execute, Stage::Memory]
            .into_iter()
            .flat_map(|stage| grid.occupied(stage).map(move |(_, inst)| (stage, inst)));
        let queued = mem_queue
            .iter()
            .filter(|inst| inst.class.is_memory())
            .map(|inst| (Stage::Memory, inst));

        let mut found = false;
        for (stage, producer) in in_grid.chain(queued) {
            if !consumer.depends_on(producer.pc) {
                continue;
            }
            let Some(required) = result_stage(producer.class).filter(|&r| stage <= r) else {
                continue;
            };
            let set = if required == Stage::Execute {
                &mut self.ex_pending
            } else {
                &mut self.mem_pending
            };
            let _ = set
                .entry(producer.id)
                .or_insert_with(|| Producer::from(producer));
            tracing::trace!(consumer = %consumer, producer = %producer, %stage, "RAW hazard");
            found = true;
        }

        if found {
            self.data_hazard = true;
        }
        found
    }

    /// Marks again every instruction that is decoded but not yet in EXECUTE.
    ///
    /// This covers the DECODE stage and `ex_queue`. A producer squashed out
    /// of its consumer's bundle, or held in `ex_queue`, only reaches EXECUTE
    /// after the consumer's own check at decode. Returns the number of
    /// waiting instructions that still have a producer in flight.
    pub fn mark_waiting(
        &mut self,
        grid: &PipelineGrid,
        ex_queue: &StallQueue,
        mem_queue: &StallQueue,
    ) -> usize {
        grid.occupied(Stage::Decode)
            .map(|(_, inst)| inst)
            .chain(ex_queue.iter())
            .filter(|inst| self.mark_raw(inst, grid, mem_queue))
            .count()
    }

    /// Drops every pending producer that has cleared its result stage.
    ///
    /// `locate` reports where a producer is now. `data_hazard` is lowered once
    /// both sets are empty. Returns the number of entries dropped.
    pub fn clear_resolved(&mut self, locate: impl Fn(InstId) -> Position) -> usize {
        let before = self.pending_count();
        let unresolved = |id: &InstId, producer: &mut Producer| {
            result_stage(producer.class)
                .is_some_and(|required| !locate(*id).has_cleared(required))
        };
        self.ex_pending.retain(unresolved);
        self.mem_pending.retain(unresolved);
        let dropped = before - self.pending_count();

        if self.data_hazard && !self.has_pending() {
            tracing::trace!("data hazard resolved");
        }
        self.data_hazard = self.has_pending();
        dropped
    }

    /// Removes `id` from both pending sets.
    pub fn forget(&mut self, id: InstId) {
        let _ = self.ex_pending.remove(&id);
        let _ = self.mem_pending.remove(&id);
    }

    /// Returns `true` while the front end must stay frozen.
    pub const fn data_hazard(&self) -> bool {
        self.data_hazard
    }

    /// Returns `true` if either pending set is non-empty.
    pub fn has_pending(&self) -> bool {
        !self.ex_pending.is_empty() || !self.mem_pending.is_empty()
    }

    /// Returns `true` if `id` is in either pending set.
    pub fn is_pending(&self, id: InstId) -> bool {
        self.ex_pending.contains_key(&id) || self.mem_pending.contains_key(&id)
    }

    /// Total entries across both pending sets.
    pub fn pending_count(&self) -> usize {
        self.ex_pending.len() + self.mem_pending.len()
    }

    /// Producers whose results become available after EXECUTE, by id.
    pub fn ex_pending(&self) -> impl Iterator<Item = &Producer> + '_ {
        self.ex_pending.values()
    }

    /// Producers whose results become available after MEMORY, by id.
    pub fn mem_pending(&self) -> impl Iterator<Item = &Producer> + '_ {
        self.mem_pending.values()
    }
}

/// Pushes producers out of a DECODE bundle that also holds their consumers.
///
/// For every ordered lane pair (i, j), i ≠ j, if lane i depends on lane j's pc,
/// lane j is taken out of DECODE and appended to `ex_queue`. Returns the number
/// of instructions moved.
pub fn squash_intra_bundle(grid: &mut PipelineGrid, ex_queue: &mut StallQueue) -> usize {
    let width = grid.width();
    let mut squashed = 0;
    for i in 0..width {
        for j in 0..width {
            if i == j {
                continue;
            }
            let conflict = match (grid.get(i, Stage::Decode), grid.get(j, Stage::Decode)) {
                (Some(consumer), Some(producer)) => consumer.depends_on(producer.pc),
                _ => false,
            };
            if !conflict {
                continue;
            }
            if let Some(producer) = grid.take(j, Stage::Decode) {
                tracing::trace!(producer = %producer, lane = j, "intra-bundle squash");
                ex_queue.push(producer);
                squashed += 1;
            }
        }
    }
    squashed
}
