//! Stall queues and arbitrated stage transitions.
//!
//! Each arbitrated boundary (DECODE→EXECUTE and EXECUTE→MEMORY) owns a FIFO of
//! instructions that lost arbitration. Queued instructions always re-enter
//! ahead of the bundle that is advancing this cycle, and once a queue is in use
//! the whole advancing bundle joins it behind them, so issue order is never
//! violated.

use std::collections::VecDeque;
use std::fmt;

use crate::core::pipeline::arbiter::{Resource, ResourceArbiter};
use crate::core::pipeline::grid::{PipelineGrid, Stage};
use crate::core::pipeline::traits::PipelineLatch;
use crate::isa::{InstClass, InstId, Instruction};

/// An arbitrated stage boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// ID→EX, arbitrated on the execute units.
    DecodeToExecute,
    /// EX→MEM, arbitrated on the memory ports.
    ExecuteToMemory,
}

impl Transition {
    /// Stage instructions leave.
    pub const fn source(self) -> Stage {
        match self {
            Self::DecodeToExecute => Stage::Decode,
            Self::ExecuteToMemory => Stage::Execute,
        }
    }

    /// Stage instructions enter.
    pub const fn destination(self) -> Stage {
        match self {
            Self::DecodeToExecute => Stage::Execute,
            Self::ExecuteToMemory => Stage::Memory,
        }
    }

    /// Resource an instruction of `class` needs to cross this boundary.
    pub const fn resource_for(self, class: InstClass) -> Option<Resource> {
        Resource::required_to_enter(class, self.destination())
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source(), self.destination())
    }
}

/// What happened when a bundle crossed a boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Instructions placed in the destination stage.
    pub accepted: usize,
    /// Instructions taken from the queue (a subset of `accepted`).
    pub drained: usize,
    /// Instructions pushed onto the queue.
    pub deferred: usize,
    /// A branch was placed in the destination stage.
    pub branch_accepted: bool,
}

impl TransferOutcome {
    fn accept(&mut self, inst: &Instruction) {
        self.accepted += 1;
        self.branch_accepted |= inst.class == InstClass::Branch;
    }
}

/// FIFO of instructions waiting to cross one boundary.
#[derive(Debug, Clone)]
pub struct StallQueue {
    transition: Transition,
    entries: VecDeque<Instruction>,
    total_pushed: u64,
}

impl StallQueue {
    /// Creates an empty queue for `transition`.
    pub const fn new(transition: Transition) -> Self {
        Self {
            transition,
            entries: VecDeque::new(),
            total_pushed: 0,
        }
    }

    /// Appends `inst` behind every queued instruction.
    pub fn push(&mut self, inst: Instruction) {
        tracing::trace!(transition = %self.transition, inst = %inst, "deferred");
        self.entries.push_back(inst);
        self.total_pushed += 1;
    }

    /// Removes the oldest queued instruction.
    pub fn pop(&mut self) -> Option<Instruction> {
        self.entries.pop_front()
    }

    /// The oldest queued instruction.
    pub fn front(&self) -> Option<&Instruction> {
        self.entries.front()
    }

    /// Number of queued instructions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if the instruction `id` is waiting in this queue.
    pub fn contains(&self, id: InstId) -> bool {
        self.entries.iter().any(|inst| inst.id == id)
    }

    /// Iterates over queued instructions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Instruction> + '_ {
        self.entries.iter()
    }

    /// Instructions pushed over the queue's lifetime.
    pub const fn total_pushed(&self) -> u64 {
        self.total_pushed
    }

    /// Moves one bundle across this queue's boundary.
    ///
    /// 1. A non-empty queue drains first, into destination lanes 0, 1, ...,
    ///    until a resource is refused or the lanes run out. Into EXECUTE, the
    ///    drain also stops at an instruction that depends on one drained
    ///    ahead of it in the same cycle.
    /// 2. If the queue was non-empty, every instruction of the source bundle is
    ///    then pushed behind it and the source stage is cleared.
    /// 3. Otherwise each lane moves straight across; the first lane refused a
    ///    resource is pushed, together with every occupied lane after it.
    ///
    /// The destination stage must be all bubbles on entry.
    pub fn advance(
        &mut self,
        grid: &mut PipelineGrid,
        arbiter: &mut ResourceArbiter,
    ) -> TransferOutcome {
        let from = self.transition.source();
        let to = self.transition.destination();
        let width = grid.width();
        let mut outcome = TransferOutcome::default();

        if !self.entries.is_empty() {
            let mut drained_pcs = Vec::with_capacity(width);
            for lane in 0..width {
                let Some(front) = self.front() else {
                    break;
                };
                if self.orders_dependents() && drained_pcs.iter().any(|&pc| front.depends_on(pc)) {
                    tracing::trace!(inst = %front, "held behind its producer");
                    break;
                }
                let class = front.class;
                if !self.grant(arbiter, class) {
                    break;
                }
                if let Some(inst) = self.pop() {
                    drained_pcs.push(inst.pc);
                    outcome.accept(&inst);
                    outcome.drained += 1;
                    grid.place(lane, to, inst);
                }
            }
            outcome.deferred += self.defer_from(grid, 0);
            return outcome;
        }

        for lane in 0..width {
            let Some(class) = grid.get(lane, from).map(|inst| inst.class) else {
                continue;
            };
            if !self.grant(arbiter, class) {
                outcome.deferred += self.defer_from(grid, lane);
                break;
            }
            if let Some(inst) = grid.take(lane, from) {
                outcome.accept(&inst);
                grid.place(lane, to, inst);
            }
        }
        outcome
    }

    /// A consumer never enters EXECUTE in the same cycle as its producer.
    const fn orders_dependents(&self) -> bool {
        matches!(self.transition, Transition::DecodeToExecute)
    }

    fn grant(&self, arbiter: &mut ResourceArbiter, class: InstClass) -> bool {
        self.transition
            .resource_for(class)
            .is_none_or(|resource| arbiter.try_acquire(resource))
    }

    /// Pushes every occupied source lane from `first_lane` on, in lane order.
    fn defer_from(&mut self, grid: &mut PipelineGrid, first_lane: usize) -> usize {
        let from = self.transition.source();
        let mut deferred = 0;
        for lane in first_lane..grid.width() {
            if let Some(inst) = grid.take(lane, from) {
                self.push(inst);
                deferred += 1;
            }
        }
        deferred
    }
}

impl PipelineLatch for StallQueue {
    fn is_empty(&self) -> bool {
        Self::is_empty(self)
    }

    fn occupancy(&self) -> usize {
        self.entries.len()
    }
}
