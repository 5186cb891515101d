//! Pipeline grid.
//!
//! The grid is the W-lane × 5-stage matrix of instruction slots that the cycle
//! stepper advances once per cycle. Storage is stage-major so a whole bundle
//! (one stage across every lane) is a contiguous slice.

use std::array;
use std::fmt;

use crate::common::constants::NUM_STAGES;
use crate::core::pipeline::traits::PipelineLatch;
use crate::isa::{InstId, Instruction};

/// The five pipeline stages, in program-flow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Instruction fetch (IF).
    Fetch,
    /// Instruction decode (ID).
    Decode,
    /// Execute (EX).
    Execute,
    /// Memory access (MEM).
    Memory,
    /// Writeback (WB).
    Writeback,
}

impl Stage {
    /// All stages, in program-flow order.
    pub const ALL: [Self; NUM_STAGES] = [
        Self::Fetch,
        Self::Decode,
        Self::Execute,
        Self::Memory,
        Self::Writeback,
    ];

    /// Position of the stage within the pipeline (0 for IF).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Conventional short name (IF, ID, EX, MEM, WB).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fetch => "IF",
            Self::Decode => "ID",
            Self::Execute => "EX",
            Self::Memory => "MEM",
            Self::Writeback => "WB",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One cell of the grid. `None` is a bubble.
pub type Slot = Option<Instruction>;

/// W lanes × 5 stages of instruction slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineGrid {
    width: usize,
    stages: [Vec<Slot>; NUM_STAGES],
}

impl PipelineGrid {
    /// Creates an all-bubble grid with `width` lanes.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            stages: array::from_fn(|_| vec![None; width]),
        }
    }

    /// Number of lanes.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// The bundle occupying `stage`, indexed by lane.
    pub fn bundle(&self, stage: Stage) -> &[Slot] {
        &self.stages[stage.index()]
    }

    /// The instruction at (`lane`, `stage`), if any.
    pub fn get(&self, lane: usize, stage: Stage) -> Option<&Instruction> {
        self.stages[stage.index()].get(lane).and_then(Option::as_ref)
    }

    /// Removes and returns the instruction at (`lane`, `stage`), leaving a bubble.
    pub fn take(&mut self, lane: usize, stage: Stage) -> Option<Instruction> {
        self.stages[stage.index()]
            .get_mut(lane)
            .and_then(Option::take)
    }

    /// Puts `inst` into (`lane`, `stage`).
    ///
    /// The target slot must hold a bubble: an instruction never overwrites
    /// another one.
    pub fn place(&mut self, lane: usize, stage: Stage, inst: Instruction) {
        let slot = &mut self.stages[stage.index()][lane];
        debug_assert!(slot.is_none(), "lane {lane} of {stage} is occupied");
        *slot = Some(inst);
    }

    /// Moves every lane of `from` into the same lane of `to`.
    ///
    /// Used for the transitions that can never stall (IF→ID, MEM→WB).
    pub fn shift(&mut self, from: Stage, to: Stage) {
        for lane in 0..self.width {
            if let Some(inst) = self.take(lane, from) {
                self.place(lane, to, inst);
            }
        }
    }

    /// Iterates over the occupied lanes of `stage`.
    pub fn occupied(&self, stage: Stage) -> impl Iterator<Item = (usize, &Instruction)> + '_ {
        self.stages[stage.index()]
            .iter()
            .enumerate()
            .filter_map(|(lane, slot)| slot.as_ref().map(|inst| (lane, inst)))
    }

    /// Finds the lane and stage currently holding the instruction `id`.
    pub fn locate(&self, id: InstId) -> Option<(usize, Stage)> {
        Stage::ALL.into_iter().find_map(|stage| {
            self.occupied(stage)
                .find(|(_, inst)| inst.id == id)
                .map(|(lane, _)| (lane, stage))
        })
    }

    /// Returns `true` if every lane of `stage` is a bubble.
    pub fn is_stage_empty(&self, stage: Stage) -> bool {
        self.stages[stage.index()].iter().all(Option::is_none)
    }
}

impl PipelineLatch for PipelineGrid {
    fn is_empty(&self) -> bool {
        self.stages.iter().flatten().all(Option::is_none)
    }

    fn occupancy(&self) -> usize {
        self.stages.iter().flatten().filter(|slot| slot.is_some()).count()
    }
}

impl fmt::Display for PipelineGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "        |")?;
        for stage in Stage::ALL {
            write!(f, " {:<14}", stage.name())?;
        }
        writeln!(f)?;
        for lane in 0..self.width {
            write!(f, "lane {lane:>2} |")?;
            for stage in Stage::ALL {
                match self.get(lane, stage) {
                    Some(inst) => write!(f, " {:<14}", inst.to_string())?,
                    None => write!(f, " {:<14}", "--")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
