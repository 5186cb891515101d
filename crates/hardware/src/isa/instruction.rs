//! Dynamic instruction descriptor.
//!
//! An [`Instruction`] is one dynamic instance of a trace entry. It is created
//! by the instruction source, stamped with an [`InstId`] when it is admitted
//! into FETCH, and dropped when it retires from WRITEBACK.

use std::fmt;

use super::class::InstClass;

/// Fetch-order sequence number of a dynamic instruction.
///
/// Ids are unique for the whole run, unlike program counters, which repeat
/// whenever the trace revisits an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct InstId(pub u64);

impl fmt::Display for InstId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A dynamic instruction as seen by the pipeline model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Sequence number assigned at fetch.
    pub id: InstId,
    /// Static address label of the instruction in the trace.
    pub pc: u64,
    /// Instruction class.
    pub class: InstClass,
    /// Program counters of the instructions producing this one's operands.
    pub deps: Vec<u64>,
}

impl Instruction {
    /// Creates an instruction with no dependencies.
    ///
    /// The id is left at zero; the fetch stage assigns the real one.
    pub const fn new(pc: u64, class: InstClass) -> Self {
        Self {
            id: InstId(0),
            pc,
            class,
            deps: Vec::new(),
        }
    }

    /// Creates an instruction that depends on the given producer pcs.
    pub fn with_deps(pc: u64, class: InstClass, deps: impl Into<Vec<u64>>) -> Self {
        Self {
            id: InstId(0),
            pc,
            class,
            deps: deps.into(),
        }
    }

    /// Returns `true` if `producer_pc` is one of this instruction's producers.
    pub fn depends_on(&self, producer_pc: u64) -> bool {
        self.deps.contains(&producer_pc)
    }

    /// Returns `true` if the instruction declares any dependency.
    pub fn has_deps(&self) -> bool {
        !self.deps.is_empty()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:x}{}", self.class, self.pc, self.id)
    }
}
