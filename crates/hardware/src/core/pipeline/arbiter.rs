//! Structural resource arbitration.
//!
//! Five resources are contended, one holder each per cycle:
//! 1. **Execute units:** integer ALU, floating-point unit, branch unit, claimed
//!    on the DECODE→EXECUTE transition.
//! 2. **Memory ports:** one read port and one write port, claimed on the
//!    EXECUTE→MEMORY transition.
//!
//! Lanes request in order (lane 0 first). The stall queues, not the arbiter,
//! implement "the first refused lane defers everything behind it".

use std::fmt;

use crate::core::pipeline::grid::Stage;
use crate::isa::InstClass;

/// A contended pipeline resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Integer ALU (EX).
    IntAlu,
    /// Floating-point unit (EX).
    Fpu,
    /// Branch unit (EX).
    BranchUnit,
    /// Data memory read port (MEM).
    ReadPort,
    /// Data memory write port (MEM).
    WritePort,
}

impl Resource {
    /// All resources.
    pub const ALL: [Self; 5] = [
        Self::IntAlu,
        Self::Fpu,
        Self::BranchUnit,
        Self::ReadPort,
        Self::WritePort,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    /// Returns `true` for the units claimed when entering EXECUTE.
    pub const fn is_execute_unit(self) -> bool {
        matches!(self, Self::IntAlu | Self::Fpu | Self::BranchUnit)
    }

    /// The resource an instruction of `class` must hold to enter `stage`.
    ///
    /// Returns `None` when entering `stage` needs no contended resource.
    pub const fn required_to_enter(class: InstClass, stage: Stage) -> Option<Self> {
        match (stage, class) {
            (Stage::Execute, InstClass::Integer) => Some(Self::IntAlu),
            (Stage::Execute, InstClass::Float) => Some(Self::Fpu),
            (Stage::Execute, InstClass::Branch) => Some(Self::BranchUnit),
            (Stage::Memory, InstClass::Load) => Some(Self::ReadPort),
            (Stage::Memory, InstClass::Store) => Some(Self::WritePort),
            _ => None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::IntAlu => "int-alu",
            Self::Fpu => "fpu",
            Self::BranchUnit => "branch-unit",
            Self::ReadPort => "read-port",
            Self::WritePort => "write-port",
        };
        f.write_str(name)
    }
}

/// Per-cycle busy flags for the five contended resources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceArbiter {
    busy: [bool; 5],
}

impl ResourceArbiter {
    /// Creates an arbiter with every resource free.
    pub const fn new() -> Self {
        Self { busy: [false; 5] }
    }

    /// Claims `resource` for the rest of the cycle.
    ///
    /// Returns `false`, leaving the flag untouched, if another lane already
    /// holds it.
    pub const fn try_acquire(&mut self, resource: Resource) -> bool {
        let flag = &mut self.busy[resource.index()];
        if *flag {
            return false;
        }
        *flag = true;
        true
    }

    /// Returns `true` if `resource` has been claimed this cycle.
    pub const fn is_busy(&self, resource: Resource) -> bool {
        self.busy[resource.index()]
    }

    /// Frees the integer, floating-point, and branch units.
    pub fn release_execute_units(&mut self) {
        for resource in Resource::ALL {
            if resource.is_execute_unit() {
                self.busy[resource.index()] = false;
            }
        }
    }

    /// Frees the memory read and write ports.
    pub fn release_memory_ports(&mut self) {
        for resource in Resource::ALL {
            if !resource.is_execute_unit() {
                self.busy[resource.index()] = false;
            }
        }
    }

    /// Frees every resource.
    pub const fn release_all(&mut self) {
        self.busy = [false; 5];
    }
}
