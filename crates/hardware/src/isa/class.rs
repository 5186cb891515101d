//! Instruction classes.
//!
//! The class is the only property of an instruction the pipeline model cares
//! about: it selects the execution resource an instruction competes for, the
//! stage at which its result becomes available to consumers, and the
//! statistics counter it retires into.

use std::fmt;

use crate::common::constants::{
    CLASS_CODE_BRANCH, CLASS_CODE_FLOAT, CLASS_CODE_INTEGER, CLASS_CODE_LOAD, CLASS_CODE_STORE,
};

/// Class of a dynamic instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InstClass {
    /// Integer ALU operation; uses the integer unit in EX.
    Integer,
    /// Floating-point operation; uses the floating-point unit in EX.
    Float,
    /// Conditional or unconditional branch; uses the branch unit in EX and
    /// blocks fetch until it is accepted into MEM.
    Branch,
    /// Memory load; uses the read port in MEM.
    Load,
    /// Memory store; uses the write port in MEM.
    Store,
    /// Anything else (nops, system instructions). Uses no contended resource.
    Other,
}

impl InstClass {
    /// All classes, in reporting order.
    pub const ALL: [Self; 6] = [
        Self::Integer,
        Self::Float,
        Self::Branch,
        Self::Load,
        Self::Store,
        Self::Other,
    ];

    /// Maps a trace type code to a class.
    ///
    /// Codes 1 through 5 name the five contended classes; every other code is
    /// [`InstClass::Other`].
    pub const fn from_code(code: u32) -> Self {
        match code {
            CLASS_CODE_INTEGER => Self::Integer,
            CLASS_CODE_FLOAT => Self::Float,
            CLASS_CODE_BRANCH => Self::Branch,
            CLASS_CODE_LOAD => Self::Load,
            CLASS_CODE_STORE => Self::Store,
            _ => Self::Other,
        }
    }

    /// Returns `true` for loads and stores.
    pub const fn is_memory(self) -> bool {
        matches!(self, Self::Load | Self::Store)
    }

    /// Short mnemonic used in pipeline dumps.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Integer => "INT",
            Self::Float => "FP",
            Self::Branch => "BR",
            Self::Load => "LD",
            Self::Store => "ST",
            Self::Other => "OP",
        }
    }
}

impl fmt::Display for InstClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
