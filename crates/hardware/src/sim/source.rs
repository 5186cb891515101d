//! Instruction sources.
//!
//! The pipeline pulls instructions one at a time through [`InstructionSource`].
//! [`TraceSource`] is the trace-file implementation: the selected window of the
//! trace is parsed up front and handed out in order.
//!
//! Trace lines have the form `<pc>,<type>[,<dep pc>...]`: hexadecimal program
//! counters (an `0x` prefix is optional) and a decimal type code. Blank lines
//! and lines starting with `#` are ignored.

use std::collections::VecDeque;
use std::io::BufRead;

use crate::common::constants::{TRACE_COMMENT_MARKER, TRACE_FIELD_SEPARATOR};
use crate::common::error::TraceError;
use crate::isa::{InstClass, Instruction};

/// Supplies the pipeline with instructions in program order.
pub trait InstructionSource {
    /// Returns `true` if another instruction is available.
    fn has_next(&self) -> bool;

    /// Takes the next instruction, or `None` once the source is exhausted.
    fn next_instruction(&mut self) -> Option<Instruction>;
}

/// An in-memory, pre-parsed instruction trace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceSource {
    pending: VecDeque<Instruction>,
}

impl TraceSource {
    /// Wraps already-built instructions.
    pub fn from_instructions(instructions: impl IntoIterator<Item = Instruction>) -> Self {
        Self {
            pending: instructions.into_iter().collect(),
        }
    }

    /// Parses a window of a trace.
    ///
    /// `start` is the 1-based index of the first instruction to keep (0 is
    /// treated as 1) and at most `count` instructions are kept. Blank and
    /// comment lines do not count towards either. Lines before the window are
    /// not validated.
    ///
    /// # Errors
    ///
    /// * [`TraceError::Read`] if a line cannot be read or is not valid UTF-8.
    /// * [`TraceError::Malformed`] for an unparsable line inside the window.
    pub fn from_reader(
        reader: impl BufRead,
        start: usize,
        count: usize,
    ) -> Result<Self, TraceError> {
        let skip = start.saturating_sub(1);
        let mut pending = VecDeque::new();
        let mut seen = 0usize;

        for (index, line) in reader.lines().enumerate() {
            if pending.len() >= count {
                break;
            }
            let line = line.map_err(|source| TraceError::Read {
                line: index + 1,
                source,
            })?;
            let text = line.trim();
            if is_ignored(text) {
                continue;
            }
            seen += 1;
            if seen <= skip {
                continue;
            }
            pending.push_back(parse_line(index + 1, text)?);
        }

        tracing::debug!(start, loaded = pending.len(), "trace window parsed");
        Ok(Self { pending })
    }

    /// Instructions not yet handed out.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` once every instruction has been handed out.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl InstructionSource for TraceSource {
    fn has_next(&self) -> bool {
        !self.pending.is_empty()
    }

    fn next_instruction(&mut self) -> Option<Instruction> {
        self.pending.pop_front()
    }
}

fn is_ignored(text: &str) -> bool {
    text.is_empty() || text.starts_with(TRACE_COMMENT_MARKER)
}

/// Parses one non-blank, non-comment trace line.
///
/// `line` is the 1-based line number, used only for error reporting.
///
/// # Errors
///
/// Returns [`TraceError::Malformed`] for a bad pc, a missing or non-numeric
/// type, or a bad dependency.
pub fn parse_line(line: usize, text: &str) -> Result<Instruction, TraceError> {
    let malformed = |reason: String| TraceError::Malformed { line, reason };
    let mut fields = text.split(TRACE_FIELD_SEPARATOR).map(str::trim);

    let pc_field = fields.next().unwrap_or_default();
    let pc = parse_hex(pc_field).ok_or_else(|| malformed(format!("invalid pc `{pc_field}`")))?;

    let type_field = fields
        .next()
        .ok_or_else(|| malformed("missing instruction type".to_owned()))?;
    let code: i64 = type_field
        .parse()
        .map_err(|_| malformed(format!("invalid instruction type `{type_field}`")))?;
    let class = u32::try_from(code).map_or(InstClass::Other, InstClass::from_code);

    let deps = fields
        .filter(|field| !field.is_empty())
        .map(|field| {
            parse_hex(field).ok_or_else(|| malformed(format!("invalid dependency `{field}`")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Instruction::with_deps(pc, class, deps))
}

fn parse_hex(field: &str) -> Option<u64> {
    let digits = field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
        .unwrap_or(field);
    u64::from_str_radix(digits, 16).ok()
}
