use std::collections::VecDeque;

use pipesim_core::isa::Instruction;
use pipesim_core::sim::source::InstructionSource;

/// Instruction source that counts how often the pipeline pulls from it.
#[derive(Debug, Default)]
pub struct MockSource {
    queue: VecDeque<Instruction>,
    pulls: usize,
}

impl MockSource {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self {
            queue: instructions.into(),
            pulls: 0,
        }
    }

    /// Instructions handed to the pipeline so far.
    pub fn pulls(&self) -> usize {
        self.pulls
    }

    /// Instructions not yet handed out.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl InstructionSource for MockSource {
    fn has_next(&self) -> bool {
        !self.queue.is_empty()
    }

    fn next_instruction(&mut self) -> Option<Instruction> {
        let inst = self.queue.pop_front()?;
        self.pulls += 1;
        Some(inst)
    }
}
