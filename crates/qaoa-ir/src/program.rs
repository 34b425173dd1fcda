//! High-level program builder API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};
use crate::line::LineId;

/// A circuit program: a fixed set of register lines and an ordered
/// instruction list.
///
/// Once [`Program::measure_all`] has been applied the program is terminated
/// and further appends fail with [`IrError::AfterMeasure`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Name of the program.
    name: String,
    /// Number of register lines.
    num_lines: u32,
    /// Instructions in application order.
    instructions: Vec<Instruction>,
}

impl Program {
    /// Create an empty program over `num_lines` lines.
    pub fn new(name: impl Into<String>, num_lines: u32) -> Self {
        Self {
            name: name.into(),
            num_lines,
            instructions: vec![],
        }
    }

    // =========================================================================
    // Single-line operations
    // =========================================================================

    /// Apply a Hadamard gate.
    pub fn h(&mut self, line: LineId) -> IrResult<&mut Self> {
        self.push(Instruction::single(InstructionKind::H, line))
    }

    /// Apply an Rz rotation.
    pub fn rz(&mut self, theta: f64, line: LineId) -> IrResult<&mut Self> {
        self.push(Instruction::single(InstructionKind::Rz(theta), line))
    }

    /// Apply an Rx rotation.
    pub fn rx(&mut self, theta: f64, line: LineId) -> IrResult<&mut Self> {
        self.push(Instruction::single(InstructionKind::Rx(theta), line))
    }

    // =========================================================================
    // Two-line operations
    // =========================================================================

    /// Apply a CNOT (CX) gate.
    pub fn cx(&mut self, control: LineId, target: LineId) -> IrResult<&mut Self> {
        self.push(Instruction::cx(control, target))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply a barrier to all lines.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let lines: Vec<_> = self.lines().collect();
        self.push(Instruction::barrier(lines))
    }

    /// Measure all lines. This terminates the program.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        let lines: Vec<_> = self.lines().collect();
        self.push(Instruction::measure(lines))
    }

    fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        if self.is_terminated() {
            return Err(IrError::AfterMeasure(instruction.name().to_string()));
        }
        self.validate(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let op_name = || Some(instruction.name().to_string());
        for (pos, line) in instruction.lines.iter().enumerate() {
            if line.0 >= self.num_lines {
                return Err(IrError::LineNotFound {
                    line: *line,
                    num_lines: self.num_lines,
                    op_name: op_name(),
                });
            }
            if instruction.lines[..pos].contains(line) {
                return Err(IrError::DuplicateLine {
                    line: *line,
                    op_name: op_name(),
                });
            }
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the program name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of register lines.
    pub fn num_lines(&self) -> usize {
        self.num_lines as usize
    }

    /// Iterate over all line identifiers.
    pub fn lines(&self) -> impl Iterator<Item = LineId> {
        (0..self.num_lines).map(LineId)
    }

    /// Get the instructions in application order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Total number of instructions (barriers and the measurement included).
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Whether the program ends with a full measurement.
    pub fn is_terminated(&self) -> bool {
        self.instructions.last().is_some_and(Instruction::is_measure)
    }

    /// Count instructions by operation name.
    pub fn count_ops(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for inst in &self.instructions {
            *counts.entry(inst.name()).or_insert(0) += 1;
        }
        counts
    }
}
