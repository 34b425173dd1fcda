//! Program instructions combining an operation with its lines.

use serde::{Deserialize, Serialize};

use crate::line::LineId;

/// The kind of instruction in a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// Hadamard: puts a line into uniform superposition.
    H,
    /// Controlled-X (CNOT), the entangling operation.
    Cx,
    /// Phase rotation about Z.
    Rz(f64),
    /// Transverse rotation about X.
    Rx(f64),
    /// Structural grouping marker. Has no effect on execution.
    Barrier,
    /// Measurement of the listed lines.
    Measure,
}

impl InstructionKind {
    /// Get the operation name (lowercase, as emitted in QASM).
    pub fn name(&self) -> &'static str {
        match self {
            InstructionKind::H => "h",
            InstructionKind::Cx => "cx",
            InstructionKind::Rz(_) => "rz",
            InstructionKind::Rx(_) => "rx",
            InstructionKind::Barrier => "barrier",
            InstructionKind::Measure => "measure",
        }
    }

    /// Rotation angle, if this is a parameterized rotation.
    pub fn angle(&self) -> Option<f64> {
        match self {
            InstructionKind::Rz(theta) | InstructionKind::Rx(theta) => Some(*theta),
            _ => None,
        }
    }

    /// Whether this is a unitary gate (as opposed to a barrier or measurement).
    pub fn is_gate(&self) -> bool {
        matches!(
            self,
            InstructionKind::H | InstructionKind::Cx | InstructionKind::Rz(_) | InstructionKind::Rx(_)
        )
    }
}

/// A complete instruction with operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Lines this instruction operates on. For `Cx` the first is the control.
    pub lines: Vec<LineId>,
}

impl Instruction {
    /// Create a single-line instruction.
    pub fn single(kind: InstructionKind, line: LineId) -> Self {
        Self {
            kind,
            lines: vec![line],
        }
    }

    /// Create a CNOT instruction.
    pub fn cx(control: LineId, target: LineId) -> Self {
        Self {
            kind: InstructionKind::Cx,
            lines: vec![control, target],
        }
    }

    /// Create a barrier over the given lines.
    pub fn barrier(lines: impl IntoIterator<Item = LineId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            lines: lines.into_iter().collect(),
        }
    }

    /// Create a measurement over the given lines.
    pub fn measure(lines: impl IntoIterator<Item = LineId>) -> Self {
        Self {
            kind: InstructionKind::Measure,
            lines: lines.into_iter().collect(),
        }
    }

    /// Get the name of this instruction.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }

    /// Check if this is a barrier.
    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, InstructionKind::Barrier)
    }
}
