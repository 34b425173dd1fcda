//! Circuit Program Representation
//!
//! This crate provides the data structures the MAXCUT-QAOA workflow hands to
//! an execution backend: a [`Program`] over a fixed number of register lines
//! and an ordered list of [`Instruction`]s.
//!
//! The instruction set is deliberately small. It covers exactly what the
//! QAOA ansatz needs:
//!
//! | Op | Lines | Description |
//! |----|-------|-------------|
//! | `H` | 1 | Uniform superposition |
//! | `Cx` | 2 | Entangling CNOT |
//! | `Rz(θ)` | 1 | Phase rotation |
//! | `Rx(θ)` | 1 | Transverse rotation |
//! | `Barrier` | any | Structural marker, no effect |
//! | `Measure` | all | Terminal measurement |
//!
//! # Example: a ZZ interaction
//!
//! ```rust
//! use qaoa_ir::{LineId, Program};
//!
//! let mut program = Program::new("zz", 2);
//! program.cx(LineId(0), LineId(1)).unwrap();
//! program.rz(0.5, LineId(1)).unwrap();
//! program.cx(LineId(0), LineId(1)).unwrap();
//! program.measure_all().unwrap();
//!
//! assert_eq!(program.len(), 4);
//! assert!(program.is_terminated());
//! ```

pub mod emitter;
pub mod error;
pub mod instruction;
pub mod line;
pub mod program;

pub use emitter::emit_qasm;
pub use error::{IrError, IrResult};
pub use instruction::{Instruction, InstructionKind};
pub use line::LineId;
pub use program::Program;
