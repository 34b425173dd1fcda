//! Error types for the IR crate.

use crate::line::LineId;
use thiserror::Error;

/// Errors that can occur while building a circuit program.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Register line not present in the program.
    #[error("Line {line} not found in program with {num_lines} lines{}", format_op_context(.op_name))]
    LineNotFound {
        /// The line that was not found.
        line: LineId,
        /// Number of lines the program was created with.
        num_lines: u32,
        /// Optional operation name for context.
        op_name: Option<String>,
    },

    /// The same line was used twice by a multi-line operation.
    #[error("Duplicate line {line} in operation{}", format_op_context(.op_name))]
    DuplicateLine {
        /// The duplicate line.
        line: LineId,
        /// Optional operation name for context.
        op_name: Option<String>,
    },

    /// An instruction was appended after the terminal measurement.
    #[error("Cannot append '{0}' after the final measurement")]
    AfterMeasure(String),
}

#[allow(clippy::ref_option)]
fn format_op_context(op_name: &Option<String>) -> String {
    match op_name {
        Some(name) => format!(" (op: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
