//! Circuit builders.

pub mod qaoa;

pub use qaoa::{InitStrategy, ParameterBounds, QaoaAnsatz, qaoa_circuit};
