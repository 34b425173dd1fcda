//! Variational drivers.

pub mod qaoa;

pub use qaoa::{DriverPhase, Evaluation, MaxCutSolution, QaoaRunner};
