//! Execution Backend Abstraction
//!
//! This crate defines the narrow capability the MAXCUT-QAOA driver needs
//! from a quantum execution engine: run a [`qaoa_ir::Program`] and return
//! measurement [`Counts`].
//!
//! ```rust
//! use qaoa_hal::{Counts, ExecutionBackend, HalResult};
//! use qaoa_ir::Program;
//!
//! struct AlwaysZero;
//!
//! impl ExecutionBackend for AlwaysZero {
//!     fn name(&self) -> &str { "zero" }
//!     fn shots(&self) -> u32 { 10 }
//!     fn run(&mut self, program: &Program) -> HalResult<Counts> {
//!         let mut counts = Counts::new();
//!         counts.insert("0".repeat(program.num_lines()), 10);
//!         Ok(counts)
//!     }
//! }
//! ```

pub mod backend;
pub mod error;
pub mod result;

pub use backend::{BackendConfig, BackendFactory, DEFAULT_SHOTS, ExecutionBackend};
pub use error::{HalError, HalResult};
pub use result::Counts;
