//! MAXCUT-QAOA
//!
//! Approximate Max-Cut with the Quantum Approximate Optimization Algorithm:
//!
//! - [`problems`]: the [`Graph`] problem instance, named test graphs and an
//!   exact brute-force reference.
//! - [`circuits`]: the depth-p ansatz and parameter initialization.
//! - [`objective`]: cut value, energy estimate and best-outcome selection
//!   over measured counts.
//! - [`optimizers`]: derivative-free minimizers.
//! - [`runners`]: the variational driver tying them to an
//!   [`ExecutionBackend`](qaoa_hal::ExecutionBackend).
//!
//! ```rust
//! use qaoa_maxcut::{Graph, cut_value};
//!
//! let graph = Graph::bipartite_3_2();
//! assert_eq!(cut_value("11100", &graph).unwrap(), -6);
//! ```

pub mod circuits;
pub mod error;
pub mod objective;
pub mod optimizers;
pub mod problems;
pub mod runners;

pub use circuits::{InitStrategy, ParameterBounds, QaoaAnsatz, qaoa_circuit};
pub use error::{GraphError, QaoaError, QaoaResult};
pub use objective::{best_outcome, cut_size, cut_value, energy, normalize_bit_order};
pub use optimizers::{AnyMinimizer, Cobyla, Minimizer, OptimizationResult, Spsa, TerminationStatus};
pub use problems::Graph;
pub use runners::{DriverPhase, Evaluation, MaxCutSolution, QaoaRunner};
