//! Local Statevector Simulator
//!
//! An [`ExecutionBackend`](qaoa_hal::ExecutionBackend) for testing and
//! small experiments. It evolves the exact statevector once per program
//! and samples the configured number of shots from it, so results carry
//! the same shot noise a device would report.
//!
//! # Performance
//!
//! | Lines | Memory | Simulation Speed |
//! |-------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//!
//! # Example
//!
//! ```rust
//! use qaoa_adapter_sim::SimulatorBackend;
//! use qaoa_hal::ExecutionBackend;
//! use qaoa_ir::{LineId, Program};
//!
//! let mut program = Program::new("pair", 2);
//! program.h(LineId(0)).unwrap();
//! program.cx(LineId(0), LineId(1)).unwrap();
//! program.measure_all().unwrap();
//!
//! let mut backend = SimulatorBackend::new().with_shots(100).with_seed(1);
//! let counts = backend.run(&program).unwrap();
//! assert_eq!(counts.get("00") + counts.get("11"), 100);
//! ```

mod simulator;
mod statevector;

pub use simulator::{DEFAULT_MAX_LINES, MAX_LINES_LIMIT, SimulatorBackend};
