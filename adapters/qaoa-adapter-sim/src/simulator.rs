//! Simulator backend implementation.

use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, instrument};

use qaoa_hal::{BackendConfig, BackendFactory, Counts, ExecutionBackend, HalError, HalResult};
use qaoa_ir::Program;

use crate::statevector::Statevector;

/// Largest register the simulator accepts by default.
pub const DEFAULT_MAX_LINES: u32 = 20;

/// Hard ceiling on `max_lines`; the state holds `2^max_lines` amplitudes.
pub const MAX_LINES_LIMIT: u32 = 30;

/// Local simulator backend.
///
/// This backend simulates programs using a statevector simulation and
/// samples `shots` outcomes from the final state. It supports programs up
/// to ~20 lines (limited by memory).
pub struct SimulatorBackend {
    /// Backend configuration.
    config: BackendConfig,
    /// Maximum number of lines supported.
    max_lines: u32,
    /// Sampling source; seeded when reproducibility is requested.
    rng: StdRng,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self {
            config: BackendConfig::new("simulator"),
            max_lines: DEFAULT_MAX_LINES,
            rng: StdRng::from_entropy(),
        }
    }

    /// Set the shots per execution.
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.config.shots = shots;
        self
    }

    /// Make sampling reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Set the largest accepted register, capped at [`MAX_LINES_LIMIT`].
    pub fn with_max_lines(mut self, max_lines: u32) -> Self {
        self.max_lines = max_lines.min(MAX_LINES_LIMIT);
        self
    }

    fn validate(&self, program: &Program) -> HalResult<()> {
        if program.num_lines() > self.max_lines as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Program has {} lines but simulator only supports {}",
                program.num_lines(),
                self.max_lines
            )));
        }
        if !program.is_terminated() {
            return Err(HalError::InvalidCircuit(format!(
                "Program '{}' has no terminal measurement",
                program.name()
            )));
        }
        if self.config.shots == 0 {
            return Err(HalError::InvalidShots("shot count must be positive".into()));
        }
        Ok(())
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionBackend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn shots(&self) -> u32 {
        self.config.shots
    }

    #[instrument(skip(self, program), fields(program = program.name()))]
    fn run(&mut self, program: &Program) -> HalResult<Counts> {
        self.validate(program)?;
        let start = Instant::now();
        let shots = self.config.shots;

        debug!(
            "Starting simulation: {} lines, {} instructions, {} shots",
            program.num_lines(),
            program.len(),
            shots
        );

        let mut sv = Statevector::new(program.num_lines());
        for inst in program.instructions() {
            sv.apply(inst);
        }

        let mut counts = Counts::new();
        for _ in 0..shots {
            let outcome = sv.sample(&mut self.rng);
            counts.insert(sv.outcome_to_bitstring(outcome), 1);
        }

        debug!("Simulation completed in {:?}", start.elapsed());
        Ok(counts)
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_lines = match config.extra.get("max_lines") {
            None => DEFAULT_MAX_LINES,
            Some(value) => value
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .filter(|&v| v <= MAX_LINES_LIMIT)
                .ok_or_else(|| {
                    HalError::Configuration(format!(
                        "max_lines must be an integer in 0..={MAX_LINES_LIMIT}, got {value}"
                    ))
                })?,
        };

        let rng = match config.extra.get("seed") {
            None => StdRng::from_entropy(),
            Some(value) => {
                let seed = value.as_u64().ok_or_else(|| {
                    HalError::Configuration(format!("seed must be a non-negative integer, got {value}"))
                })?;
                StdRng::seed_from_u64(seed)
            }
        };

        Ok(Self {
            config,
            max_lines,
            rng,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qaoa_ir::LineId;

    fn entangled_pair() -> Program {
        let mut program = Program::new("pair", 2);
        program.h(LineId(0)).unwrap();
        program.cx(LineId(0), LineId(1)).unwrap();
        program.measure_all().unwrap();
        program
    }

    #[test]
    fn test_simulator_entangled_pair() {
        let mut backend = SimulatorBackend::new().with_shots(1000);
        let counts = backend.run(&entangled_pair()).unwrap();

        assert_eq!(counts.total_shots(), 1000);
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
    }

    #[test]
    fn test_simulator_line_zero_is_rightmost() {
        let mut program = Program::new("flip", 3);
        program.rx(std::f64::consts::PI, LineId(0)).unwrap();
        program.measure_all().unwrap();

        let mut backend = SimulatorBackend::new().with_shots(20);
        let counts = backend.run(&program).unwrap();
        assert_eq!(counts.get("001"), 20);
    }

    #[test]
    fn test_simulator_seeded_is_reproducible() {
        let mut a = SimulatorBackend::new().with_seed(7).with_shots(200);
        let mut b = SimulatorBackend::new().with_seed(7).with_shots(200);
        let program = entangled_pair();
        assert_eq!(a.run(&program).unwrap(), b.run(&program).unwrap());
    }

    #[test]
    fn test_simulator_too_many_lines() {
        let mut backend = SimulatorBackend::new().with_max_lines(5);
        let mut program = Program::new("wide", 10);
        program.measure_all().unwrap();

        assert!(matches!(
            backend.run(&program),
            Err(HalError::CircuitTooLarge(_))
        ));
    }

    #[test]
    fn test_simulator_rejects_unmeasured() {
        let mut backend = SimulatorBackend::new();
        let program = Program::new("open", 2);
        assert!(matches!(
            backend.run(&program),
            Err(HalError::InvalidCircuit(_))
        ));
    }

    #[test]
    fn test_simulator_rejects_zero_shots() {
        let mut backend = SimulatorBackend::new().with_shots(0);
        assert!(matches!(
            backend.run(&entangled_pair()),
            Err(HalError::InvalidShots(_))
        ));
    }

    #[test]
    fn test_from_config() {
        let config = BackendConfig::new("sim")
            .with_shots(64)
            .with_extra("max_lines", serde_json::json!(4))
            .with_extra("seed", serde_json::json!(3));
        let backend = SimulatorBackend::from_config(config).unwrap();
        assert_eq!(backend.name(), "sim");
        assert_eq!(backend.shots(), 64);
        assert_eq!(backend.max_lines, 4);

        let bad = BackendConfig::new("sim").with_extra("seed", serde_json::json!("abc"));
        assert!(matches!(
            SimulatorBackend::from_config(bad),
            Err(HalError::Configuration(_))
        ));
    }

    #[test]
    fn test_from_config_rejects_oversized_max_lines() {
        for value in [
            serde_json::json!(u64::from(u32::MAX) + 5),
            serde_json::json!(MAX_LINES_LIMIT + 1),
            serde_json::json!(-3),
        ] {
            let config = BackendConfig::new("sim").with_extra("max_lines", value);
            assert!(matches!(
                SimulatorBackend::from_config(config),
                Err(HalError::Configuration(_))
            ));
        }
    }

    #[test]
    fn test_with_max_lines_is_capped() {
        let backend = SimulatorBackend::new().with_max_lines(64);
        assert_eq!(backend.max_lines, MAX_LINES_LIMIT);
    }

    #[test]
    fn test_simulator_empty_register() {
        let mut program = Program::new("empty", 0);
        program.measure_all().unwrap();

        let mut backend = SimulatorBackend::new().with_shots(8).with_seed(1);
        let counts = backend.run(&program).unwrap();
        assert_eq!(counts.get(""), 8);
        assert_eq!(counts.len(), 1);
    }
}
