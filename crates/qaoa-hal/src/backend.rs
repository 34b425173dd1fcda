//! Backend trait and configuration.
//!
//! An [`ExecutionBackend`] is a stateless service from the caller's point
//! of view: hand it a terminated [`Program`], get back a [`Counts`]
//! distribution whose total equals the backend's configured shot count.
//!
//! ## Bit order
//!
//! Returned bitstrings follow the common hardware convention where the
//! rightmost character is line 0. Callers that index bitstrings by node
//! must reverse them first.

use serde::{Deserialize, Serialize};

use qaoa_ir::Program;

use crate::error::HalResult;
use crate::result::Counts;

/// Default number of shots per execution.
pub const DEFAULT_SHOTS: u32 = 1024;

/// Configuration for a backend instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// Shots per execution.
    #[serde(default = "default_shots")]
    pub shots: u32,
    /// Additional backend-specific configuration.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_shots() -> u32 {
    DEFAULT_SHOTS
}

impl BackendConfig {
    /// Create a new backend configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shots: DEFAULT_SHOTS,
            extra: serde_json::Map::new(),
        }
    }

    /// Set the shot count.
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// Add extra configuration.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Trait for program execution backends.
///
/// Execution is synchronous: `run` blocks until the counts are available.
/// It takes `&mut self` so that sampling backends can advance their
/// random state between calls.
pub trait ExecutionBackend {
    /// Get the backend name.
    fn name(&self) -> &str;

    /// Number of shots each call to [`run`](Self::run) samples.
    fn shots(&self) -> u32;

    /// Execute a terminated program and return its outcome distribution.
    fn run(&mut self, program: &Program) -> HalResult<Counts>;
}

impl<B: ExecutionBackend + ?Sized> ExecutionBackend for &mut B {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn shots(&self) -> u32 {
        (**self).shots()
    }

    fn run(&mut self, program: &Program) -> HalResult<Counts> {
        (**self).run(program)
    }
}

impl<B: ExecutionBackend + ?Sized> ExecutionBackend for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn shots(&self) -> u32 {
        (**self).shots()
    }

    fn run(&mut self, program: &Program) -> HalResult<Counts> {
        (**self).run(program)
    }
}

/// Trait for creating backends from configuration.
pub trait BackendFactory: ExecutionBackend + Sized {
    /// Create a backend from configuration.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HalError;

    struct Fixed(Counts);

    impl ExecutionBackend for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        fn shots(&self) -> u32 {
            self.0.total_shots() as u32
        }

        fn run(&mut self, program: &Program) -> HalResult<Counts> {
            if !program.is_terminated() {
                return Err(HalError::InvalidCircuit("no measurement".into()));
            }
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_config_defaults_from_json() {
        let config: BackendConfig =
            serde_json::from_str(r#"{"name": "simulator", "seed": 7}"#).unwrap();
        assert_eq!(config.name, "simulator");
        assert_eq!(config.shots, DEFAULT_SHOTS);
        assert_eq!(config.extra.get("seed").and_then(|v| v.as_u64()), Some(7));
        assert_eq!(
            config,
            BackendConfig::new("simulator").with_extra("seed", serde_json::json!(7))
        );
    }

    #[test]
    fn test_config_debug_shows_every_field() {
        let config = BackendConfig::new("sim")
            .with_shots(32)
            .with_extra("max_lines", serde_json::json!(6));
        let shown = format!("{config:?}");
        assert!(shown.starts_with("BackendConfig {"));
        assert!(shown.contains("\"sim\""));
        assert!(shown.contains("shots: 32"));
        assert!(shown.contains("max_lines"));
    }

    #[test]
    fn test_boxed_backend_delegates() {
        let counts: Counts = [("01", 2)].into_iter().collect();
        let mut backend: Box<dyn ExecutionBackend> = Box::new(Fixed(counts.clone()));
        assert_eq!(backend.name(), "fixed");
        assert_eq!(backend.shots(), 2);

        let mut program = Program::new("p", 2);
        assert!(matches!(
            backend.run(&program),
            Err(HalError::InvalidCircuit(_))
        ));
        program.measure_all().unwrap();
        assert_eq!(backend.run(&program).unwrap(), counts);
    }
}
