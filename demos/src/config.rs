//! Run configuration for the demo binary.
//!
//! Supports loading configuration from a YAML or JSON file. Command-line
//! flags are applied on top by the binary, so precedence is:
//! 1. Command-line flags
//! 2. Configuration file
//! 3. Default values
//!
//! ```yaml
//! graph: bipartite32
//! layers: 2
//! maxiter: 60
//! optimizer: spsa
//! seed: 7
//! backend:
//!   name: simulator
//!   shots: 2048
//!   max_lines: 16
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use qaoa_adapter_sim::SimulatorBackend;
use qaoa_hal::{BackendConfig, BackendFactory, HalError};
use qaoa_maxcut::{AnyMinimizer, Cobyla, Graph, InitStrategy, QaoaRunner, Spsa};

/// Graph names accepted by [`named_graph`].
pub const GRAPH_NAMES: &[&str] = &[
    "square4",
    "complete4",
    "ring6",
    "grid6",
    "bipartite32",
    "random8",
];

/// Configuration errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file could not be parsed.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A value is out of range or unknown.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The backend rejected its configuration.
    #[error(transparent)]
    Backend(#[from] HalError),
}

/// Which classical minimizer to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    /// Trust-region simplex.
    #[default]
    Cobyla,
    /// Simultaneous perturbation stochastic approximation.
    Spsa,
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizerKind::Cobyla => write!(f, "cobyla"),
            OptimizerKind::Spsa => write!(f, "spsa"),
        }
    }
}

/// A graph given by name or spelled out in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphSource {
    /// One of [`GRAPH_NAMES`].
    Named(String),
    /// An explicit node count and edge list.
    Custom(Graph),
}

impl Default for GraphSource {
    fn default() -> Self {
        GraphSource::Named("square4".into())
    }
}

/// Complete demo configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Problem graph.
    pub graph: GraphSource,
    /// Number of QAOA layers.
    pub layers: usize,
    /// Minimizer iteration budget.
    pub maxiter: usize,
    /// Classical minimizer.
    pub optimizer: OptimizerKind,
    /// Number of optimization starts.
    pub restarts: usize,
    /// Initialization strategy; graph-aware when unset.
    pub init_strategy: Option<InitStrategy>,
    /// Insert barriers between cost terms.
    pub barriers: bool,
    /// Seed for sampling, SPSA and random graphs.
    pub seed: Option<u64>,
    /// Execution backend settings.
    pub backend: BackendConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            graph: GraphSource::default(),
            layers: 1,
            maxiter: 100,
            optimizer: OptimizerKind::default(),
            restarts: 1,
            init_strategy: None,
            barriers: false,
            seed: None,
            backend: BackendConfig::new("simulator"),
        }
    }
}

impl RunConfig {
    /// Load configuration from a file; `.json` files are read as JSON,
    /// everything else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_yaml_str(&contents)
        }
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: RunConfig =
            serde_yaml_ng::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let config: RunConfig =
            serde_json::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layers == 0 {
            return Err(ConfigError::Invalid("layers must be at least 1".into()));
        }
        if self.restarts == 0 {
            return Err(ConfigError::Invalid("restarts must be at least 1".into()));
        }
        if self.backend.shots == 0 {
            return Err(ConfigError::Invalid("shots must be positive".into()));
        }
        if let GraphSource::Named(name) = &self.graph {
            if !GRAPH_NAMES.contains(&name.to_lowercase().as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "unknown graph '{name}', available: {}",
                    GRAPH_NAMES.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Resolve the problem graph.
    pub fn graph(&self) -> Result<Graph, ConfigError> {
        match &self.graph {
            GraphSource::Named(name) => named_graph(name, self.seed.unwrap_or(42)),
            GraphSource::Custom(graph) => Ok(graph.clone()),
        }
    }

    /// Build the configured minimizer.
    pub fn minimizer(&self) -> AnyMinimizer {
        match self.optimizer {
            OptimizerKind::Cobyla => AnyMinimizer::Cobyla(Cobyla::new().with_tol(1e-4)),
            OptimizerKind::Spsa => {
                let spsa = Spsa::new();
                AnyMinimizer::Spsa(match self.seed {
                    Some(seed) => spsa.with_seed(seed),
                    None => spsa,
                })
            }
        }
    }

    /// Build the runner for a resolved graph.
    pub fn runner(&self, graph: Graph) -> QaoaRunner<AnyMinimizer> {
        let runner = QaoaRunner::new(graph)
            .with_layers(self.layers)
            .with_maxiter(self.maxiter)
            .with_barriers(self.barriers)
            .with_minimizer(self.minimizer());
        match self.init_strategy {
            Some(strategy) => runner.with_init_strategy(strategy),
            None => runner,
        }
    }

    /// Build the simulator backend.
    ///
    /// A top-level `seed` applies unless the backend section sets its own.
    pub fn simulator(&self) -> Result<SimulatorBackend, ConfigError> {
        let mut backend = self.backend.clone();
        if let Some(seed) = self.seed {
            backend.extra.entry("seed").or_insert(seed.into());
        }
        debug!(name = %backend.name, shots = backend.shots, extra = ?backend.extra, "building simulator");
        Ok(SimulatorBackend::from_config(backend)?)
    }
}

/// Look up a named graph.
pub fn named_graph(name: &str, seed: u64) -> Result<Graph, ConfigError> {
    match name.to_lowercase().as_str() {
        "square4" => Ok(Graph::square_4()),
        "complete4" => Ok(Graph::complete_4()),
        "ring6" => Ok(Graph::ring_6()),
        "grid6" => Ok(Graph::grid_6()),
        "bipartite32" => Ok(Graph::bipartite_3_2()),
        "random8" => Ok(Graph::random(8, 0.5, seed)),
        _ => Err(ConfigError::Invalid(format!(
            "unknown graph '{name}', available: {}",
            GRAPH_NAMES.join(", ")
        ))),
    }
}
