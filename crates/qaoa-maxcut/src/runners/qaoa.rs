//! QAOA (Quantum Approximate Optimization Algorithm) runner.
//!
//! The runner wires circuit assembly, backend execution, bit-order
//! normalization and the energy estimate into one objective, hands it to a
//! [`Minimizer`], and samples the optimized circuit once more to pick a cut.
//!
//! ```text
//!   Init ──→ Optimizing ──→ Done
//! ```
//!
//! A minimizer that runs out of budget still leads to `Done`; only backend
//! and circuit errors abort a run.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use qaoa_hal::{Counts, ExecutionBackend};

use crate::circuits::qaoa::{
    InitStrategy, ParameterBounds, QaoaAnsatz, flatten_parameters,
    graph_aware_initial_parameters, initial_parameters_with_strategy, num_parameters,
    random_parameters,
};
use crate::error::{QaoaError, QaoaResult};
use crate::objective::{best_outcome, energy, normalize_bit_order};
use crate::optimizers::{Cobyla, Minimizer, TerminationStatus};
use crate::problems::Graph;

/// Phase of a driver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    /// Building the objective.
    Init,
    /// The minimizer owns the loop.
    Optimizing,
    /// Final sampling and solution selection.
    Done,
}

impl fmt::Display for DriverPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverPhase::Init => write!(f, "init"),
            DriverPhase::Optimizing => write!(f, "optimizing"),
            DriverPhase::Done => write!(f, "done"),
        }
    }
}

/// One objective evaluation, as reported to a progress callback.
#[derive(Debug, Clone, Copy)]
pub struct Evaluation<'a> {
    /// Zero-based evaluation index.
    pub index: usize,
    /// Parameter vector θ = [β, γ].
    pub theta: &'a [f64],
    /// Estimated energy at θ.
    pub energy: f64,
}

/// Result of a QAOA run.
#[derive(Debug, Clone, Serialize)]
pub struct MaxCutSolution {
    /// Best node-ordered bitstring (character i is node i).
    pub best_bitstring: String,
    /// Signed cut value of the best bitstring (`<= 0`).
    pub cut_value: i64,
    /// Number of edges cut by the best bitstring.
    pub cut_size: usize,
    /// Nodes marked `1` in the best bitstring.
    pub set_s: Vec<usize>,
    /// Nodes marked `0` in the best bitstring.
    pub set_t: Vec<usize>,
    /// Optimal beta parameters.
    pub optimal_beta: Vec<f64>,
    /// Optimal gamma parameters.
    pub optimal_gamma: Vec<f64>,
    /// Energy of the final sample.
    pub final_energy: f64,
    /// Best objective value the minimizer saw.
    pub optimal_value: f64,
    /// Minimizer iterations.
    pub iterations: usize,
    /// Number of circuit evaluations, final sample included.
    pub circuit_evaluations: usize,
    /// Why the minimizer stopped.
    pub status: TerminationStatus,
    /// Best energy after each minimizer improvement.
    pub energy_history: Vec<f64>,
    /// `cut_size / max_cut`, when the exact optimum is computable.
    pub approximation_ratio: Option<f64>,
    /// Normalized counts of the final sample.
    pub counts: Counts,
}

/// QAOA runner configuration.
#[derive(Debug, Clone)]
pub struct QaoaRunner<M = Cobyla> {
    /// The graph to optimize.
    pub graph: Graph,
    /// Number of QAOA layers.
    pub p: usize,
    /// Minimizer iteration budget.
    pub maxiter: usize,
    /// Initialization strategy.
    pub init_strategy: InitStrategy,
    /// Use graph-aware initialization.
    pub use_graph_aware_init: bool,
    /// Bounds applied to the initial parameters.
    pub bounds: Option<ParameterBounds>,
    /// Insert barriers between cost terms.
    pub barriers: bool,
    /// The classical minimizer.
    pub minimizer: M,
}

impl QaoaRunner<Cobyla> {
    /// Create a new QAOA runner with a COBYLA minimizer.
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            p: 1,
            maxiter: 100,
            init_strategy: InitStrategy::TrotterizedAdiabatic,
            use_graph_aware_init: true,
            bounds: Some(ParameterBounds::tight()),
            barriers: false,
            minimizer: Cobyla::new().with_tol(1e-4),
        }
    }
}

impl<M: Minimizer> QaoaRunner<M> {
    /// Replace the minimizer.
    pub fn with_minimizer<N: Minimizer>(self, minimizer: N) -> QaoaRunner<N> {
        QaoaRunner {
            graph: self.graph,
            p: self.p,
            maxiter: self.maxiter,
            init_strategy: self.init_strategy,
            use_graph_aware_init: self.use_graph_aware_init,
            bounds: self.bounds,
            barriers: self.barriers,
            minimizer,
        }
    }

    /// Set the number of QAOA layers.
    pub fn with_layers(mut self, p: usize) -> Self {
        self.p = p;
        self
    }

    /// Set maximum iterations.
    pub fn with_maxiter(mut self, maxiter: usize) -> Self {
        self.maxiter = maxiter;
        self
    }

    /// Set the initialization strategy (disables graph-aware init).
    pub fn with_init_strategy(mut self, strategy: InitStrategy) -> Self {
        self.init_strategy = strategy;
        self.use_graph_aware_init = false;
        self
    }

    /// Enable or disable graph-aware initialization.
    pub fn with_graph_aware_init(mut self, enabled: bool) -> Self {
        self.use_graph_aware_init = enabled;
        self
    }

    /// Set parameter bounds.
    pub fn with_bounds(mut self, bounds: ParameterBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Disable parameter bounds.
    pub fn without_bounds(mut self) -> Self {
        self.bounds = None;
        self
    }

    /// Insert barriers between cost terms.
    pub fn with_barriers(mut self, barriers: bool) -> Self {
        self.barriers = barriers;
        self
    }

    /// Get the number of parameters needed.
    pub fn num_parameters(&self) -> usize {
        num_parameters(self.p)
    }

    /// The starting θ for [`run`](Self::run).
    pub fn initial_params(&self) -> Vec<f64> {
        let (beta, gamma) = if self.use_graph_aware_init {
            graph_aware_initial_parameters(&self.graph, self.p)
        } else {
            initial_parameters_with_strategy(self.p, self.init_strategy)
        };
        let mut theta = flatten_parameters(&beta, &gamma);
        if let Some(ref bounds) = self.bounds {
            bounds.clip(&mut theta, self.p);
        }
        theta
    }

    fn ansatz(&self) -> QaoaAnsatz<'_> {
        QaoaAnsatz::new(&self.graph, self.p).with_barriers(self.barriers)
    }

    /// Execute the circuit for θ and return node-ordered counts.
    pub fn sample<B: ExecutionBackend>(&self, backend: &mut B, theta: &[f64]) -> QaoaResult<Counts> {
        sample_with(&self.ansatz(), backend, theta)
    }

    /// Estimate the energy at θ (one backend execution).
    pub fn evaluate<B: ExecutionBackend>(&self, backend: &mut B, theta: &[f64]) -> QaoaResult<f64> {
        let counts = self.sample(backend, theta)?;
        energy(&counts, &self.graph)
    }

    /// Run QAOA with automatic initial parameters.
    pub fn run<B: ExecutionBackend>(&self, backend: &mut B) -> QaoaResult<MaxCutSolution> {
        self.drive(backend, self.initial_params(), &mut |_: &Evaluation<'_>| {})
    }

    /// Run QAOA, reporting every objective evaluation to `callback`.
    pub fn run_with_callback<B, C>(&self, backend: &mut B, mut callback: C) -> QaoaResult<MaxCutSolution>
    where
        B: ExecutionBackend,
        C: FnMut(&Evaluation<'_>),
    {
        self.drive(backend, self.initial_params(), &mut callback)
    }

    /// Run QAOA with specified initial parameters θ₀ = [β, γ].
    pub fn run_with_params<B: ExecutionBackend>(
        &self,
        backend: &mut B,
        initial_params: Vec<f64>,
    ) -> QaoaResult<MaxCutSolution> {
        self.drive(backend, initial_params, &mut |_: &Evaluation<'_>| {})
    }

    /// Run QAOA with multiple starting points and return the largest cut.
    ///
    /// The first start uses [`initial_params`](Self::initial_params); the
    /// rest use seeded random parameters. Equal cuts keep the earlier run.
    pub fn run_with_restarts<B: ExecutionBackend>(
        &self,
        backend: &mut B,
        n_restarts: usize,
    ) -> QaoaResult<MaxCutSolution> {
        let mut best = self.run(backend)?;

        for restart in 1..n_restarts {
            let (beta, gamma) = random_parameters(self.p, 42 + restart as u64 * 12345);
            let mut theta = flatten_parameters(&beta, &gamma);
            if let Some(ref bounds) = self.bounds {
                bounds.clip(&mut theta, self.p);
            }

            let result = self.run_with_params(backend, theta)?;
            debug!(restart, cut = result.cut_size, "restart finished");
            if result.cut_size > best.cut_size {
                best = result;
            }
        }

        Ok(best)
    }

    #[instrument(skip_all, fields(p = self.p, nodes = self.graph.n_nodes(), backend = backend.name()))]
    fn drive<B: ExecutionBackend>(
        &self,
        backend: &mut B,
        initial_params: Vec<f64>,
        callback: &mut dyn FnMut(&Evaluation<'_>),
    ) -> QaoaResult<MaxCutSolution> {
        let p = self.p;
        let graph = &self.graph;
        let ansatz = self.ansatz();

        debug!(phase = %DriverPhase::Init, params = initial_params.len(), "building objective");
        if initial_params.len() != ansatz.num_parameters() {
            return Err(QaoaError::ParameterLength {
                expected: ansatz.num_parameters(),
                got: initial_params.len(),
            });
        }

        let mut evaluations = 0;
        let objective = |theta: &[f64]| -> QaoaResult<f64> {
            let counts = sample_with(&ansatz, &mut *backend, theta)?;
            let value = energy(&counts, graph)?;
            callback(&Evaluation {
                index: evaluations,
                theta,
                energy: value,
            });
            debug!(evaluation = evaluations, energy = value, "objective evaluated");
            evaluations += 1;
            Ok(value)
        };

        info!(phase = %DriverPhase::Optimizing, budget = self.maxiter, "handing objective to minimizer");
        let result = self
            .minimizer
            .try_minimize(objective, initial_params, self.maxiter)?;
        if result.status == TerminationStatus::IterationLimit {
            warn!(
                iterations = result.num_iterations,
                "minimizer did not converge within budget; using its best parameters"
            );
        }

        let counts = sample_with(&ansatz, backend, &result.optimal_params)?;
        evaluations += 1;
        let final_energy = energy(&counts, graph)?;
        let (best_bitstring, cut_value) = best_outcome(&counts, graph)?;
        let cut_size = cut_value.unsigned_abs() as usize;
        let (set_s, set_t) = graph.bitstring_to_partition(&best_bitstring)?;

        let approximation_ratio = graph.max_cut_brute_force().map(|(_, max_cut)| {
            if max_cut > 0 {
                cut_size as f64 / max_cut as f64
            } else {
                1.0
            }
        });

        info!(
            phase = %DriverPhase::Done,
            best = %best_bitstring,
            cut_size,
            final_energy,
            "selected solution"
        );

        let (beta, gamma) = result.optimal_params.split_at(p);
        Ok(MaxCutSolution {
            best_bitstring,
            cut_value,
            cut_size,
            set_s,
            set_t,
            optimal_beta: beta.to_vec(),
            optimal_gamma: gamma.to_vec(),
            final_energy,
            optimal_value: result.optimal_value,
            iterations: result.num_iterations,
            circuit_evaluations: evaluations,
            status: result.status,
            energy_history: result.history,
            approximation_ratio,
            counts,
        })
    }
}

/// Build, execute and normalize one circuit.
fn sample_with<B: ExecutionBackend>(
    ansatz: &QaoaAnsatz<'_>,
    backend: &mut B,
    theta: &[f64],
) -> QaoaResult<Counts> {
    let program = ansatz.build(theta)?;
    let raw = backend.run(&program)?;
    Ok(normalize_bit_order(&raw))
}
