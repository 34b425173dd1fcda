//! Classical optimizers for the variational loop.
//!
//! A [`Minimizer`] owns the optimization loop: it calls the objective one
//! point at a time and decides when to stop. Objectives are fallible so
//! that a backend failure ends the loop immediately and reaches the caller
//! unchanged.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};

pub mod cobyla;
pub mod spsa;

pub use cobyla::Cobyla;
pub use spsa::Spsa;

/// Why a minimizer stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationStatus {
    /// The convergence criterion was met.
    Converged,
    /// The iteration budget ran out first.
    IterationLimit,
}

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Best parameter values found.
    pub optimal_params: Vec<f64>,
    /// Objective value at `optimal_params`.
    pub optimal_value: f64,
    /// Number of function evaluations.
    pub num_evaluations: usize,
    /// Number of iterations.
    pub num_iterations: usize,
    /// Best objective value after each improvement.
    pub history: Vec<f64>,
    /// Termination status.
    pub status: TerminationStatus,
}

impl OptimizationResult {
    /// Whether the minimizer met its convergence criterion.
    pub fn converged(&self) -> bool {
        self.status == TerminationStatus::Converged
    }
}

/// Trait for derivative-free minimizers.
pub trait Minimizer {
    /// Minimize a fallible objective starting from `initial_params`,
    /// running at most `budget` iterations.
    ///
    /// The first objective error aborts the run and is returned as is.
    fn try_minimize<F, E>(
        &self,
        objective: F,
        initial_params: Vec<f64>,
        budget: usize,
    ) -> Result<OptimizationResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>;

    /// Minimize an infallible objective.
    fn minimize<F>(&self, mut objective: F, initial_params: Vec<f64>, budget: usize) -> OptimizationResult
    where
        F: FnMut(&[f64]) -> f64,
    {
        match self.try_minimize(
            |x| Ok::<f64, Infallible>(objective(x)),
            initial_params,
            budget,
        ) {
            Ok(result) => result,
            Err(never) => match never {},
        }
    }
}

/// Runtime-selectable minimizer.
#[derive(Debug, Clone)]
pub enum AnyMinimizer {
    /// Trust-region simplex.
    Cobyla(Cobyla),
    /// Simultaneous perturbation stochastic approximation.
    Spsa(Spsa),
}

impl Default for AnyMinimizer {
    fn default() -> Self {
        AnyMinimizer::Cobyla(Cobyla::default())
    }
}

impl Minimizer for AnyMinimizer {
    fn try_minimize<F, E>(
        &self,
        objective: F,
        initial_params: Vec<f64>,
        budget: usize,
    ) -> Result<OptimizationResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        match self {
            AnyMinimizer::Cobyla(m) => m.try_minimize(objective, initial_params, budget),
            AnyMinimizer::Spsa(m) => m.try_minimize(objective, initial_params, budget),
        }
    }
}

/// Index of the smallest value (first wins ties; NaN sorts last).
pub(crate) fn argmin(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map_or(0, |(i, _)| i)
}
