//! Simple SPSA (Simultaneous Perturbation Stochastic Approximation) optimizer.
//!
//! A gradient-free stochastic method: each iteration estimates the full
//! gradient from two evaluations along a random ±1 direction, which makes
//! it tolerant of shot noise.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Minimizer, OptimizationResult, TerminationStatus};

/// SPSA optimizer configuration.
#[derive(Debug, Clone)]
pub struct Spsa {
    /// Initial step size for the parameter update.
    pub a: f64,
    /// Perturbation size.
    pub c: f64,
    /// Learning rate decay parameter.
    pub alpha: f64,
    /// Perturbation decay parameter.
    pub gamma: f64,
    /// Seed for the perturbation directions.
    pub seed: u64,
}

impl Default for Spsa {
    fn default() -> Self {
        Self {
            a: 0.1,
            c: 0.1,
            alpha: 0.602,
            gamma: 0.101,
            seed: 42,
        }
    }
}

impl Spsa {
    /// Create a new SPSA optimizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the step and perturbation sizes.
    pub fn with_gains(mut self, a: f64, c: f64) -> Self {
        self.a = a;
        self.c = c;
        self
    }

    /// Set the perturbation seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Minimizer for Spsa {
    fn try_minimize<F, E>(
        &self,
        mut objective: F,
        initial_params: Vec<f64>,
        budget: usize,
    ) -> Result<OptimizationResult, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        let n = initial_params.len();
        let mut x = initial_params;
        let f_start = objective(&x)?;
        let mut history = vec![f_start];
        let mut num_evaluations = 1;
        let mut best = (x.clone(), f_start);
        let mut rng = StdRng::seed_from_u64(self.seed);

        for k in 0..budget {
            let a_k = self.a / ((k + 1) as f64).powf(self.alpha);
            let c_k = self.c / ((k + 1) as f64).powf(self.gamma);

            let delta: Vec<f64> = (0..n)
                .map(|_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 })
                .collect();

            let x_plus: Vec<f64> = x.iter().zip(&delta).map(|(xi, di)| xi + c_k * di).collect();
            let x_minus: Vec<f64> = x.iter().zip(&delta).map(|(xi, di)| xi - c_k * di).collect();

            let f_plus = objective(&x_plus)?;
            let f_minus = objective(&x_minus)?;
            num_evaluations += 2;

            for (xi, di) in x.iter_mut().zip(&delta) {
                *xi -= a_k * (f_plus - f_minus) / (2.0 * c_k * di);
            }

            let f_x = objective(&x)?;
            num_evaluations += 1;

            if f_x < best.1 {
                best = (x.clone(), f_x);
                history.push(f_x);
            }
        }

        // SPSA has no stopping rule of its own; it always spends the budget.
        Ok(OptimizationResult {
            optimal_params: best.0,
            optimal_value: best.1,
            num_evaluations,
            num_iterations: budget,
            history,
            status: TerminationStatus::IterationLimit,
        })
    }
}
