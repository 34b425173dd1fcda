//! COBYLA-style (Constrained Optimization BY Linear Approximation) optimizer.
//!
//! This is a derivative-free simplex method with a shrinking trust region
//! that bounds each step, suitable for variational quantum algorithms
//! where gradients are expensive and evaluations are noisy.

use tracing::trace;

use super::{Minimizer, OptimizationResult, TerminationStatus, argmin};

/// COBYLA optimizer configuration.
#[derive(Debug, Clone)]
pub struct Cobyla {
    /// Convergence tolerance on the simplex value spread.
    pub tol: f64,
    /// Initial trust region radius.
    pub rhobeg: f64,
    /// Final trust region radius.
    pub rhoend: f64,
}

impl Default for Cobyla {
    fn default() -> Self {
        Self {
            tol: 1e-6,
            rhobeg: 0.5,
            rhoend: 1e-4,
        }
    }
}

impl Cobyla {
    /// Create a new COBYLA optimizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set trust region parameters.
    pub fn with_trust_region(mut self, rhobeg: f64, rhoend: f64) -> Self {
        self.rhobeg = rhobeg;
        self.rhoend = rhoend;
        self
    }
}

/// Working simplex: `n + 1` points with their objective values.
struct Simplex {
    points: Vec<Vec<f64>>,
    values: Vec<f64>,
}

impl Simplex {
    /// `center` plus one step of `step` along each axis.
    fn around<F, E>(
        center: Vec<f64>,
        f_center: f64,
        step: f64,
        objective: &mut F,
        evaluations: &mut usize,
    ) -> Result<Self, E>
    where
        F: FnMut(&[f64]) -> Result<f64, E>,
    {
        let n = center.len();
        let mut points = Vec::with_capacity(n + 1);
        let mut values = Vec::with_capacity(n + 1);
        for axis in 0..n {
            let mut vertex = center.clone();
            vertex[axis] += step;
            values.push(objective(&vertex)?);
            *evaluations += 1;
            points.push(vertex);
        }
        points.insert(0, center);
        values.insert(0, f_center);
        Ok(Self { points, values })
    }

    /// Vertex indices from lowest to highest value.
    fn ranking(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.points.len()).collect();
        order.sort_by(|&a, &b| self.values[a].total_cmp(&self.values[b]));
        order
    }

    fn centroid(&self, vertices: &[usize]) -> Vec<f64> {
        let dim = self.points[0].len();
        let mut centroid = vec![0.0; dim];
        for &v in vertices {
            for (c, x) in centroid.iter_mut().zip(&self.points[v]) {
                *c += x;
            }
        }
        let count = vertices.len() as f64;
        centroid.iter_mut().for_each(|c| *c /= count);
        centroid
    }

    fn replace(&mut self, vertex: usize, point: Vec<f64>, value: f64) {
        self.points[vertex] = point;
        self.values[vertex] = value;
    }

    fn best(&self) -> (Vec<f64>, f64) {
        let i = argmin(&self.values);
        (self.points[i].clone(), self.values[i])
    }
}

/// Move `from` through `pivot`, clamping each coordinate step to `radius`.
fn bounded_reflection(pivot: &[f64], from: &[f64], radius: f64) -> Vec<f64> {
    pivot
        .iter()
        .zip(from)
        .map(|(c, w)| c + (c - w).clamp(-radius, radius))
        .collect()
}

/// Point at `t` along the segment from `a` to `b`.
fn lerp(a: &[f64], b: &[f64], t: f64) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x + t * (y - x)).collect()
}

impl Minimizer for Cobyla {
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
        let f_start = objective(&initial_params)?;
        let mut num_evaluations = 1;
        let mut history = vec![f_start];
        let mut lowest = f_start;

        let mut simplex = Simplex::around(
            initial_params,
            f_start,
            self.rhobeg,
            &mut objective,
            &mut num_evaluations,
        )?;
        let mut rho = self.rhobeg;
        let mut status = TerminationStatus::IterationLimit;
        let mut num_iterations = 0;

        while num_iterations < budget {
            num_iterations += 1;

            let ranking = simplex.ranking();
            let (best, worst, runner_up) = (ranking[0], ranking[n], ranking[n.saturating_sub(1)]);
            let spread = simplex.values[worst] - simplex.values[best];

            if spread < self.tol {
                if rho <= self.rhoend {
                    status = TerminationStatus::Converged;
                    break;
                }
                rho = (rho * 0.5).max(self.rhoend);
                trace!(rho, "contracting trust region");
                let (center, f_center) = simplex.best();
                simplex =
                    Simplex::around(center, f_center, rho, &mut objective, &mut num_evaluations)?;
                continue;
            }

            let centroid = simplex.centroid(&ranking[..n]);
            let reflected = bounded_reflection(&centroid, &simplex.points[worst], rho);
            let f_reflected = objective(&reflected)?;
            num_evaluations += 1;

            if f_reflected < simplex.values[best] {
                let expanded = lerp(&centroid, &reflected, 2.0);
                let f_expanded = objective(&expanded)?;
                num_evaluations += 1;
                if f_expanded < f_reflected {
                    simplex.replace(worst, expanded, f_expanded);
                } else {
                    simplex.replace(worst, reflected, f_reflected);
                }
            } else if f_reflected < simplex.values[runner_up] {
                simplex.replace(worst, reflected, f_reflected);
            } else {
                let contracted = lerp(&centroid, &simplex.points[worst], 0.5);
                let f_contracted = objective(&contracted)?;
                num_evaluations += 1;
                if f_contracted < simplex.values[worst] {
                    simplex.replace(worst, contracted, f_contracted);
                } else {
                    // shrink onto the best vertex
                    let anchor = simplex.points[best].clone();
                    for v in (0..=n).filter(|&v| v != best) {
                        let moved = lerp(&anchor, &simplex.points[v], 0.5);
                        let value = objective(&moved)?;
                        num_evaluations += 1;
                        simplex.replace(v, moved, value);
                    }
                }
            }

            let (_, f_min) = simplex.best();
            if f_min < lowest {
                lowest = f_min;
                history.push(lowest);
            }
        }

        let (optimal_params, optimal_value) = simplex.best();
        Ok(OptimizationResult {
            optimal_params,
            optimal_value,
            num_evaluations,
            num_iterations,
            history,
            status,
        })
    }
}
