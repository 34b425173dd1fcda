//! QAOA (Quantum Approximate Optimization Algorithm) circuits.
//!
//! QAOA is a variational algorithm for combinatorial optimization problems.
//! It alternates between cost and mixer unitaries with tunable parameters.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use qaoa_ir::{IrResult, LineId, Program};

use crate::error::{QaoaError, QaoaResult};
use crate::problems::Graph;

fn line(index: usize) -> LineId {
    // Out-of-range indices become a line the program will reject.
    LineId(u32::try_from(index).unwrap_or(u32::MAX))
}

/// Append the ZZ interaction for one edge.
///
/// RZZ is decomposed as CNOT(i,j) · RZ(2γ)[j] · CNOT(i,j).
pub fn apply_cost_term(program: &mut Program, i: usize, j: usize, gamma: f64) -> IrResult<()> {
    let (i, j) = (line(i), line(j));
    program.cx(i, j)?.rz(2.0 * gamma, j)?.cx(i, j)?;
    Ok(())
}

/// Apply the cost unitary exp(-i γ C) for Max-Cut.
///
/// Edges are applied in the graph's enumeration order. With `barriers`
/// set, a barrier over all lines separates consecutive edge terms.
pub fn apply_cost_layer(
    program: &mut Program,
    graph: &Graph,
    gamma: f64,
    barriers: bool,
) -> IrResult<()> {
    for (k, &(i, j)) in graph.edges().iter().enumerate() {
        if barriers && k > 0 {
            program.barrier_all()?;
        }
        apply_cost_term(program, i, j, gamma)?;
    }
    Ok(())
}

/// Apply the mixer unitary exp(-i β B), B = Σ Xⱼ, as RX(2β) on every line.
pub fn apply_mixer_layer(program: &mut Program, graph: &Graph, beta: f64) -> IrResult<()> {
    let angle = 2.0 * beta;
    for q in 0..graph.n_nodes() {
        program.rx(angle, line(q))?;
    }
    Ok(())
}

/// Generate a QAOA circuit for the Max-Cut problem.
///
/// QAOA consists of:
/// 1. Initial state: |+⟩^n (uniform superposition)
/// 2. For each layer:
///    - Cost unitary with `gamma[layer]`
///    - Mixer unitary with `beta[layer]`
/// 3. Measurement of every line
///
/// The depth p is `beta.len()`; `gamma` must have the same length.
pub fn qaoa_circuit(graph: &Graph, beta: &[f64], gamma: &[f64]) -> QaoaResult<Program> {
    assemble(graph, beta, gamma, false)
}

fn assemble(graph: &Graph, beta: &[f64], gamma: &[f64], barriers: bool) -> QaoaResult<Program> {
    if beta.len() != gamma.len() {
        return Err(QaoaError::ParameterMismatch {
            beta: beta.len(),
            gamma: gamma.len(),
        });
    }

    let n = graph.n_nodes();
    let mut program = Program::new("qaoa", line(n).0);

    for q in 0..n {
        program.h(line(q))?;
    }

    for (&b, &g) in beta.iter().zip(gamma) {
        apply_cost_layer(&mut program, graph, g, barriers)?;
        apply_mixer_layer(&mut program, graph, b)?;
    }

    program.measure_all()?;
    Ok(program)
}

/// Number of instructions [`qaoa_circuit`] emits for `n` nodes, `e` edges
/// and depth `p` (no barriers).
pub fn instruction_count(n: usize, e: usize, p: usize) -> usize {
    n + p * (3 * e + n) + 1
}

/// Calculate the number of QAOA parameters.
pub fn num_parameters(p: usize) -> usize {
    2 * p // p beta values + p gamma values
}

/// Split a flattened parameter vector θ = [β₀..β_{p-1}, γ₀..γ_{p-1}].
pub fn split_parameters(theta: &[f64], p: usize) -> QaoaResult<(&[f64], &[f64])> {
    if theta.len() != num_parameters(p) {
        return Err(QaoaError::ParameterLength {
            expected: num_parameters(p),
            got: theta.len(),
        });
    }
    Ok(theta.split_at(p))
}

/// A fixed-depth QAOA ansatz over one graph.
#[derive(Debug, Clone)]
pub struct QaoaAnsatz<'g> {
    graph: &'g Graph,
    p: usize,
    barriers: bool,
}

impl<'g> QaoaAnsatz<'g> {
    /// Create an ansatz with `p` layers.
    pub fn new(graph: &'g Graph, p: usize) -> Self {
        Self {
            graph,
            p,
            barriers: false,
        }
    }

    /// Insert barriers between edge terms.
    pub fn with_barriers(mut self, barriers: bool) -> Self {
        self.barriers = barriers;
        self
    }

    /// Depth of the ansatz.
    pub fn layers(&self) -> usize {
        self.p
    }

    /// Length of the flattened parameter vector.
    pub fn num_parameters(&self) -> usize {
        num_parameters(self.p)
    }

    /// Build the circuit for a flattened parameter vector.
    pub fn build(&self, theta: &[f64]) -> QaoaResult<Program> {
        let (beta, gamma) = split_parameters(theta, self.p)?;
        assemble(self.graph, beta, gamma, self.barriers)
    }
}

/// Strategy for initializing QAOA parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitStrategy {
    /// Linear interpolation: gamma increases, beta decreases.
    Linear,
    /// Fixed values: all gamma and beta are the same.
    Fixed,
    /// Trotterized adiabatic: mimics adiabatic evolution.
    #[default]
    TrotterizedAdiabatic,
    /// Random initialization within bounds.
    Random,
    /// Fourier-based initialization for smoother landscapes.
    Fourier,
}

/// Seed used by [`InitStrategy::Random`].
const DEFAULT_INIT_SEED: u64 = 42;

/// Calculate initial parameters with a specific strategy.
///
/// Returns `(beta, gamma)` with `beta <= 0 <= gamma`. The ansatz starts in
/// the top eigenstate of the mixer, so descending the cut energy follows
/// the adiabatic path with the mixer angle reversed.
///
/// # Strategies
/// - `Linear`: Simple linear interpolation, good baseline
/// - `Fixed`: All parameters equal, useful for single-layer QAOA
/// - `TrotterizedAdiabatic`: Mimics adiabatic evolution, often best for deeper circuits
/// - `Random`: Magnitudes random in [0, π/2), seeded for reproducibility
/// - `Fourier`: Sine/cosine basis, smoother optimization landscape
pub fn initial_parameters_with_strategy(p: usize, strategy: InitStrategy) -> (Vec<f64>, Vec<f64>) {
    let (beta, gamma) = schedule(p, strategy);
    (beta.into_iter().map(|b| -b).collect(), gamma)
}

/// Unsigned `(|beta|, gamma)` schedules.
fn schedule(p: usize, strategy: InitStrategy) -> (Vec<f64>, Vec<f64>) {
    match strategy {
        InitStrategy::Linear => {
            let beta: Vec<f64> = (0..p)
                .map(|i| PI / 4.0 * (p - i) as f64 / p as f64)
                .collect();
            let gamma: Vec<f64> = (0..p)
                .map(|i| PI / 4.0 * (i + 1) as f64 / p as f64)
                .collect();
            (beta, gamma)
        }
        InitStrategy::Fixed => (vec![PI / 8.0; p], vec![PI / 4.0; p]),
        InitStrategy::TrotterizedAdiabatic => {
            // s goes from 0 to 1, with gamma ~ s and beta ~ (1-s)
            let dt = 1.0 / (p + 1) as f64;
            let beta: Vec<f64> = (1..=p)
                .map(|i| (1.0 - i as f64 * dt) * PI / 2.0 * dt)
                .collect();
            let gamma: Vec<f64> = (1..=p)
                .map(|i| i as f64 * dt * PI / 2.0 * dt)
                .collect();
            (beta, gamma)
        }
        InitStrategy::Random => {
            let (beta, gamma) = random_parameters(p, DEFAULT_INIT_SEED);
            (beta.into_iter().map(|b| -b).collect(), gamma)
        }
        InitStrategy::Fourier => {
            // First Fourier mode only
            let beta: Vec<f64> = (0..p)
                .map(|k| PI / 4.0 * ((k as f64 + 0.5) * PI / p as f64).cos())
                .collect();
            let gamma: Vec<f64> = (0..p)
                .map(|k| PI / 4.0 * ((k as f64 + 0.5) * PI / p as f64).sin())
                .collect();
            (beta, gamma)
        }
    }
}

/// Seeded random `(beta, gamma)` with beta in (-π/2, 0] and gamma in [0, π/2).
pub fn random_parameters(p: usize, seed: u64) -> (Vec<f64>, Vec<f64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let beta = (0..p).map(|_| -rng.gen_range(0.0..PI / 2.0)).collect();
    let gamma = (0..p).map(|_| rng.gen_range(0.0..PI / 2.0)).collect();
    (beta, gamma)
}

/// Calculate graph-aware initial parameters.
///
/// Starts from the Trotterized-adiabatic schedule and scales gamma by
/// 1/√(average degree): denser graphs accumulate more phase per layer.
pub fn graph_aware_initial_parameters(graph: &Graph, p: usize) -> (Vec<f64>, Vec<f64>) {
    let n = graph.n_nodes() as f64;
    let m = graph.num_edges() as f64;
    let avg_degree = if n > 0.0 && m > 0.0 { 2.0 * m / n } else { 1.0 };
    let gamma_scale = 1.0 / avg_degree.sqrt();

    let (beta, mut gamma) = initial_parameters_with_strategy(p, InitStrategy::TrotterizedAdiabatic);
    for g in &mut gamma {
        *g *= gamma_scale;
    }
    (beta, gamma)
}

/// Flatten `(beta, gamma)` into θ.
pub fn flatten_parameters(beta: &[f64], gamma: &[f64]) -> Vec<f64> {
    beta.iter().chain(gamma).copied().collect()
}

/// Bounds for QAOA parameters.
///
/// Constraining parameters to these bounds often improves optimization.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParameterBounds {
    /// Minimum beta value.
    pub beta_min: f64,
    /// Maximum beta value.
    pub beta_max: f64,
    /// Minimum gamma value.
    pub gamma_min: f64,
    /// Maximum gamma value.
    pub gamma_max: f64,
}

impl Default for ParameterBounds {
    fn default() -> Self {
        Self {
            beta_min: -PI / 2.0,
            beta_max: 0.0,
            gamma_min: 0.0,
            gamma_max: PI,
        }
    }
}

impl ParameterBounds {
    /// Tight bounds for faster convergence on typical Max-Cut instances.
    pub fn tight() -> Self {
        Self {
            beta_min: -PI / 4.0,
            beta_max: 0.0,
            gamma_min: 0.0,
            gamma_max: PI / 2.0,
        }
    }

    /// Clip a flattened θ of depth `p` to bounds.
    pub fn clip(&self, theta: &mut [f64], p: usize) {
        for (k, v) in theta.iter_mut().enumerate() {
            *v = if k < p {
                v.clamp(self.beta_min, self.beta_max)
            } else {
                v.clamp(self.gamma_min, self.gamma_max)
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qaoa_ir::InstructionKind;

    #[test]
    fn test_cost_term_order() {
        let mut program = Program::new("t", 3);
        apply_cost_term(&mut program, 0, 2, 0.4).unwrap();

        let ops = program.instructions();
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0].kind, InstructionKind::Cx);
        assert_eq!(ops[0].lines, vec![LineId(0), LineId(2)]);
        assert_eq!(ops[1].kind, InstructionKind::Rz(0.8));
        assert_eq!(ops[1].lines, vec![LineId(2)]);
        assert_eq!(ops[2], ops[0]);
    }

    #[test]
    fn test_cost_term_rejects_bad_lines() {
        let mut program = Program::new("t", 2);
        assert!(apply_cost_term(&mut program, 0, 5, 0.1).is_err());
        assert!(apply_cost_term(&mut program, 1, 1, 0.1).is_err());
        assert!(program.is_empty());
    }

    #[test]
    fn test_cost_layer_barriers() {
        let graph = Graph::square_4();
        let mut plain = Program::new("t", 4);
        apply_cost_layer(&mut plain, &graph, 0.3, false).unwrap();
        assert_eq!(plain.len(), 12);

        let mut grouped = Program::new("t", 4);
        apply_cost_layer(&mut grouped, &graph, 0.3, true).unwrap();
        assert_eq!(grouped.len(), 12 + 3);
        assert_eq!(grouped.count_ops()["barrier"], 3);
    }

    #[test]
    fn test_mixer_layer() {
        let graph = Graph::square_4();
        let mut program = Program::new("t", 4);
        apply_mixer_layer(&mut program, &graph, 0.25).unwrap();
        assert_eq!(program.len(), 4);
        for (q, inst) in program.instructions().iter().enumerate() {
            assert_eq!(inst.kind, InstructionKind::Rx(0.5));
            assert_eq!(inst.lines, vec![LineId(q as u32)]);
        }
    }

    #[test]
    fn test_qaoa_circuit() {
        let graph = Graph::square_4();
        let program = qaoa_circuit(&graph, &[0.3], &[0.5]).unwrap();

        assert_eq!(program.num_lines(), 4);
        assert!(program.is_terminated());
        assert_eq!(program.len(), instruction_count(4, 4, 1));
    }

    #[test]
    fn test_qaoa_multi_layer_order() {
        let graph = Graph::new(2, [(0, 1)]).unwrap();
        let program = qaoa_circuit(&graph, &[0.1, 0.2], &[0.3, 0.4]).unwrap();

        let angles: Vec<_> = program
            .instructions()
            .iter()
            .filter_map(|i| i.kind.angle().map(|a| (i.name(), a)))
            .collect();
        assert_eq!(
            angles,
            vec![
                ("rz", 0.6),
                ("rx", 0.2),
                ("rx", 0.2),
                ("rz", 0.8),
                ("rx", 0.4),
                ("rx", 0.4),
            ]
        );
    }

    #[test]
    fn test_parameter_mismatch() {
        let graph = Graph::square_4();
        let err = qaoa_circuit(&graph, &[0.1, 0.2], &[0.3]).unwrap_err();
        assert!(matches!(
            err,
            QaoaError::ParameterMismatch { beta: 2, gamma: 1 }
        ));
    }

    #[test]
    fn test_ansatz_build() {
        let graph = Graph::square_4();
        let ansatz = QaoaAnsatz::new(&graph, 2);
        assert_eq!(ansatz.num_parameters(), 4);

        let program = ansatz.build(&[0.1, 0.2, 0.3, 0.4]).unwrap();
        assert_eq!(program.len(), instruction_count(4, 4, 2));

        assert!(matches!(
            ansatz.build(&[0.1, 0.2, 0.3]),
            Err(QaoaError::ParameterLength {
                expected: 4,
                got: 3
            })
        ));
    }

    #[test]
    fn test_initial_parameters() {
        let (beta, gamma) = initial_parameters_with_strategy(3, InitStrategy::Linear);

        assert_eq!(gamma.len(), 3);
        assert_eq!(beta.len(), 3);

        // Gamma should be increasing
        assert!(gamma[0] < gamma[1]);
        assert!(gamma[1] < gamma[2]);

        // Beta should shrink towards zero from below
        assert!(beta.iter().all(|&b| b < 0.0));
        assert!(beta[0] < beta[1]);
        assert!(beta[1] < beta[2]);
    }

    #[test]
    fn test_random_parameters_seeded() {
        let a = random_parameters(3, 9);
        assert_eq!(a, random_parameters(3, 9));
        assert!(a.0.iter().all(|v| *v <= 0.0 && *v > -PI / 2.0));
        assert!(a.1.iter().all(|v| (0.0..PI / 2.0).contains(v)));
        assert_eq!(
            initial_parameters_with_strategy(3, InitStrategy::Random),
            random_parameters(3, DEFAULT_INIT_SEED)
        );
        assert!(
            [InitStrategy::Fixed, InitStrategy::TrotterizedAdiabatic, InitStrategy::Fourier]
                .into_iter()
                .all(|s| initial_parameters_with_strategy(2, s).0.iter().all(|&b| b <= 0.0))
        );
    }

    #[test]
    fn test_bounds_clip() {
        let bounds = ParameterBounds::tight();
        let mut theta = vec![-1.0, 5.0, -1.0, 5.0];
        bounds.clip(&mut theta, 2);
        assert_eq!(theta, vec![-PI / 4.0, 0.0, 0.0, PI / 2.0]);
    }

    #[test]
    fn test_num_parameters() {
        assert_eq!(num_parameters(1), 2);
        assert_eq!(num_parameters(3), 6);
        assert_eq!(flatten_parameters(&[1.0], &[2.0]), vec![1.0, 2.0]);
    }
}
