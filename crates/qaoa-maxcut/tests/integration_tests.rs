//! End-to-end tests for the MAXCUT-QAOA workflow.
//!
//! Circuit-shape and objective checks use fixed inputs; the driver runs
//! against the seeded local simulator so results are reproducible.

use std::f64::consts::PI;

use approx::assert_relative_eq;
use qaoa_adapter_sim::SimulatorBackend;
use qaoa_hal::{Counts, ExecutionBackend, HalError, HalResult};
use qaoa_ir::{InstructionKind, Program, emit_qasm};
use qaoa_maxcut::circuits::qaoa::instruction_count;
use qaoa_maxcut::{
    AnyMinimizer, Graph, InitStrategy, QaoaError, QaoaRunner, Spsa, TerminationStatus, cut_value,
    energy, normalize_bit_order, qaoa_circuit,
};

#[test]
fn test_bipartite_reference_values() {
    let graph = Graph::bipartite_3_2();
    assert_eq!(cut_value("11100", &graph).unwrap(), -6);

    let counts: Counts = [("11100", 600), ("00011", 424)].into_iter().collect();
    assert_relative_eq!(energy(&counts, &graph).unwrap(), -6.0);
}

#[test]
fn test_depth_one_circuit_shape() {
    let graph = Graph::bipartite_3_2();
    let program = qaoa_circuit(&graph, &[PI / 3.0], &[PI / 2.0]).unwrap();

    assert_eq!(program.num_lines(), 5);
    assert_eq!(program.len(), 29);
    assert_eq!(program.len(), instruction_count(5, 6, 1));

    let ops = program.count_ops();
    assert_eq!(ops["h"], 5);
    assert_eq!(ops["cx"], 12);
    assert_eq!(ops["rz"], 6);
    assert_eq!(ops["rx"], 5);
    assert_eq!(ops["measure"], 1);

    // Cost angles are 2γ, mixer angles are 2β
    for inst in program.instructions() {
        match inst.kind {
            InstructionKind::Rz(theta) => assert_relative_eq!(theta, PI),
            InstructionKind::Rx(theta) => assert_relative_eq!(theta, 2.0 * PI / 3.0),
            _ => {}
        }
    }
    assert!(program.instructions().last().unwrap().is_measure());
}

#[test]
fn test_mismatched_layers_rejected() {
    let graph = Graph::square_4();
    let err = qaoa_circuit(&graph, &[0.1, 0.2], &[0.3]).unwrap_err();
    assert!(matches!(
        err,
        QaoaError::ParameterMismatch { beta: 2, gamma: 1 }
    ));
}

#[test]
fn test_qasm_of_ansatz() {
    let graph = Graph::square_4();
    let program = qaoa_circuit(&graph, &[0.4], &[0.8]).unwrap();
    let qasm = emit_qasm(&program);

    assert!(qasm.starts_with("OPENQASM 3.0;"));
    assert!(qasm.contains("qubit[4] q;"));
    assert_eq!(qasm.matches("cx ").count(), 8);
}

/// Records every program it is asked to run.
struct Recording {
    raw: Counts,
    seen: Vec<Program>,
}

impl ExecutionBackend for Recording {
    fn name(&self) -> &str {
        "recording"
    }

    fn shots(&self) -> u32 {
        self.raw.total_shots() as u32
    }

    fn run(&mut self, program: &Program) -> HalResult<Counts> {
        self.seen.push(program.clone());
        Ok(self.raw.clone())
    }
}

#[test]
fn test_driver_sends_terminated_programs() {
    let mut backend = Recording {
        raw: [("0101", 10), ("0011", 6)].into_iter().collect(),
        seen: vec![],
    };
    let runner = QaoaRunner::new(Graph::square_4())
        .with_layers(2)
        .with_maxiter(4);

    let solution = runner.run(&mut backend).unwrap();

    assert_eq!(backend.seen.len(), solution.circuit_evaluations);
    assert!(backend.seen.iter().all(Program::is_terminated));
    assert!(backend.seen.iter().all(|p| p.len() == instruction_count(4, 4, 2)));
    assert_eq!(solution.best_bitstring, "1010");
    assert_eq!(solution.optimal_beta.len(), 2);
    assert_eq!(solution.optimal_gamma.len(), 2);
}

/// Fails on the n-th execution.
struct FailsAfter {
    remaining: usize,
}

impl ExecutionBackend for FailsAfter {
    fn name(&self) -> &str {
        "flaky"
    }

    fn shots(&self) -> u32 {
        1
    }

    fn run(&mut self, program: &Program) -> HalResult<Counts> {
        if self.remaining == 0 {
            return Err(HalError::Backend("queue closed".into()));
        }
        self.remaining -= 1;
        Ok([("0".repeat(program.num_lines()), 1)].into_iter().collect())
    }
}

#[test]
fn test_mid_run_failure_reaches_caller() {
    let runner = QaoaRunner::new(Graph::square_4()).with_maxiter(50);
    let err = runner.run(&mut FailsAfter { remaining: 5 }).unwrap_err();
    match err {
        QaoaError::Backend(HalError::Backend(msg)) => assert_eq!(msg, "queue closed"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_simulated_bipartite_finds_max_cut() {
    let mut backend = SimulatorBackend::new().with_shots(512).with_seed(11);
    let runner = QaoaRunner::new(Graph::bipartite_3_2()).with_maxiter(30);

    let solution = runner.run(&mut backend).unwrap();

    assert_eq!(solution.cut_size, 6);
    assert_eq!(solution.cut_value, -6);
    assert!(solution.best_bitstring == "11100" || solution.best_bitstring == "00011");
    assert_eq!(solution.approximation_ratio, Some(1.0));
    assert!(solution.optimal_value < -3.0);
    assert_eq!(solution.counts.total_shots(), 512);
}

#[test]
fn test_simulated_restarts_with_spsa() {
    let mut backend = SimulatorBackend::new().with_shots(256).with_seed(5);
    let runner = QaoaRunner::new(Graph::square_4())
        .with_init_strategy(InitStrategy::Linear)
        .with_maxiter(10)
        .with_minimizer(AnyMinimizer::Spsa(Spsa::new().with_seed(9)));

    let solution = runner.run_with_restarts(&mut backend, 3).unwrap();

    assert_eq!(solution.cut_size, 4);
    assert_eq!(solution.status, TerminationStatus::IterationLimit);
    assert_eq!(solution.circuit_evaluations, 1 + 3 * 10 + 1);
}

#[test]
fn test_simulated_counts_are_node_ordered() {
    // A lone Rx(π) on line 0 must show up as node 0 after normalization.
    let mut program = Program::new("flip", 3);
    program.rx(PI, qaoa_ir::LineId(0)).unwrap();
    program.measure_all().unwrap();

    let mut backend = SimulatorBackend::new().with_shots(8).with_seed(0);
    let raw = backend.run(&program).unwrap();
    let normalized = normalize_bit_order(&raw);
    assert_eq!(normalized.get("100"), 8);
}

#[test]
fn test_simulated_empty_graph_completes() {
    let mut backend = SimulatorBackend::new().with_shots(16).with_seed(1);
    let runner = QaoaRunner::new(Graph::new(0, []).unwrap()).with_maxiter(2);

    let solution = runner.run(&mut backend).unwrap();

    assert_eq!(solution.best_bitstring, "");
    assert_eq!(solution.cut_size, 0);
    assert!(solution.set_s.is_empty() && solution.set_t.is_empty());
    assert_eq!(solution.approximation_ratio, Some(1.0));
    assert_eq!(solution.counts.get(""), 16);
}
