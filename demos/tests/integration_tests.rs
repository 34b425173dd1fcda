//! Integration tests for the demo configuration.
//!
//! These tests drive full runs from configuration documents against the
//! seeded simulator, the same path the binary takes.

use qaoa_demos::config::{GRAPH_NAMES, named_graph};
use qaoa_demos::{OptimizerKind, RunConfig};
use qaoa_hal::ExecutionBackend;

#[test]
fn test_every_named_graph_resolves() {
    for name in GRAPH_NAMES {
        let graph = named_graph(name, 1).unwrap();
        assert!(graph.n_nodes() >= 4, "{name}");
    }
    assert!(named_graph("petersen", 1).is_err());
}

#[test]
fn test_yaml_run_end_to_end() {
    let yaml = r"
graph: square4
layers: 1
maxiter: 15
seed: 21
backend:
  name: simulator
  shots: 256
";
    let config = RunConfig::from_yaml_str(yaml).unwrap();
    let graph = config.graph().unwrap();
    let mut backend = config.simulator().unwrap();
    assert_eq!(backend.shots(), 256);

    let solution = config.runner(graph).run(&mut backend).unwrap();
    assert_eq!(solution.cut_size, 4);
    assert_eq!(solution.counts.total_shots(), 256);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let json = r#"{ "graph": "ring6", "maxiter": 8, "optimizer": "spsa", "seed": 4,
                   "backend": { "name": "simulator", "shots": 128 } }"#;
    let config = RunConfig::from_json_str(json).unwrap();
    assert_eq!(config.optimizer, OptimizerKind::Spsa);

    let run = || {
        let mut backend = config.simulator().unwrap();
        config
            .runner(config.graph().unwrap())
            .run(&mut backend)
            .unwrap()
    };
    let a = run();
    let b = run();
    assert_eq!(a.best_bitstring, b.best_bitstring);
    assert_eq!(a.optimal_beta, b.optimal_beta);
    assert_eq!(a.counts, b.counts);
}

#[test]
fn test_solution_serializes() {
    let config = RunConfig::from_yaml_str("maxiter: 3\nseed: 2\nbackend: { name: sim, shots: 64 }")
        .unwrap();
    let mut backend = config.simulator().unwrap();
    let solution = config
        .runner(config.graph().unwrap())
        .run(&mut backend)
        .unwrap();

    let value = serde_json::to_value(&solution).unwrap();
    assert_eq!(value["best_bitstring"].as_str().unwrap().len(), 4);
    assert!(value["counts"].is_object());
    assert_eq!(value["status"], "iteration_limit");
}
