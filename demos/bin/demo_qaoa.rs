//! QAOA (Quantum Approximate Optimization Algorithm) Demo
//!
//! Solves Max-Cut on a small graph with QAOA running on the local
//! statevector simulator.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use qaoa_demos::config::{GRAPH_NAMES, GraphSource, OptimizerKind, RunConfig};
use qaoa_demos::{
    create_evaluation_spinner, format_partition, print_header, print_info, print_result, print_section,
    print_success, print_warning,
};
use qaoa_hal::ExecutionBackend;
use qaoa_ir::emit_qasm;
use qaoa_maxcut::{InitStrategy, TerminationStatus, qaoa_circuit};

#[derive(Parser, Debug)]
#[command(name = "demo-qaoa")]
#[command(author, version, about = "Demonstrate QAOA for Max-Cut optimization", long_about = None)]
struct Args {
    /// Graph to optimize (square4, complete4, ring6, grid6, bipartite32, random8)
    #[arg(short, long)]
    graph: Option<String>,

    /// Number of QAOA layers
    #[arg(short = 'p', long)]
    layers: Option<usize>,

    /// Shots per circuit execution
    #[arg(short, long)]
    shots: Option<u32>,

    /// Maximum optimization iterations
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Classical optimizer
    #[arg(short, long, value_enum)]
    optimizer: Option<OptimizerKind>,

    /// Seed for sampling and stochastic optimizers
    #[arg(long, env = "QAOA_SEED")]
    seed: Option<u64>,

    /// Number of optimization starts; the largest cut wins
    #[arg(short, long)]
    restarts: Option<usize>,

    /// Parameter initialization (linear, fixed, trotterized_adiabatic, random, fourier)
    #[arg(long, value_parser = parse_init_strategy)]
    init: Option<InitStrategy>,

    /// Insert barriers between cost terms
    #[arg(long)]
    barriers: bool,

    /// Configuration file (YAML or JSON)
    #[arg(short, long, env = "QAOA_CONFIG")]
    config: Option<PathBuf>,

    /// Print the optimized circuit as OpenQASM 3
    #[arg(long)]
    emit_qasm: bool,

    /// Print the solution as JSON instead of the report
    #[arg(long)]
    json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_init_strategy(value: &str) -> Result<InitStrategy, String> {
    match value.to_lowercase().replace('-', "_").as_str() {
        "linear" => Ok(InitStrategy::Linear),
        "fixed" => Ok(InitStrategy::Fixed),
        "trotterized_adiabatic" | "tqa" => Ok(InitStrategy::TrotterizedAdiabatic),
        "random" => Ok(InitStrategy::Random),
        "fourier" => Ok(InitStrategy::Fourier),
        other => Err(format!("unknown initialization strategy '{other}'")),
    }
}

/// Layer command-line flags over the file (or default) configuration.
fn resolve_config(args: &Args) -> anyhow::Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => RunConfig::default(),
    };

    if let Some(graph) = &args.graph {
        config.graph = GraphSource::Named(graph.clone());
    }
    if let Some(layers) = args.layers {
        config.layers = layers;
    }
    if let Some(shots) = args.shots {
        config.backend.shots = shots;
    }
    if let Some(iterations) = args.iterations {
        config.maxiter = iterations;
    }
    if let Some(optimizer) = args.optimizer {
        config.optimizer = optimizer;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(restarts) = args.restarts {
        config.restarts = restarts;
    }
    if args.init.is_some() {
        config.init_strategy = args.init;
    }
    config.barriers |= args.barriers;

    config.validate()?;
    debug!(?config, "resolved run configuration");
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(&args)?;
    let graph = config.graph()?;
    let runner = config.runner(graph.clone());
    let mut backend = config.simulator()?;
    let report = !args.json;
    info!(
        nodes = graph.n_nodes(),
        edges = graph.num_edges(),
        layers = config.layers,
        optimizer = %config.optimizer,
        backend = backend.name(),
        shots = backend.shots(),
        "starting max-cut run"
    );

    if report {
        print_header("QAOA Max-Cut Optimization Demo");

        print_section("Problem Setup");
        println!("{graph}");
        print_result("Nodes", graph.n_nodes());
        print_result("Edges", graph.num_edges());
        print_result("QAOA layers (p)", config.layers);
        print_result("Max iterations", config.maxiter);
        print_result("Optimizer", config.optimizer);
        print_result("Backend", format!("{} ({} shots)", backend.name(), backend.shots()));

        match graph.max_cut_brute_force() {
            Some((bits, cut)) => {
                let (s, t) = graph.bitstring_to_partition(&bits)?;
                println!();
                print_result("Optimal cut (exact)", cut);
                print_result("Optimal partition", format_partition(&s, &t));
            }
            None => print_info("Graph too large for an exact reference"),
        }

        print_section("Running QAOA Optimization");
    }

    let solution = if config.restarts > 1 {
        if report {
            print_info(&format!("{} starts, keeping the largest cut", config.restarts));
        }
        runner.run_with_restarts(&mut backend, config.restarts)?
    } else {
        let pb = if report {
            create_evaluation_spinner("Optimizing...")
        } else {
            indicatif::ProgressBar::hidden()
        };
        let solution = runner.run_with_callback(&mut backend, |eval| {
            pb.set_position(eval.index as u64 + 1);
            pb.set_message(format!("E = {:.4}", eval.energy));
        })?;
        pb.finish_with_message("Optimization complete");
        solution
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&solution)?);
    } else {
        print_section("Results");
        print_result("Best bitstring", &solution.best_bitstring);
        print_result("Best cut found", solution.cut_size);
        print_result(
            "Best partition",
            format_partition(&solution.set_s, &solution.set_t),
        );
        if let Some(ratio) = solution.approximation_ratio {
            print_result("Approximation ratio", format!("{:.1}%", ratio * 100.0));
        }
        print_result("Final energy", format!("{:.4}", solution.final_energy));
        print_result("Iterations", solution.iterations);
        print_result("Circuit evaluations", solution.circuit_evaluations);
        println!();
        print_result("Optimal γ", format!("{:?}", solution.optimal_gamma));
        print_result("Optimal β", format!("{:?}", solution.optimal_beta));

        if solution.status == TerminationStatus::IterationLimit {
            print_warning("Optimizer stopped at its iteration budget");
        }
        match solution.approximation_ratio {
            Some(ratio) if ratio >= 1.0 => print_success("Found optimal solution!"),
            Some(_) => print_info("Higher p or more iterations may improve results"),
            None => {}
        }
    }

    if args.emit_qasm {
        let program = qaoa_circuit(&graph, &solution.optimal_beta, &solution.optimal_gamma)?;
        if report {
            print_section("Optimized Circuit (OpenQASM 3)");
        }
        print!("{}", emit_qasm(&program));
    }

    if report {
        println!();
        print_info(&format!("Available graphs: {}", GRAPH_NAMES.join(", ")));
    }

    Ok(())
}
