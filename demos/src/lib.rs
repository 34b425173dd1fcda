//! MAXCUT-QAOA Demo
//!
//! Support code for the `demo-qaoa` binary: file-based run configuration
//! ([`config`]) and the console presentation helpers shared by its output.

pub mod config;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

pub use config::{ConfigError, GraphSource, OptimizerKind, RunConfig};

/// Open-ended progress counter for circuit evaluations.
///
/// Minimizers spend a varying number of evaluations per iteration, so the
/// total is not known up front.
pub fn create_evaluation_spinner(message: &str) -> ProgressBar {
    let template = "{spinner:.green} [{elapsed_precise}] {pos} evaluations {msg}";
    let bar_style = ProgressStyle::with_template(template)
        .map_or_else(|_| ProgressStyle::default_spinner(), |s| s.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
    let pb = ProgressBar::new_spinner().with_style(bar_style);
    pb.set_message(message.to_owned());
    pb
}

const RULE_WIDTH: usize = 60;

/// Boxed banner at the top of the report.
pub fn print_header(title: &str) {
    let rule = style("═".repeat(RULE_WIDTH)).cyan();
    println!("\n{rule}\n{}\n{rule}\n", style(format!("  {title}")).cyan().bold());
}

pub fn print_section(title: &str) {
    println!("\n{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(RULE_WIDTH / 3 * 2)).dim());
}

/// Indented `label: value` line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {value}", style(format!("{label}:")).dim());
}

pub fn print_success(message: &str) {
    println!("{} {message}", style("✓").green().bold());
}

pub fn print_warning(message: &str) {
    println!("{} {message}", style("!").yellow().bold());
}

pub fn print_info(message: &str) {
    println!("{} {message}", style("ℹ").blue());
}

/// Render a partition as `{a, b} | {c, d}`.
pub fn format_partition(set_s: &[usize], set_t: &[usize]) -> String {
    let join = |nodes: &[usize]| {
        nodes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!("{{{}}} | {{{}}}", join(set_s), join(set_t))
}
