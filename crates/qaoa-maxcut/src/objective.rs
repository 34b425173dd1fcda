//! Classical Max-Cut objective and outcome post-processing.
//!
//! All functions here take node-ordered bitstrings: character `i` is the
//! side node `i` was measured on. Raw backend counts must go through
//! [`normalize_bit_order`] first.

use qaoa_hal::Counts;

use crate::error::{QaoaError, QaoaResult};
use crate::problems::Graph;

/// Reverse every bitstring in a distribution.
///
/// Backends report line 0 as the rightmost character; this makes
/// character `i` correspond to node `i`. Counts and iteration order are
/// preserved, and applying it twice returns the original distribution.
pub fn normalize_bit_order(counts: &Counts) -> Counts {
    counts
        .iter()
        .map(|(bits, n)| (bits.chars().rev().collect::<String>(), n))
        .collect()
}

/// Signed cut value: −1 for every edge whose endpoints differ.
///
/// Always `<= 0`; its negation is the number of cut edges.
pub fn cut_value(bitstring: &str, graph: &Graph) -> QaoaResult<i64> {
    let assignment = graph.parse_assignment(bitstring)?;
    Ok(-(graph.cut_size(&assignment) as i64))
}

/// Number of edges cut by a bitstring (`-cut_value`).
pub fn cut_size(bitstring: &str, graph: &Graph) -> QaoaResult<usize> {
    let assignment = graph.parse_assignment(bitstring)?;
    Ok(graph.cut_size(&assignment))
}

/// Occurrence-weighted mean of [`cut_value`] over a distribution.
pub fn energy(counts: &Counts, graph: &Graph) -> QaoaResult<f64> {
    let total = counts.total_shots();
    if total == 0 {
        return Err(QaoaError::EmptyDistribution);
    }

    let mut weighted = 0.0;
    for (bits, n) in counts.iter() {
        weighted += n as f64 * cut_value(bits, graph)? as f64;
    }
    Ok(weighted / total as f64)
}

/// The bitstring with the smallest [`cut_value`].
///
/// Ties keep the bitstring seen first in iteration order.
pub fn best_outcome(counts: &Counts, graph: &Graph) -> QaoaResult<(String, i64)> {
    if counts.total_shots() == 0 {
        return Err(QaoaError::EmptyDistribution);
    }

    let mut best: Option<(&str, i64)> = None;
    for (bits, _) in counts.iter() {
        let value = cut_value(bits, graph)?;
        if best.is_none_or(|(_, v)| value < v) {
            best = Some((bits, value));
        }
    }
    best.map(|(bits, value)| (bits.to_string(), value))
        .ok_or(QaoaError::EmptyDistribution)
}
