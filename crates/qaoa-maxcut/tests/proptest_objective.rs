//! Property-based tests for the Max-Cut objective.

use proptest::prelude::*;
use qaoa_hal::Counts;
use qaoa_maxcut::{Graph, cut_value, energy, normalize_bit_order};

/// A random graph together with a bitstring over its nodes.
fn arb_graph_and_bits() -> impl Strategy<Value = (Graph, String)> {
    (2_usize..=8, 0.0_f64..=1.0, any::<u64>()).prop_flat_map(|(n, p, seed)| {
        let graph = Graph::random(n, p, seed);
        (
            Just(graph),
            prop::collection::vec(prop::bool::ANY, n)
                .prop_map(|bits| bits.iter().map(|&b| if b { '1' } else { '0' }).collect()),
        )
    })
}

/// Distinct bitstrings of one width with positive counts.
fn arb_counts(width: usize) -> impl Strategy<Value = Vec<(String, u64)>> {
    prop::collection::btree_map(0_usize..(1 << width), 1_u64..500, 1..10).prop_map(move |m| {
        m.into_iter()
            .map(|(mask, n)| (format!("{mask:0width$b}"), n))
            .collect()
    })
}

proptest! {
    /// The cut value is minus the number of edges with differing endpoints.
    #[test]
    fn test_cut_value_counts_cut_edges((graph, bits) in arb_graph_and_bits()) {
        let chars: Vec<char> = bits.chars().collect();
        let crossing = graph
            .edges()
            .iter()
            .filter(|(a, b)| chars[*a] != chars[*b])
            .count() as i64;

        let value = cut_value(&bits, &graph).unwrap();
        prop_assert!(value <= 0);
        prop_assert_eq!(value, -crossing);
    }

    /// Flipping every bit leaves the cut unchanged.
    #[test]
    fn test_cut_value_symmetric_under_complement((graph, bits) in arb_graph_and_bits()) {
        let flipped: String = bits.chars().map(|c| if c == '0' { '1' } else { '0' }).collect();
        prop_assert_eq!(cut_value(&bits, &graph).unwrap(), cut_value(&flipped, &graph).unwrap());
    }

    /// Normalizing twice returns the original distribution.
    #[test]
    fn test_normalize_is_involution(entries in arb_counts(5)) {
        let counts: Counts = entries.into_iter().collect();
        prop_assert_eq!(normalize_bit_order(&normalize_bit_order(&counts)), counts);
    }

    /// Energy does not depend on the order outcomes were recorded in.
    #[test]
    fn test_energy_order_independent(entries in arb_counts(4)) {
        let graph = Graph::square_4();
        let forward: Counts = entries.iter().cloned().collect();
        let backward: Counts = entries.iter().rev().cloned().collect();

        let a = energy(&forward, &graph).unwrap();
        let b = energy(&backward, &graph).unwrap();
        prop_assert!((a - b).abs() < 1e-9);
        prop_assert!(a <= 0.0 && a >= -(graph.num_edges() as f64));
    }
}
