//! Max-Cut problem definition for QAOA.
//!
//! The Max-Cut problem: Given a graph G = (V, E), partition vertices into
//! two sets S and T to maximize the number of edges between S and T.
//!
//! Nodes are the decision variables (one register line each) and edges are
//! the pairwise ZZ interaction terms of the cost Hamiltonian.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, QaoaError, QaoaResult};

/// Largest graph [`Graph::max_cut_brute_force`] will enumerate.
pub const MAX_BRUTE_FORCE_NODES: usize = 20;

/// An undirected, unweighted graph for the Max-Cut problem.
///
/// Nodes are `0..n_nodes`. Edges keep their insertion order, which is the
/// order the cost layer applies them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGraph")]
pub struct Graph {
    n_nodes: usize,
    edges: Vec<(usize, usize)>,
}

/// Unvalidated wire form of a [`Graph`].
#[derive(Deserialize)]
struct RawGraph {
    n_nodes: usize,
    edges: Vec<(usize, usize)>,
}

impl TryFrom<RawGraph> for Graph {
    type Error = GraphError;

    fn try_from(raw: RawGraph) -> Result<Self, Self::Error> {
        Graph::new(raw.n_nodes, raw.edges)
    }
}

impl Graph {
    /// Create a new graph, validating every edge.
    pub fn new(
        n_nodes: usize,
        edges: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<Self, GraphError> {
        if u32::try_from(n_nodes).is_err() {
            return Err(GraphError::TooManyNodes(n_nodes));
        }

        let mut seen = FxHashSet::default();
        let mut validated = vec![];
        for (a, b) in edges {
            if a >= n_nodes || b >= n_nodes {
                return Err(GraphError::NodeOutOfRange { a, b, n_nodes });
            }
            if a == b {
                return Err(GraphError::SelfLoop(a));
            }
            if !seen.insert((a.min(b), a.max(b))) {
                return Err(GraphError::DuplicateEdge { a, b });
            }
            validated.push((a, b));
        }

        Ok(Self {
            n_nodes,
            edges: validated,
        })
    }

    /// Build from edges known to be valid.
    fn trusted(n_nodes: usize, edges: Vec<(usize, usize)>) -> Self {
        Self { n_nodes, edges }
    }

    /// Create a 4-node square graph (simple demo case).
    ///
    /// ```text
    /// 0 --- 1
    /// |     |
    /// 3 --- 2
    /// ```
    pub fn square_4() -> Self {
        Self::trusted(4, vec![(0, 1), (1, 2), (2, 3), (3, 0)])
    }

    /// Create a 4-node complete graph K4.
    pub fn complete_4() -> Self {
        Self::trusted(4, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)])
    }

    /// Create a 6-node ring graph.
    pub fn ring_6() -> Self {
        Self::trusted(6, vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)])
    }

    /// Create a 6-node graph with cross edges.
    ///
    /// ```text
    /// 0 --- 1 --- 2
    /// |  X  |  X  |
    /// 3 --- 4 --- 5
    /// ```
    pub fn grid_6() -> Self {
        Self::trusted(
            6,
            vec![
                (0, 1),
                (1, 2),
                (3, 4),
                (4, 5),
                (0, 3),
                (1, 4),
                (2, 5),
                (0, 4),
                (1, 3),
                (1, 5),
                (2, 4),
            ],
        )
    }

    /// Create the complete bipartite graph K{a,b}.
    ///
    /// Nodes `0..a` form one side and `a..a+b` the other. Edges are listed
    /// side-A-major: `(0, a), (0, a+1), …, (a-1, a+b-1)`.
    pub fn complete_bipartite(a: usize, b: usize) -> Self {
        let edges = (0..a)
            .flat_map(|i| (a..a + b).map(move |j| (i, j)))
            .collect();
        Self::trusted(a + b, edges)
    }

    /// K{3,2}: the five-node workshop instance with an optimal cut of 6.
    pub fn bipartite_3_2() -> Self {
        Self::complete_bipartite(3, 2)
    }

    /// Create a random graph with given edge probability.
    ///
    /// Edges appear in lexicographic order, so the same seed always
    /// produces the same enumeration.
    pub fn random(n_nodes: usize, edge_probability: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let probability = edge_probability.clamp(0.0, 1.0);

        let mut edges = vec![];
        for i in 0..n_nodes {
            for j in (i + 1)..n_nodes {
                if rng.gen_bool(probability) {
                    edges.push((i, j));
                }
            }
        }

        Self::trusted(n_nodes, edges)
    }

    /// Number of nodes.
    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    /// Edges in enumeration order.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Get the number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of edges cut by an assignment.
    ///
    /// `assignment[i] = true` means node i is in set S.
    pub fn cut_size(&self, assignment: &[bool]) -> usize {
        self.edges
            .iter()
            .filter(|(a, b)| assignment[*a] != assignment[*b])
            .count()
    }

    /// Parse a node-ordered bitstring (character i is node i) into an
    /// assignment.
    pub fn parse_assignment(&self, bitstring: &str) -> QaoaResult<Vec<bool>> {
        let assignment = bitstring
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(QaoaError::InvalidBit(other)),
            })
            .collect::<QaoaResult<Vec<_>>>()?;

        if assignment.len() != self.n_nodes {
            return Err(QaoaError::BitstringLength {
                expected: self.n_nodes,
                got: assignment.len(),
            });
        }
        Ok(assignment)
    }

    /// Node-ordered bitstring for an integer mask (bit i is node i).
    pub fn mask_to_bitstring(&self, mask: usize) -> String {
        (0..self.n_nodes)
            .map(|i| if (mask >> i) & 1 == 1 { '1' } else { '0' })
            .collect()
    }

    /// Find the maximum cut by brute force.
    ///
    /// Returns the node-ordered bitstring and the cut size, or `None` when
    /// the graph has more than [`MAX_BRUTE_FORCE_NODES`] nodes.
    pub fn max_cut_brute_force(&self) -> Option<(String, usize)> {
        if self.n_nodes > MAX_BRUTE_FORCE_NODES {
            return None;
        }

        let mut best_mask = 0;
        let mut best_value = 0;
        for mask in 0..(1usize << self.n_nodes) {
            let assignment: Vec<bool> = (0..self.n_nodes).map(|i| (mask >> i) & 1 == 1).collect();
            let value = self.cut_size(&assignment);
            if value > best_value {
                best_value = value;
                best_mask = mask;
            }
        }

        Some((self.mask_to_bitstring(best_mask), best_value))
    }

    /// Convert a node-ordered bitstring to the two sides of the cut.
    ///
    /// Nodes marked `1` go to the first set.
    pub fn bitstring_to_partition(&self, bitstring: &str) -> QaoaResult<(Vec<usize>, Vec<usize>)> {
        let assignment = self.parse_assignment(bitstring)?;
        let (set_s, set_t): (Vec<usize>, Vec<usize>) =
            (0..self.n_nodes).partition(|&i| assignment[i]);
        Ok((set_s, set_t))
    }
}

impl std::fmt::Display for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Graph ({} nodes, {} edges):",
            self.n_nodes,
            self.edges.len()
        )?;
        for (a, b) in &self.edges {
            writeln!(f, "  {a} -- {b}")?;
        }
        Ok(())
    }
}
