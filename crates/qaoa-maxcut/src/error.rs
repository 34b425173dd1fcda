//! Error types for the MAXCUT-QAOA core.

use qaoa_hal::HalError;
use qaoa_ir::IrError;
use thiserror::Error;

/// Errors raised while constructing a [`Graph`](crate::problems::Graph).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum GraphError {
    /// An edge references a node outside `0..n_nodes`.
    #[error("Edge ({a}, {b}) references a node outside 0..{n_nodes}")]
    NodeOutOfRange {
        /// First endpoint.
        a: usize,
        /// Second endpoint.
        b: usize,
        /// Number of nodes in the graph.
        n_nodes: usize,
    },

    /// An edge connects a node to itself.
    #[error("Self-loop on node {0}")]
    SelfLoop(usize),

    /// The same unordered pair appears twice.
    #[error("Duplicate edge ({a}, {b})")]
    DuplicateEdge {
        /// First endpoint.
        a: usize,
        /// Second endpoint.
        b: usize,
    },

    /// More nodes than register lines can address.
    #[error("Graph with {0} nodes exceeds the addressable line count")]
    TooManyNodes(usize),
}

/// Errors that can occur in the QAOA workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QaoaError {
    /// β and γ have different lengths.
    #[error("Parameter mismatch: beta has {beta} entries, gamma has {gamma}")]
    ParameterMismatch {
        /// Length of β.
        beta: usize,
        /// Length of γ.
        gamma: usize,
    },

    /// A flattened parameter vector does not have length `2p`.
    #[error("Expected {expected} parameters, got {got}")]
    ParameterLength {
        /// Required length.
        expected: usize,
        /// Provided length.
        got: usize,
    },

    /// The outcome distribution has a total count of zero.
    #[error("Outcome distribution is empty")]
    EmptyDistribution,

    /// A bitstring does not have one bit per node.
    #[error("Bitstring has {got} bits, graph has {expected} nodes")]
    BitstringLength {
        /// Number of graph nodes.
        expected: usize,
        /// Length of the bitstring.
        got: usize,
    },

    /// A bitstring contains something other than '0' or '1'.
    #[error("Invalid bit '{0}' in bitstring")]
    InvalidBit(char),

    /// Invalid graph.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Circuit construction failed.
    #[error("Circuit construction failed: {0}")]
    Ir(#[from] IrError),

    /// The execution backend failed.
    #[error("Backend execution failed: {0}")]
    Backend(#[from] HalError),
}

/// Result type for QAOA operations.
pub type QaoaResult<T> = Result<T, QaoaError>;
