//! Backend failures.

use thiserror::Error;

/// Ways an execution backend can refuse or fail a program.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// The backend cannot take work right now.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The program is malformed for execution, e.g. it never measures.
    #[error("program rejected: {0}")]
    InvalidCircuit(String),

    /// The program needs more lines than the backend offers.
    #[error("program too large for backend: {0}")]
    CircuitTooLarge(String),

    /// Shot count outside what the backend accepts.
    #[error("bad shot count: {0}")]
    InvalidShots(String),

    /// A `BackendConfig` entry is missing or has the wrong type.
    #[error("backend configuration: {0}")]
    Configuration(String),

    /// Any other failure reported by the backend while running.
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Shorthand for fallible backend calls.
pub type HalResult<T> = Result<T, HalError>;
