//! Problem definitions.

pub mod maxcut;

pub use maxcut::{Graph, MAX_BRUTE_FORCE_NODES};
