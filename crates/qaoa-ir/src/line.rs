//! Register line identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a register line (one per graph node).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineId(pub u32);

impl LineId {
    /// The line index as a `usize`, for indexing node-ordered data.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for LineId {
    fn from(id: u32) -> Self {
        LineId(id)
    }
}

impl TryFrom<usize> for LineId {
    type Error = std::num::TryFromIntError;

    fn try_from(id: usize) -> Result<Self, Self::Error> {
        u32::try_from(id).map(LineId)
    }
}
