//! Measurement outcome distributions.

use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};

/// Measurement counts: bitstring → number of occurrences.
///
/// Iteration follows first-insertion order. Re-inserting an existing
/// bitstring accumulates its count without moving it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counts {
    entries: Vec<(String, u64)>,
    index: FxHashMap<String, usize>,
}

impl Counts {
    /// Create an empty distribution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        let bitstring = bitstring.into();
        if let Some(&pos) = self.index.get(&bitstring) {
            self.entries[pos].1 += count;
        } else {
            self.index.insert(bitstring.clone(), self.entries.len());
            self.entries.push((bitstring, count));
        }
    }

    /// Get the count for a bitstring (zero if never observed).
    pub fn get(&self, bitstring: &str) -> u64 {
        self.index
            .get(bitstring)
            .map_or(0, |&pos| self.entries[pos].1)
    }

    /// Iterate over `(bitstring, count)` pairs in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of distinct bitstrings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no bitstring has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total_shots(&self) -> u64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    /// The bitstring with the highest count (first seen wins ties).
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        let mut best: Option<(&str, u64)> = None;
        for (k, v) in self.iter() {
            if best.is_none_or(|(_, bv)| v > bv) {
                best = Some((k, v));
            }
        }
        best
    }

    /// Empirical probability of every bitstring, in iteration order.
    pub fn probabilities(&self) -> Vec<(&str, f64)> {
        let total = self.total_shots();
        if total == 0 {
            return vec![];
        }
        self.iter()
            .map(|(k, v)| (k, v as f64 / total as f64))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counts = Counts::new();
        for (k, v) in iter {
            counts.insert(k, v);
        }
        counts
    }
}

impl Serialize for Counts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
