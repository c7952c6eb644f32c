//! Measurement count histograms.
//!
//! Bitstring ordering: the rightmost bit corresponds to the
//! lowest-indexed qubit (OpenQASM 3 convention). The string `"01"` means
//! qubit 0 measured `1` and qubit 1 measured `0`. In a bitstring of
//! length `n`, qubit `q` is the character at index `n - 1 - q`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Measurement counts from one circuit execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create counts from `(bitstring, count)` pairs. Duplicates are summed.
    pub fn from_pairs(iter: impl IntoIterator<Item = (impl Into<String>, u64)>) -> Self {
        let mut counts = Self::new();
        for (k, v) in iter {
            counts.insert(k, v);
        }
        counts
    }

    /// Add `count` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_default() += count;
    }

    /// Count recorded for `bitstring`.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Iterate over `(bitstring, count)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Sum of all counts.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Most frequent bitstring.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.iter().max_by_key(|&(_, count)| count)
    }

    /// Relative frequency of each bitstring.
    #[allow(clippy::cast_precision_loss)]
    pub fn probabilities(&self) -> FxHashMap<String, f64> {
        let total = self.total_shots() as f64;
        if total == 0.0 {
            return FxHashMap::default();
        }
        self.counts
            .iter()
            .map(|(k, &v)| (k.clone(), v as f64 / total))
            .collect()
    }

    /// Number of distinct bitstrings.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no outcome was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(String, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Character index of `qubit` within a bitstring of length `len`.
///
/// Returns `None` when the qubit is outside the bitstring.
#[inline]
pub fn bit_index(len: usize, qubit: usize) -> Option<usize> {
    (qubit < len).then(|| len - 1 - qubit)
}

/// Render a basis state, given per-qubit outcomes, as a bitstring.
///
/// `bits[q]` is the outcome of qubit `q`; the result has qubit 0 rightmost.
pub fn bitstring_from_qubits(bits: &[bool]) -> String {
    bits.iter().rev().map(|&b| if b { '1' } else { '0' }).collect()
}
