//! Execution result types.
//!
//! Bitstring ordering: character `j` of a bitstring is classical bit `j`,
//! so the leftmost character is bit 0. The string `"01"` means bit 0 read
//! `0` and bit 1 read `1`.

use qcraft_ir::MeasureMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::observable::MeasureBasis;

/// Measurement counts from circuit execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    /// Map from bitstring to count.
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create empty counts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create counts from an iterator of (bitstring, count) pairs.
    /// Duplicate bitstrings are summed.
    pub fn from_pairs(iter: impl IntoIterator<Item = (impl Into<String>, u64)>) -> Self {
        let mut counts = Self::new();
        for (k, v) in iter {
            counts.insert(k, v);
        }
        counts
    }

    /// Insert a count for a bitstring.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_default() += count;
    }

    /// Get the count for a bitstring.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Iterate over (bitstring, count) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.counts.iter()
    }

    /// Get the total number of shots.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Get the most frequent bitstring. Ties go to the smaller bitstring.
    pub fn most_frequent(&self) -> Option<(&String, &u64)> {
        self.counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
    }

    /// Get probabilities for each bitstring.
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

    /// Get sorted counts (by count descending, then bitstring).
    pub fn sorted(&self) -> Vec<(&String, &u64)> {
        let mut items: Vec<_> = self.counts.iter().collect();
        items.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        items
    }

    /// Get the number of unique bitstrings.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Check if counts are empty.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(String, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Result of one circuit execution.
#[derive(Debug, Clone, Serialize)]
pub struct ExecResult {
    /// Measurement counts.
    pub counts: Counts,
    /// The measurement map the circuit was run with.
    pub measures: MeasureMap,
    /// Basis rotation applied before measuring, if any.
    pub measure_base: Option<MeasureBasis>,
}

impl ExecResult {
    /// Create a result measured in the computational basis.
    pub fn new(counts: Counts, measures: MeasureMap) -> Self {
        Self {
            counts,
            measures,
            measure_base: None,
        }
    }

    /// Get probabilities for each bitstring.
    pub fn probabilities(&self) -> FxHashMap<String, f64> {
        self.counts.probabilities()
    }

    /// Get the most frequent outcome with its probability.
    #[allow(clippy::cast_precision_loss)]
    pub fn most_frequent(&self) -> Option<(&String, f64)> {
        let total = self.counts.total_shots() as f64;
        if total == 0.0 {
            return None;
        }
        self.counts
            .most_frequent()
            .map(|(s, &c)| (s, c as f64 / total))
    }

    /// Expectation of the Z-parity over the given classical bit positions.
    ///
    /// Each outcome contributes its probability with sign `(-1)^k`, where `k`
    /// counts the `1`s at `positions`. Positions past the end of a bitstring
    /// read as `0`.
    pub fn calculate_obs(&self, positions: &[usize]) -> f64 {
        self.probabilities()
            .iter()
            .map(|(bits, p)| {
                let bits = bits.as_bytes();
                let ones = positions
                    .iter()
                    .filter(|&&i| bits.get(i) == Some(&b'1'))
                    .count();
                if ones % 2 == 0 { *p } else { -*p }
            })
            .sum()
    }
}
