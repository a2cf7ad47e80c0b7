//! Measurement configuration of a circuit.

use serde::{Deserialize, Serialize};

use crate::qubit::{ClbitId, QubitId};

/// Insertion-ordered map from measured qubit to classical bit.
///
/// Keys are unique; inserting an existing qubit overwrites its bit in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureMap {
    entries: Vec<(QubitId, ClbitId)>,
}

impl MeasureMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity map `q[i] -> c[i]` over the first `num_qubits` qubits.
    pub fn identity(num_qubits: u32) -> Self {
        (0..num_qubits).map(|i| (QubitId(i), ClbitId(i))).collect()
    }

    /// Insert or overwrite the bit measured from `qubit`.
    pub fn insert(&mut self, qubit: QubitId, clbit: ClbitId) {
        match self.entries.iter_mut().find(|(q, _)| *q == qubit) {
            Some(entry) => entry.1 = clbit,
            None => self.entries.push((qubit, clbit)),
        }
    }

    /// Classical bit for `qubit`, if measured.
    pub fn get(&self, qubit: QubitId) -> Option<ClbitId> {
        self.entries
            .iter()
            .find(|(q, _)| *q == qubit)
            .map(|&(_, c)| c)
    }

    /// Check whether `qubit` is measured.
    pub fn contains(&self, qubit: QubitId) -> bool {
        self.get(qubit).is_some()
    }

    /// Number of measured qubits.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no qubit is measured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(qubit, clbit)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (QubitId, ClbitId)> + '_ {
        self.entries.iter().copied()
    }

    /// Measured qubits in insertion order.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.entries.iter().map(|&(q, _)| q)
    }

    /// Measured qubits ordered by their classical bit, the order in which
    /// result bitstrings are read.
    pub fn qubits_by_clbit(&self) -> Vec<QubitId> {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|&(_, c)| c);
        entries.into_iter().map(|(q, _)| q).collect()
    }
}

impl FromIterator<(QubitId, ClbitId)> for MeasureMap {
    fn from_iter<I: IntoIterator<Item = (QubitId, ClbitId)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (q, c) in iter {
            map.insert(q, c);
        }
        map
    }
}
