//! Layering scheduler.
//!
//! Converts the flat instruction list of a [`Circuit`] into a grid with one
//! row per active qubit and one column per layer. Multi-qubit gates and
//! barriers occupy every wire between their lowest and highest operand, and
//! all wires in that span are left-justified to the same column before the
//! gate is placed, so program order is never reordered across overlapping
//! wires.

use serde::Serialize;
use tracing::debug;

use crate::circuit::Circuit;
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// One wire of a layered circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerRow {
    /// Original qubit index of this wire.
    pub qubit: QubitId,
    /// One cell per layer: the index of the instruction drawn here, or `None`.
    ///
    /// A multi-qubit instruction is stored only on the row of its lowest
    /// operand; the other spanned rows hold `None` in that layer.
    pub cells: Vec<Option<usize>>,
}

/// Left-justified layered projection of a circuit.
///
/// Borrows the circuit, so it cannot outlive a mutation of it.
///
/// [`cell`](Self::cell) reads the storage grid, where a multi-qubit gate
/// appears only on its lowest wire. [`occupant`](Self::occupant) and
/// [`gates_on`](Self::gates_on) read by operand instead, so a `cx` on
/// q0, q1 is seen from both rows in the same layer.
#[derive(Debug, Clone)]
pub struct LayeredCircuit<'a> {
    circuit: &'a Circuit,
    rows: Vec<LayerRow>,
    depth: usize,
    /// Layer of each instruction, by program index.
    placed: Vec<Option<usize>>,
}

impl<'a> LayeredCircuit<'a> {
    /// Schedule `circuit`.
    pub fn new(circuit: &'a Circuit) -> Self {
        let num_qubits = circuit.num_qubits() as usize;
        let mut wires: Vec<Vec<Option<usize>>> = vec![Vec::new(); num_qubits];
        let mut active = vec![false; num_qubits];

        for (index, inst) in circuit.instructions().iter().enumerate() {
            let Some((lo, hi)) = inst.span() else {
                continue;
            };
            let (lo, hi) = (lo.index(), hi.index());

            if inst.is_gate() && inst.category().is_single_qubit() {
                wires[lo].push(Some(index));
                active[lo] = true;
                continue;
            }

            wires[lo].push(Some(index));
            for wire in &mut wires[lo + 1..=hi] {
                wire.push(None);
            }
            if inst.is_gate() {
                for q in &inst.qubits {
                    active[q.index()] = true;
                }
            }

            let max_layer = wires[lo..=hi].iter().map(Vec::len).max().unwrap_or(0);
            for wire in &mut wires[lo..=hi] {
                let len = wire.len();
                if len < max_layer {
                    let at = len - 1;
                    wire.splice(at..at, std::iter::repeat_n(None, max_layer - len));
                }
            }
        }

        for q in circuit.measures().qubits() {
            if let Some(flag) = active.get_mut(q.index()) {
                *flag = true;
            }
        }

        let depth = wires.iter().map(Vec::len).max().unwrap_or(0);
        let mut placed = vec![None; circuit.len()];
        for wire in &wires {
            for (layer, cell) in wire.iter().enumerate() {
                if let Some(index) = *cell {
                    placed[index] = Some(layer);
                }
            }
        }
        let rows: Vec<LayerRow> = wires
            .into_iter()
            .enumerate()
            .filter(|(q, _)| active[*q])
            .map(|(q, mut cells)| {
                cells.resize(depth, None);
                LayerRow {
                    qubit: QubitId(q as u32),
                    cells,
                }
            })
            .collect();

        debug!(
            instructions = circuit.len(),
            rows = rows.len(),
            depth,
            "layered circuit"
        );

        Self {
            circuit,
            rows,
            depth,
            placed,
        }
    }

    /// The scheduled circuit.
    pub fn circuit(&self) -> &'a Circuit {
        self.circuit
    }

    /// Rows in ascending qubit order.
    pub fn rows(&self) -> &[LayerRow] {
        &self.rows
    }

    /// Number of layers.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Active qubits in ascending order.
    pub fn used_qubits(&self) -> Vec<QubitId> {
        self.rows.iter().map(|r| r.qubit).collect()
    }

    /// Row index of `qubit`, if it is active.
    pub fn row_of(&self, qubit: QubitId) -> Option<usize> {
        self.rows.binary_search_by_key(&qubit, |r| r.qubit).ok()
    }

    /// Instruction stored at `(row, layer)` of the storage grid.
    pub fn cell(&self, row: usize, layer: usize) -> Option<&'a Instruction> {
        let index = (*self.rows.get(row)?.cells.get(layer)?)?;
        self.circuit.instructions().get(index)
    }

    /// Instructions of one layer as `(qubit, instruction)` pairs.
    pub fn layer(&self, layer: usize) -> impl Iterator<Item = (QubitId, &'a Instruction)> + '_ {
        self.rows.iter().enumerate().filter_map(move |(row, r)| {
            self.cell(row, layer).map(|inst| (r.qubit, inst))
        })
    }

    /// Layer in which the instruction at `index` was placed.
    pub fn layer_of(&self, index: usize) -> Option<usize> {
        self.placed.get(index).copied().flatten()
    }

    /// Instruction acting on the qubit of `row` in `layer`.
    ///
    /// Unlike [`cell`](Self::cell), this finds a multi-qubit gate from any of
    /// its operand rows. Rows that are only spanned read `None`.
    pub fn occupant(&self, row: usize, layer: usize) -> Option<&'a Instruction> {
        let qubit = self.rows.get(row)?.qubit;
        self.circuit
            .instructions()
            .iter()
            .zip(&self.placed)
            .find(|(inst, l)| **l == Some(layer) && inst.qubits.contains(&qubit))
            .map(|(inst, _)| inst)
    }

    /// One cell per layer holding the instruction that lists `qubit` as an
    /// operand in that layer.
    pub fn gates_on(&self, qubit: QubitId) -> Vec<Option<&'a Instruction>> {
        let mut cells = vec![None; self.depth];
        for (inst, layer) in self.circuit.instructions().iter().zip(&self.placed) {
            if let Some(l) = *layer {
                if inst.qubits.contains(&qubit) {
                    cells[l] = Some(inst);
                }
            }
        }
        cells
    }
}
