//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::error::IrResult;
use crate::gate::{GateCategory, GateKind};
use crate::qubit::QubitId;
use crate::unitary::{self, Matrix};

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A quantum gate operation.
    Gate(GateKind),
    /// Barrier: blocks every wire between its lowest and highest operand.
    Barrier,
}

/// A complete instruction with operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Qubits this instruction operates on, in declared order.
    pub qubits: Vec<QubitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: impl Into<GateKind>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate.into()),
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a barrier instruction.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a barrier.
    pub fn is_barrier(&self) -> bool {
        matches!(self.kind, InstructionKind::Barrier)
    }

    /// Get the gate if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&GateKind> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            InstructionKind::Barrier => None,
        }
    }

    /// Get the mnemonic of the instruction.
    pub fn name(&self) -> String {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Barrier => "barrier".into(),
        }
    }

    /// Operand positions in declared order.
    pub fn positions(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Inclusive `(min, max)` qubit range blocked by this instruction.
    pub fn span(&self) -> Option<(QubitId, QubitId)> {
        let lo = self.qubits.iter().min()?;
        let hi = self.qubits.iter().max()?;
        Some((*lo, *hi))
    }

    /// Structural category of the instruction.
    pub fn category(&self) -> GateCategory {
        match &self.kind {
            InstructionKind::Gate(g) => g.category(),
            InstructionKind::Barrier => GateCategory::Barrier,
        }
    }

    /// Parameters, or `None` for fixed gates and barriers.
    pub fn parameters(&self) -> Option<Vec<f64>> {
        let params = self.as_gate()?.parameters();
        (!params.is_empty()).then_some(params)
    }

    /// Operator of the instruction, ordered by ascending qubit index.
    ///
    /// Returns `None` for barriers. The matching qubit list is
    /// [`sorted_qubits`](Self::sorted_qubits).
    pub fn matrix(&self) -> IrResult<Option<Matrix>> {
        let Some(gate) = self.as_gate() else {
            return Ok(None);
        };
        let positions: Vec<u32> = self.qubits.iter().map(|q| q.0).collect();
        let matrix = match gate {
            GateKind::Standard(g) => unitary::reorder_matrix(&g.matrix(), &positions)?,
            GateKind::Controlled(g) => {
                let (controls, targets) = positions.split_at(g.num_controls.min(positions.len()));
                unitary::controlled_embedding(controls, targets, &g.target_matrix())?
            }
        };
        Ok(Some(matrix))
    }

    /// Matrix on the target qubits only, optionally with reversed axis order.
    pub fn target_matrix(&self, reverse: bool) -> IrResult<Option<Matrix>> {
        let Some(gate) = self.as_gate() else {
            return Ok(None);
        };
        let (matrix, width) = match gate {
            GateKind::Standard(g) => (g.matrix(), g.num_qubits()),
            GateKind::Controlled(g) => (g.target_matrix(), g.base.num_qubits()),
        };
        if reverse && width > 1 {
            return unitary::reverse_order(&matrix).map(Some);
        }
        Ok(Some(matrix))
    }

    /// Operands sorted ascending, the row/column order of [`matrix`](Self::matrix).
    pub fn sorted_qubits(&self) -> Vec<QubitId> {
        let mut qubits = self.qubits.clone();
        qubits.sort_unstable();
        qubits
    }
}
