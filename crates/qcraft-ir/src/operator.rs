//! Per-gate operators handed to a simulator.

use serde::Serialize;

use crate::error::IrResult;
use crate::instruction::Instruction;
use crate::qubit::QubitId;
use crate::unitary::{self, EPSILON, Matrix};

/// Fully reordered operator of one gate together with its absolute qubits.
///
/// Row and column order of `matrix` follow `qubits`, which are ascending.
/// Composing operators into a full-register evolution is left to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateOperator {
    /// Gate mnemonic.
    pub name: String,
    /// Operator of side `2^qubits.len()`.
    pub matrix: Matrix,
    /// Qubits the matrix acts on, ascending.
    pub qubits: Vec<QubitId>,
}

impl GateOperator {
    /// Build the operator of a gate instruction, `None` for barriers.
    pub fn from_instruction(instruction: &Instruction) -> IrResult<Option<Self>> {
        let Some(matrix) = instruction.matrix()? else {
            return Ok(None);
        };
        Ok(Some(Self {
            name: instruction.name(),
            matrix,
            qubits: instruction.sorted_qubits(),
        }))
    }

    /// Number of qubits acted on.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Check unitarity within the crate tolerance.
    pub fn is_unitary(&self) -> bool {
        unitary::is_unitary(&self.matrix, EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{ControlledGate, StandardGate};

    #[test]
    fn test_barrier_has_no_operator() {
        let inst = Instruction::barrier([QubitId(0), QubitId(1)]);
        assert!(GateOperator::from_instruction(&inst).unwrap().is_none());
    }

    #[test]
    fn test_toffoli_operator() {
        let inst = Instruction::gate(
            ControlledGate::new(2, StandardGate::X),
            [QubitId(4), QubitId(2), QubitId(3)],
        );
        let op = GateOperator::from_instruction(&inst).unwrap().unwrap();
        assert_eq!(op.name, "ccx");
        assert_eq!(op.num_qubits(), 3);
        assert_eq!(op.qubits, vec![QubitId(2), QubitId(3), QubitId(4)]);
        assert_eq!(op.matrix.dim(), (8, 8));
        assert!(op.is_unitary());
    }
}
