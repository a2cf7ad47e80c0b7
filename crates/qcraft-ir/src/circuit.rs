//! High-level circuit builder API.

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::{IrError, IrResult};
use crate::gate::{ControlledGate, GateKind, StandardGate};
use crate::instruction::{Instruction, InstructionKind};
use crate::layout::LayeredCircuit;
use crate::measure::MeasureMap;
use crate::operator::GateOperator;
use crate::qubit::{ClbitId, QubitId};

/// Shot count used until a measurement call sets one.
pub const DEFAULT_SHOTS: u32 = 1000;

/// A quantum circuit over a fixed register.
///
/// The instruction list is the single source of truth; layouts, operators and
/// QASM text are recomputed from it on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Circuit {
    /// Register size.
    num_qubits: u32,
    /// Instructions in program order.
    instructions: Vec<Instruction>,
    /// Measured qubit to classical bit.
    measures: MeasureMap,
    /// Number of repetitions requested from a runner.
    shots: u32,
    /// Whether the measurement is part of a tomography run.
    tomography: bool,
}

impl Circuit {
    /// Create an empty circuit measuring every qubit onto the same-indexed bit.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            instructions: vec![],
            measures: MeasureMap::identity(num_qubits),
            shots: DEFAULT_SHOTS,
            tomography: false,
        }
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply identity gate.
    pub fn id(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Id, &[qubit])
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::H, &[qubit])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::X, &[qubit])
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Y, &[qubit])
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Z, &[qubit])
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::S, &[qubit])
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Sdg, &[qubit])
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::T, &[qubit])
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Tdg, &[qubit])
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::SX, &[qubit])
    }

    /// Apply sqrt(Y) gate.
    pub fn sy(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::SY, &[qubit])
    }

    /// Apply W gate.
    pub fn w(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::W, &[qubit])
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Rx(theta), &[qubit])
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Ry(theta), &[qubit])
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Rz(theta), &[qubit])
    }

    /// Apply phase gate.
    pub fn p(&mut self, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::P(lambda), &[qubit])
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT gate.
    pub fn cnot(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.controlled(&[control], StandardGate::X, &[target])
    }

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.cnot(control, target)
    }

    /// Apply CY gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.controlled(&[control], StandardGate::Y, &[target])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.controlled(&[control], StandardGate::Z, &[target])
    }

    /// Apply controlled-S gate.
    pub fn cs(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.controlled(&[control], StandardGate::S, &[target])
    }

    /// Apply controlled-T gate.
    pub fn ct(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.controlled(&[control], StandardGate::T, &[target])
    }

    /// Apply controlled-Hadamard gate.
    pub fn ch(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.controlled(&[control], StandardGate::H, &[target])
    }

    /// Apply controlled-phase gate.
    pub fn cp(&mut self, lambda: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.controlled(&[control], StandardGate::P(lambda), &[target])
    }

    /// Apply controlled-Rx gate.
    pub fn crx(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.controlled(&[control], StandardGate::Rx(theta), &[target])
    }

    /// Apply controlled-Ry gate.
    pub fn cry(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.controlled(&[control], StandardGate::Ry(theta), &[target])
    }

    /// Apply controlled-Rz gate.
    pub fn crz(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.controlled(&[control], StandardGate::Rz(theta), &[target])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Swap, &[q1, q2])
    }

    /// Apply iSWAP gate.
    pub fn iswap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::ISwap, &[q1, q2])
    }

    /// Apply RXX (XX rotation) gate.
    pub fn rxx(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Rxx(theta), &[q1, q2])
    }

    /// Apply RYY (YY rotation) gate.
    pub fn ryy(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Ryy(theta), &[q1, q2])
    }

    /// Apply RZZ (ZZ rotation) gate.
    pub fn rzz(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.standard(StandardGate::Rzz(theta), &[q1, q2])
    }

    // =========================================================================
    // Multi-controlled gates
    // =========================================================================

    /// Apply Toffoli (CCX) gate.
    pub fn toffoli(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.controlled(&[c1, c2], StandardGate::X, &[target])
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.toffoli(c1, c2, target)
    }

    /// Apply Fredkin (CSWAP) gate.
    pub fn fredkin(&mut self, control: QubitId, t1: QubitId, t2: QubitId) -> IrResult<&mut Self> {
        self.controlled(&[control], StandardGate::Swap, &[t1, t2])
    }

    /// Apply Fredkin (CSWAP) gate.
    pub fn cswap(&mut self, control: QubitId, t1: QubitId, t2: QubitId) -> IrResult<&mut Self> {
        self.fredkin(control, t1, t2)
    }

    /// Apply X on `target` conditioned on every qubit in `controls`.
    pub fn mcx(&mut self, controls: &[QubitId], target: QubitId) -> IrResult<&mut Self> {
        self.controlled(controls, StandardGate::X, &[target])
    }

    /// Apply `base` on `targets` conditioned on every qubit in `controls`.
    pub fn controlled(
        &mut self,
        controls: &[QubitId],
        base: StandardGate,
        targets: &[QubitId],
    ) -> IrResult<&mut Self> {
        let gate = ControlledGate::new(controls.len(), base);
        let qubits = controls.iter().chain(targets).copied();
        self.append(Instruction::gate(gate, qubits))
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Apply any gate to the given operands.
    pub fn gate(
        &mut self,
        gate: impl Into<GateKind>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.append(Instruction::gate(gate, qubits))
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.append(Instruction::barrier(qubits))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        self.barrier((0..self.num_qubits).map(QubitId))
    }

    /// Validate and append an instruction.
    pub fn append(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.validate(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    /// Configure the measurement, replacing any previous configuration.
    ///
    /// Qubit `qubits[i]` is read into `cbits[i]`, or into bit `i` when no
    /// explicit bits are given.
    pub fn measure(
        &mut self,
        qubits: &[QubitId],
        cbits: Option<&[ClbitId]>,
        shots: u32,
        tomography: bool,
    ) -> IrResult<&mut Self> {
        let measures: MeasureMap = match cbits {
            Some(cbits) if cbits.len() != qubits.len() => {
                return Err(IrError::MeasureLengthMismatch {
                    qubits: qubits.len(),
                    clbits: cbits.len(),
                });
            }
            Some(cbits) => qubits.iter().copied().zip(cbits.iter().copied()).collect(),
            None => qubits
                .iter()
                .copied()
                .zip((0..).map(ClbitId))
                .collect(),
        };
        self.check_operands(qubits, Some("measure"))?;
        self.measures = measures;
        self.shots = shots;
        self.tomography = tomography;
        Ok(self)
    }

    /// Replace the measurement map, keeping shots and tomography settings.
    pub fn set_measures(&mut self, measures: MeasureMap) -> IrResult<&mut Self> {
        let qubits: Vec<_> = measures.qubits().collect();
        self.check_operands(&qubits, Some("measure"))?;
        self.measures = measures;
        Ok(self)
    }

    /// Set the shot count.
    pub fn set_shots(&mut self, shots: u32) -> &mut Self {
        self.shots = shots;
        self
    }

    /// Append every instruction of `other` in order.
    ///
    /// Measurement settings of `self` are kept.
    pub fn extend_from(&mut self, other: &Circuit) -> IrResult<&mut Self> {
        if other.num_qubits != self.num_qubits {
            return Err(IrError::RegisterMismatch {
                this: self.num_qubits,
                other: other.num_qubits,
            });
        }
        self.instructions.extend(other.instructions.iter().cloned());
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Get the number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if the circuit has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// The measurement map.
    pub fn measures(&self) -> &MeasureMap {
        &self.measures
    }

    /// Get the shot count.
    pub fn shots(&self) -> u32 {
        self.shots
    }

    /// Whether the measurement is part of a tomography run.
    pub fn tomography(&self) -> bool {
        self.tomography
    }

    /// Schedule the circuit into left-justified layers.
    pub fn layered(&self) -> LayeredCircuit<'_> {
        LayeredCircuit::new(self)
    }

    /// Active qubits in ascending order.
    pub fn used_qubits(&self) -> Vec<QubitId> {
        self.layered().used_qubits()
    }

    /// Number of layers in the scheduled circuit.
    pub fn depth(&self) -> usize {
        self.layered().depth()
    }

    /// Per-gate operators in program order, barriers skipped.
    pub fn operators(&self) -> IrResult<Vec<GateOperator>> {
        self.instructions
            .iter()
            .filter_map(|inst| GateOperator::from_instruction(inst).transpose())
            .collect()
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::new(2);
        circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
        Ok(circuit)
    }

    /// Create a GHZ state circuit.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::new(n);
        if n == 0 {
            return Ok(circuit);
        }

        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }
        Ok(circuit)
    }

    // =========================================================================
    // Validation
    // =========================================================================

    fn standard(&mut self, gate: StandardGate, qubits: &[QubitId]) -> IrResult<&mut Self> {
        self.append(Instruction::gate(gate, qubits.iter().copied()))
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let name = instruction.name();
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                if gate.num_qubits() != instruction.qubits.len() {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: name,
                        expected: gate.num_qubits(),
                        got: instruction.qubits.len(),
                    });
                }
                if let Some(&value) = gate.parameters().iter().find(|v| !v.is_finite()) {
                    return Err(IrError::InvalidParameter {
                        gate_name: name,
                        value,
                    });
                }
            }
            InstructionKind::Barrier => {
                if instruction.qubits.is_empty() {
                    return Err(IrError::EmptyOperands(name));
                }
            }
        }
        self.check_operands(&instruction.qubits, Some(&name))
    }

    fn check_operands(&self, qubits: &[QubitId], gate_name: Option<&str>) -> IrResult<()> {
        let mut seen = FxHashSet::default();
        for &qubit in qubits {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit,
                    num_qubits: self.num_qubits,
                    gate_name: gate_name.map(str::to_string),
                });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.map(str::to_string),
                });
            }
        }
        Ok(())
    }
}
