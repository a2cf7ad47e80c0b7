//! Quantum gate types.
//!
//! A gate value describes an operation independent of where it is placed in
//! a circuit; operand positions live on [`Instruction`](crate::Instruction).

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::unitary::{self, Matrix};

/// Base gates with a known target-only matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Fixed single-qubit gates
    /// Identity gate.
    Id,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(Y) gate.
    SY,
    /// W = (X + Y) / sqrt(2).
    W,

    // Parametric single-qubit gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate.
    P(f64),

    // Fixed multi-qubit gates
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    ISwap,

    // Parametric multi-qubit gates
    /// XX rotation gate.
    Rxx(f64),
    /// YY rotation gate.
    Ryy(f64),
    /// ZZ rotation gate.
    Rzz(f64),
}

impl StandardGate {
    /// Get the mnemonic of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::Id => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SY => "sy",
            StandardGate::W => "w",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::Swap => "swap",
            StandardGate::ISwap => "iswap",
            StandardGate::Rxx(_) => "rxx",
            StandardGate::Ryy(_) => "ryy",
            StandardGate::Rzz(_) => "rzz",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> usize {
        match self {
            StandardGate::Swap
            | StandardGate::ISwap
            | StandardGate::Rxx(_)
            | StandardGate::Ryy(_)
            | StandardGate::Rzz(_) => 2,
            _ => 1,
        }
    }

    /// Get the parameters of this gate, empty for fixed gates.
    pub fn parameters(&self) -> Vec<f64> {
        match *self {
            StandardGate::Rx(v)
            | StandardGate::Ry(v)
            | StandardGate::Rz(v)
            | StandardGate::P(v)
            | StandardGate::Rxx(v)
            | StandardGate::Ryy(v)
            | StandardGate::Rzz(v) => vec![v],
            _ => vec![],
        }
    }

    /// Check if this gate carries parameters.
    pub fn is_parametric(&self) -> bool {
        !self.parameters().is_empty()
    }

    /// The matrix on the gate's own targets, in declared operand order.
    pub fn matrix(&self) -> Matrix {
        match *self {
            StandardGate::Id => unitary::identity(2),
            StandardGate::X => unitary::x(),
            StandardGate::Y => unitary::y(),
            StandardGate::Z => unitary::z(),
            StandardGate::H => unitary::h(),
            StandardGate::S => unitary::s(),
            StandardGate::Sdg => unitary::sdg(),
            StandardGate::T => unitary::t(),
            StandardGate::Tdg => unitary::tdg(),
            StandardGate::SX => unitary::sx(),
            StandardGate::SY => unitary::sy(),
            StandardGate::W => unitary::w(),
            StandardGate::Rx(theta) => unitary::rx(theta),
            StandardGate::Ry(theta) => unitary::ry(theta),
            StandardGate::Rz(theta) => unitary::rz(theta),
            StandardGate::P(lambda) => unitary::p(lambda),
            StandardGate::Swap => unitary::swap(),
            StandardGate::ISwap => unitary::iswap(),
            StandardGate::Rxx(theta) => unitary::rxx(theta),
            StandardGate::Ryy(theta) => unitary::ryy(theta),
            StandardGate::Rzz(theta) => unitary::rzz(theta),
        }
    }

    /// Build a base gate from its mnemonic and parameter list.
    ///
    /// Parametric gates need exactly one finite parameter; fixed gates take
    /// none.
    pub fn from_name(name: &str, params: &[f64]) -> IrResult<Self> {
        let fixed = match name {
            "id" | "i" => Some(StandardGate::Id),
            "x" => Some(StandardGate::X),
            "y" => Some(StandardGate::Y),
            "z" => Some(StandardGate::Z),
            "h" => Some(StandardGate::H),
            "s" => Some(StandardGate::S),
            "sdg" => Some(StandardGate::Sdg),
            "t" => Some(StandardGate::T),
            "tdg" => Some(StandardGate::Tdg),
            "sx" => Some(StandardGate::SX),
            "sy" => Some(StandardGate::SY),
            "w" => Some(StandardGate::W),
            "swap" => Some(StandardGate::Swap),
            "iswap" => Some(StandardGate::ISwap),
            _ => None,
        };
        if let Some(gate) = fixed {
            check_arity(name, params, 0)?;
            return Ok(gate);
        }

        let build: fn(f64) -> StandardGate = match name {
            "rx" => StandardGate::Rx,
            "ry" => StandardGate::Ry,
            "rz" => StandardGate::Rz,
            "p" => StandardGate::P,
            "rxx" => StandardGate::Rxx,
            "ryy" => StandardGate::Ryy,
            "rzz" => StandardGate::Rzz,
            _ => return Err(IrError::UnknownGate(name.to_string())),
        };
        check_arity(name, params, 1)?;
        Ok(build(params[0]))
    }
}

/// Validate parameter count and finiteness for a gate mnemonic.
pub fn check_arity(name: &str, params: &[f64], expected: usize) -> IrResult<()> {
    if expected > 0 && params.is_empty() {
        return Err(IrError::MissingParameter(name.to_string()));
    }
    if params.len() != expected {
        return Err(IrError::ParameterCount {
            gate_name: name.to_string(),
            expected,
            got: params.len(),
        });
    }
    if let Some(&value) = params.iter().find(|v| !v.is_finite()) {
        return Err(IrError::InvalidParameter {
            gate_name: name.to_string(),
            value,
        });
    }
    Ok(())
}

/// A base gate conditioned on one or more control qubits.
///
/// The operands of a controlled gate are `controls ++ targets`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlledGate {
    /// Number of leading control operands.
    pub num_controls: usize,
    /// The gate applied to the targets when every control is `|1⟩`.
    pub base: StandardGate,
}

impl ControlledGate {
    /// Create a controlled gate.
    pub fn new(num_controls: usize, base: StandardGate) -> Self {
        Self { num_controls, base }
    }

    /// Mnemonic: one `c` per control followed by the base name (`cx`, `ccx`, `crz`).
    pub fn name(&self) -> String {
        format!("{}{}", "c".repeat(self.num_controls), self.base.name())
    }

    /// Total operand count.
    pub fn num_qubits(&self) -> usize {
        self.num_controls + self.base.num_qubits()
    }

    /// Matrix of the base gate on the targets only.
    pub fn target_matrix(&self) -> Matrix {
        self.base.matrix()
    }
}

/// The kind of gate an instruction applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// A base gate acting directly on its operands.
    Standard(StandardGate),
    /// A controlled gate.
    Controlled(ControlledGate),
}

impl GateKind {
    /// Get the mnemonic of this gate.
    pub fn name(&self) -> String {
        match self {
            GateKind::Standard(g) => g.name().to_string(),
            GateKind::Controlled(g) => g.name(),
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        match self {
            GateKind::Standard(g) => g.num_qubits(),
            GateKind::Controlled(g) => g.num_qubits(),
        }
    }

    /// Get the parameters of the gate.
    pub fn parameters(&self) -> Vec<f64> {
        match self {
            GateKind::Standard(g) => g.parameters(),
            GateKind::Controlled(g) => g.base.parameters(),
        }
    }

    /// Look up a gate by mnemonic.
    ///
    /// Names are matched case-insensitively. Leading `c`s on a known base
    /// name select a controlled gate (`cx`, `ccx`, `cswap`, `crz`).
    pub fn from_name(name: &str, params: &[f64]) -> IrResult<Self> {
        let lower = name.to_ascii_lowercase();
        match StandardGate::from_name(&lower, params) {
            Ok(gate) => return Ok(GateKind::Standard(gate)),
            Err(IrError::UnknownGate(_)) => {}
            Err(e) => return Err(e),
        }

        let base = lower.trim_start_matches('c');
        let num_controls = lower.len() - base.len();
        if num_controls == 0 || base.is_empty() {
            return Err(IrError::UnknownGate(name.to_string()));
        }
        let base = match base {
            "not" if num_controls == 1 => StandardGate::X,
            other => StandardGate::from_name(other, params).map_err(|e| match e {
                IrError::UnknownGate(_) => IrError::UnknownGate(name.to_string()),
                e => e,
            })?,
        };
        Ok(GateKind::Controlled(ControlledGate::new(num_controls, base)))
    }
}

impl From<StandardGate> for GateKind {
    fn from(gate: StandardGate) -> Self {
        GateKind::Standard(gate)
    }
}

impl From<ControlledGate> for GateKind {
    fn from(gate: ControlledGate) -> Self {
        GateKind::Controlled(gate)
    }
}

/// Structural classification of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateCategory {
    /// Single target, no parameters.
    FixedSingleQubit,
    /// Single target with parameters.
    ParametricSingleQubit,
    /// Several targets, no parameters.
    FixedMultiQubit,
    /// Several targets with parameters.
    ParametricMultiQubit,
    /// Controls plus a base gate.
    Controlled,
    /// Structural barrier without a matrix.
    Barrier,
}

impl GateCategory {
    /// Whether operations of this category act on exactly one qubit.
    pub fn is_single_qubit(self) -> bool {
        matches!(
            self,
            GateCategory::FixedSingleQubit | GateCategory::ParametricSingleQubit
        )
    }
}

impl GateKind {
    /// Structural category of this gate.
    pub fn category(&self) -> GateCategory {
        match self {
            GateKind::Controlled(_) => GateCategory::Controlled,
            GateKind::Standard(g) => match (g.num_qubits(), g.is_parametric()) {
                (1, false) => GateCategory::FixedSingleQubit,
                (1, true) => GateCategory::ParametricSingleQubit,
                (_, false) => GateCategory::FixedMultiQubit,
                (_, true) => GateCategory::ParametricMultiQubit,
            },
        }
    }
}
