//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur while building or transforming circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit index is outside the circuit register.
    #[error("Qubit {qubit} out of range for a {num_qubits}-qubit circuit{}", format_gate_context(.gate_name))]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Register size of the circuit.
        num_qubits: u32,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// The same qubit appears twice in one operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: usize,
        /// Actual number of qubits provided.
        got: usize,
    },

    /// A parametric gate was built without any parameter.
    #[error("Gate '{0}' requires at least one parameter")]
    MissingParameter(String),

    /// A gate received the wrong number of parameters.
    #[error("Gate '{gate_name}' expects {expected} parameters, got {got}")]
    ParameterCount {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of parameters.
        expected: usize,
        /// Actual number of parameters provided.
        got: usize,
    },

    /// A parameter is not a finite real number.
    #[error("Gate '{gate_name}' received a non-finite parameter {value}")]
    InvalidParameter {
        /// Name of the gate.
        gate_name: String,
        /// The rejected value.
        value: f64,
    },

    /// Mnemonic not present in the gate table.
    #[error("Unknown gate: {0}")]
    UnknownGate(String),

    /// An operation was given no operands.
    #[error("Operation '{0}' needs at least one qubit")]
    EmptyOperands(String),

    /// Measurement configuration with mismatched bit list.
    #[error("Number of measured qubits ({qubits}) does not equal the number of classical bits ({clbits})")]
    MeasureLengthMismatch {
        /// Number of measured qubits.
        qubits: usize,
        /// Number of classical bits supplied.
        clbits: usize,
    },

    /// Two circuits with different register sizes cannot be merged.
    #[error("Cannot merge a {other}-qubit circuit into a {this}-qubit circuit")]
    RegisterMismatch {
        /// Size of the receiving circuit.
        this: u32,
        /// Size of the merged circuit.
        other: u32,
    },

    /// Matrix side does not match the number of positions.
    #[error("Matrix of side {side} cannot be ordered by {positions} positions")]
    MatrixShape {
        /// Side length of the matrix.
        side: usize,
        /// Number of positions supplied.
        positions: usize,
    },
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
