//! Error types for the HAL crate.

use qcraft_ir::QubitId;
use thiserror::Error;

/// Errors that can occur in HAL operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// The runner refused the task as too large to compute.
    #[error("Excessive computation scale")]
    ExcessiveScale,

    /// The runner refused the circuit.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// Any other runner failure.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Observable references a qubit that is not measured.
    #[error("Qubit {qubit} in observable {observable} is not measured")]
    UnmeasuredQubit { qubit: QubitId, observable: String },

    /// Malformed Pauli observable.
    #[error("Invalid observable: {0}")]
    InvalidObservable(String),

    /// Circuit construction error.
    #[error("Circuit error: {0}")]
    Ir(#[from] qcraft_ir::IrError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
