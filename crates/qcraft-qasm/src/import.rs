//! Import results, diagnostics and options.

use std::fmt;

use qcraft_ir::{Circuit, QubitId};
use serde::{Deserialize, Serialize};

/// Non-fatal finding reported while importing QASM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub enum Diagnostic {
    /// Gate mnemonic with no known lowering; the statement was skipped.
    UnsupportedGate {
        /// Source line.
        line: usize,
        /// Mnemonic as written.
        name: String,
    },
    /// Operation on a qubit that was already measured; the operation was dropped.
    OperationAfterMeasurement {
        /// Source line.
        line: usize,
        /// Mnemonic of the dropped operation.
        name: String,
        /// The measured qubit it touched.
        qubit: QubitId,
    },
    /// Statement kind the importer does not lower; the statement was skipped.
    UnsupportedStatement {
        /// Source line.
        line: usize,
        /// Statement keyword.
        statement: String,
    },
}

impl Diagnostic {
    /// Source line the diagnostic refers to.
    pub fn line(&self) -> usize {
        match self {
            Diagnostic::UnsupportedGate { line, .. }
            | Diagnostic::OperationAfterMeasurement { line, .. }
            | Diagnostic::UnsupportedStatement { line, .. } => *line,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnsupportedGate { line, name } => {
                write!(f, "line {line}: unsupported gate '{name}', skipped")
            }
            Diagnostic::OperationAfterMeasurement { line, name, qubit } => write!(
                f,
                "line {line}: '{name}' acts on {qubit} after it was measured, removed"
            ),
            Diagnostic::UnsupportedStatement { line, statement } => {
                write!(f, "line {line}: unsupported statement '{statement}', skipped")
            }
        }
    }
}

/// Largest total width of the quantum or classical registers of one program.
pub const MAX_REGISTER_BITS: u32 = 1 << 16;

/// Options controlling QASM import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Fail on the first diagnostic instead of collecting it.
    pub strict: bool,
}

impl ImportOptions {
    /// Options that reject any diagnostic.
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// A circuit imported from QASM together with the diagnostics raised.
#[derive(Debug, Clone)]
pub struct Import {
    /// The imported circuit.
    pub circuit: Circuit,
    /// Diagnostics in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl Import {
    /// Whether any operation was dropped for acting after a measurement.
    pub fn had_invalid_ops(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::OperationAfterMeasurement { .. }))
    }

    /// Whether the import produced no diagnostics.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Drop the diagnostics and keep the circuit.
    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::OperationAfterMeasurement {
            line: 7,
            name: "x".into(),
            qubit: QubitId(1),
        };
        assert_eq!(d.line(), 7);
        assert_eq!(
            d.to_string(),
            "line 7: 'x' acts on q1 after it was measured, removed"
        );
    }

    #[test]
    fn test_had_invalid_ops() {
        let mut import = Import {
            circuit: Circuit::new(1),
            diagnostics: vec![Diagnostic::UnsupportedGate {
                line: 3,
                name: "fsim".into(),
            }],
        };
        assert!(!import.had_invalid_ops());
        assert!(!import.is_clean());

        import.diagnostics.push(Diagnostic::OperationAfterMeasurement {
            line: 4,
            name: "h".into(),
            qubit: QubitId(0),
        });
        assert!(import.had_invalid_ops());
    }
}
