//! Execution tasks handed to a backend.

use qcraft_ir::Circuit;
use serde::{Deserialize, Serialize};

/// A circuit serialized for a runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// `OpenQASM` 2.0 source.
    pub qasm: String,
    /// Number of shots.
    pub shots: u32,
    /// Width of the quantum register.
    pub num_qubits: u32,
    /// Whether the runner may compile the circuit for its device.
    #[serde(default = "default_compile")]
    pub compile: bool,
    /// Whether the runner should perform state tomography.
    #[serde(default)]
    pub tomography: bool,
}

fn default_compile() -> bool {
    true
}

impl Task {
    /// Build a task from a circuit, taking shots and tomography from it.
    pub fn from_circuit(circuit: &Circuit, compile: bool) -> Self {
        Self {
            qasm: qcraft_qasm::emit(circuit),
            shots: circuit.shots(),
            num_qubits: circuit.num_qubits(),
            compile,
            tomography: circuit.tomography(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcraft_ir::QubitId;

    #[test]
    fn test_from_circuit() {
        let mut circuit = Circuit::bell().unwrap();
        circuit.measure(&[QubitId(1)], None, 200, true).unwrap();

        let task = Task::from_circuit(&circuit, false);
        assert_eq!(task.shots, 200);
        assert_eq!(task.num_qubits, 2);
        assert!(task.tomography);
        assert!(!task.compile);
        assert!(task.qasm.ends_with("measure q[1] -> meas[0];\n"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let task: Task =
            serde_json::from_str(r#"{"qasm": "OPENQASM 2.0;", "shots": 10, "num_qubits": 1}"#)
                .unwrap();
        assert!(task.compile);
        assert!(!task.tomography);
    }
}
