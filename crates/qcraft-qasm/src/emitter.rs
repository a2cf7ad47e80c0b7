//! QASM2 emitter for serializing circuits.

use std::fmt::Write as _;

use qcraft_ir::{Circuit, Instruction, InstructionKind, QubitId};

/// Emit a circuit as `OpenQASM` 2.0 source code.
///
/// Qubits live in a single register `q`. Measurements target the classical
/// register `meas`, sized to hold every measured bit, and are written after
/// all gates in measurement-map order.
pub fn emit(circuit: &Circuit) -> String {
    let mut emitter = Emitter::new();
    emitter.emit_circuit(circuit);
    emitter.output
}

/// QASM2 emitter.
struct Emitter {
    output: String,
}

impl Emitter {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn emit_circuit(&mut self, circuit: &Circuit) {
        self.writeln("OPENQASM 2.0;");
        self.writeln("include \"qelib1.inc\";");
        self.writeln(&format!("qreg q[{}];", circuit.num_qubits()));

        let measures = circuit.measures();
        // Sparse bit assignments need the register to reach the highest bit.
        let num_clbits = measures
            .iter()
            .map(|(_, c)| c.0 as usize + 1)
            .max()
            .unwrap_or(0)
            .max(measures.len());
        self.writeln(&format!("creg meas[{num_clbits}];"));

        for instruction in circuit.instructions() {
            self.emit_instruction(instruction);
        }

        for (q, c) in measures.iter() {
            self.writeln(&format!("measure q[{}] -> meas[{}];", q.0, c.0));
        }
    }

    fn emit_instruction(&mut self, instruction: &Instruction) {
        let qubits = emit_qubits(&instruction.qubits);
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let name = gate.name();
                let params = gate.parameters();
                if params.is_empty() {
                    self.writeln(&format!("{name} {qubits};"));
                } else {
                    self.writeln(&format!("{name}({}) {qubits};", emit_params(&params)));
                }
            }
            InstructionKind::Barrier => {
                self.writeln(&format!("barrier {qubits};"));
            }
        }
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }
}

fn emit_qubits(qubits: &[QubitId]) -> String {
    let mut out = String::new();
    for (i, q) in qubits.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "q[{}]", q.0);
    }
    out
}

/// Parameters in shortest round-trip form. `{:?}` keeps a decimal point or
/// exponent so every value lexes back as a float literal.
fn emit_params(params: &[f64]) -> String {
    params
        .iter()
        .map(|p| format!("{p:?}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcraft_ir::{ClbitId, StandardGate};

    #[test]
    fn test_emit_bell() {
        let circuit = Circuit::bell().unwrap();
        let qasm = emit(&circuit);
        assert_eq!(
            qasm,
            "OPENQASM 2.0;\n\
             include \"qelib1.inc\";\n\
             qreg q[2];\n\
             creg meas[2];\n\
             h q[0];\n\
             cx q[0],q[1];\n\
             measure q[0] -> meas[0];\n\
             measure q[1] -> meas[1];\n"
        );
    }

    #[test]
    fn test_emit_params_and_barrier() {
        let mut circuit = Circuit::new(3);
        circuit
            .rx(0.5, QubitId(0))
            .unwrap()
            .rz(-1e-20, QubitId(1))
            .unwrap()
            .cp(3.0, QubitId(2), QubitId(0))
            .unwrap()
            .barrier([QubitId(0), QubitId(2)])
            .unwrap();
        let qasm = emit(&circuit);
        assert!(qasm.contains("rx(0.5) q[0];\n"));
        assert!(qasm.contains("rz(-1e-20) q[1];\n"));
        assert!(qasm.contains("cp(3.0) q[2],q[0];\n"));
        assert!(qasm.contains("barrier q[0],q[2];\n"));
    }

    #[test]
    fn test_emit_multi_controlled() {
        let mut circuit = Circuit::new(4);
        circuit
            .mcx(&[QubitId(3), QubitId(0), QubitId(1)], QubitId(2))
            .unwrap()
            .controlled(&[QubitId(0)], StandardGate::Swap, &[QubitId(1), QubitId(3)])
            .unwrap();
        let qasm = emit(&circuit);
        assert!(qasm.contains("cccx q[3],q[0],q[1],q[2];\n"));
        assert!(qasm.contains("cswap q[0],q[1],q[3];\n"));
    }

    #[test]
    fn test_creg_covers_highest_clbit() {
        let mut circuit = Circuit::new(2);
        circuit
            .measure(&[QubitId(1)], Some(&[ClbitId(3)]), 100, false)
            .unwrap();
        let qasm = emit(&circuit);
        assert!(qasm.contains("creg meas[4];\n"));
        assert!(qasm.ends_with("measure q[1] -> meas[3];\n"));
    }
}
