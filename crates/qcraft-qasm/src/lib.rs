//! `OpenQASM` 2 Reader and Writer for qcraft
//!
//! This crate turns `OpenQASM` 2.0 text into a [`qcraft_ir::Circuit`] and back.
//! Import is lenient by default: constructs that cannot be represented are
//! skipped and reported as [`Diagnostic`]s next to the circuit. Use
//! [`ImportOptions::strict`] to fail on the first one instead.
//!
//! # Supported Features
//!
//! | Feature | Status | Example |
//! |---------|--------|---------|
//! | Version declaration | ✅ | `OPENQASM 2.0;` |
//! | Registers | ✅ | `qreg q[5];`, `creg c[5];` |
//! | Standard gates | ✅ | `h q[0];`, `cx q[0],q[1];` |
//! | Parameterized gates | ✅ | `rx(pi/4) q[0];` |
//! | Register broadcast | ✅ | `h q;`, `cx a,b;` |
//! | Measurements | ✅ | `measure q[0] -> c[0];` |
//! | Barriers | ✅ | `barrier q;` |
//! | Comments | ✅ | `// comment` |
//! | `reset`, `if`, `gate`, `opaque` | skipped | reported as diagnostics |
//!
//! # Example: Parsing QASM
//!
//! ```rust
//! use qcraft_qasm::parse;
//!
//! let qasm = r#"
//!     OPENQASM 2.0;
//!     include "qelib1.inc";
//!     qreg q[2];
//!     creg c[2];
//!     h q[0];
//!     cx q[0],q[1];
//!     measure q -> c;
//! "#;
//!
//! let import = parse(qasm).unwrap();
//! assert!(import.is_clean());
//! assert_eq!(import.circuit.num_qubits(), 2);
//! assert_eq!(import.circuit.depth(), 2);
//! ```
//!
//! # Example: Emitting QASM
//!
//! ```rust
//! use qcraft_ir::Circuit;
//! use qcraft_qasm::emit;
//!
//! let circuit = Circuit::bell().unwrap();
//! let qasm = emit(&circuit);
//! assert!(qasm.starts_with("OPENQASM 2.0;"));
//! assert!(qasm.contains("cx q[0],q[1];"));
//! assert!(qasm.contains("measure q[1] -> meas[1];"));
//! ```
//!
//! # Gate Lowering
//!
//! Every mnemonic known to [`qcraft_ir::GateKind::from_name`] is imported
//! directly, including multi-controlled names such as `ccx` or `crz`.
//! The `qelib1` U-family is decomposed into rotations:
//!
//! | Source | Lowered to |
//! |--------|------------|
//! | `u1(λ)` | `rz(λ)` |
//! | `u2(φ,λ)` | `rz(λ) ry(π/2) rz(φ)` |
//! | `u3(θ,φ,λ)`, `U(θ,φ,λ)` | `rz(λ) ry(θ) rz(φ)` |
//! | `cu1(λ)` | `cp(λ)` |

mod ast;
mod emitter;
mod error;
mod import;
mod lexer;
mod parser;

pub use emitter::emit;
pub use error::{ParseError, ParseResult};
pub use import::{Diagnostic, Import, ImportOptions, MAX_REGISTER_BITS};
pub use parser::{parse, parse_ast, parse_with};

use qcraft_ir::Circuit;

/// Parse QASM2 source and keep only the circuit, discarding diagnostics.
pub fn parse_circuit(source: &str) -> ParseResult<Circuit> {
    parse(source).map(Import::into_circuit)
}

// Re-export AST types for advanced users
pub mod syntax {
    pub use crate::ast::*;
}
