//! qcraft circuit intermediate representation.
//!
//! This crate holds the core data structures for quantum circuits and the
//! two algorithms every other qcraft crate builds on: the gate algebra that
//! produces operator matrices, and the layering scheduler that turns a flat
//! instruction list into aligned time layers.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`]
//! - **Gates**: [`StandardGate`] base gates, [`ControlledGate`] for controlled
//!   variants, unified by [`GateKind`]
//! - **Gate Algebra**: the [`unitary`] module (tensor reorder, controlled
//!   embedding, matrix constructors)
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **Circuit**: [`Circuit`] builder with its [`MeasureMap`]
//! - **Layout**: [`LayeredCircuit`] left-justified layered view
//! - **Operators**: [`GateOperator`] per-gate matrices for simulators
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qcraft_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::new(2);
//! circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let layout = circuit.layered();
//! assert_eq!(layout.num_rows(), 2);
//! assert_eq!(layout.depth(), 2);
//! ```
//!
//! # Example: Operators
//!
//! ```rust
//! use qcraft_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::new(3);
//! circuit.cx(QubitId(2), QubitId(0)).unwrap();
//!
//! let ops = circuit.operators().unwrap();
//! assert_eq!(ops[0].qubits, vec![QubitId(0), QubitId(2)]);
//! assert_eq!(ops[0].matrix.dim(), (4, 4));
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `id`, `x`, `y`, `z`, `h` | 1 | Identity, Pauli and Hadamard gates |
//! | `s`, `sdg`, `t`, `tdg` | 1 | Phase gates |
//! | `sx`, `sy`, `w` | 1 | Square-root and W gates |
//! | `rx`, `ry`, `rz`, `p` | 1 | Rotation and phase gates |
//! | `swap`, `iswap` | 2 | Exchange gates |
//! | `rxx`, `ryy`, `rzz` | 2 | Ising rotation gates |
//! | `c…<base>` | n + base | Any base gate with n controls (`cx`, `ccx`, `cswap`, `crz`) |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod layout;
pub mod measure;
pub mod operator;
pub mod qubit;
pub mod unitary;

pub use circuit::{Circuit, DEFAULT_SHOTS};
pub use error::{IrError, IrResult};
pub use gate::{ControlledGate, GateCategory, GateKind, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use layout::{LayerRow, LayeredCircuit};
pub use measure::MeasureMap;
pub use operator::GateOperator;
pub use qubit::{ClbitId, QubitId};
pub use unitary::Matrix;
