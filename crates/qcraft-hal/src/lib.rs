//! qcraft Hardware Abstraction Layer
//!
//! This crate is the boundary between a qcraft [`Circuit`](qcraft_ir::Circuit)
//! and whatever executes it. It carries no transport: a runner is anything
//! implementing the [`Backend`] trait.
//!
//! # Overview
//!
//! - [`Task`]: a circuit serialized to `OpenQASM` 2.0 with its run settings
//! - [`Backend`]: async execution seam returning a [`RunnerReply`]
//! - [`Counts`] and [`ExecResult`]: measured bitstrings and their statistics
//! - [`PauliObservable`], [`merge_measure`] and [`submit_task`]: expectation
//!   values of Pauli strings, grouped into shared measurement bases
//!
//! # Example: Implementing a Backend
//!
//! ```rust
//! use async_trait::async_trait;
//! use qcraft_hal::{Backend, Counts, HalResult, RunnerReply, Task};
//!
//! struct AllZeros;
//!
//! #[async_trait]
//! impl Backend for AllZeros {
//!     fn name(&self) -> &str {
//!         "all-zeros"
//!     }
//!
//!     async fn execute(&self, task: &Task) -> HalResult<RunnerReply> {
//!         let zeros = "0".repeat(task.num_qubits as usize);
//!         Ok(RunnerReply::ok(Counts::from_pairs([(zeros, u64::from(task.shots))])))
//!     }
//! }
//! ```
//!
//! # Runner Status Codes
//!
//! | Code | Meaning | Error |
//! |------|---------|-------|
//! | `0` | success | |
//! | `5001` | invalid circuit | [`HalError::InvalidCircuit`] |
//! | `5002` | excessive computation scale | [`HalError::ExcessiveScale`] |
//! | other | runner failure | [`HalError::Backend`] |

pub mod backend;
pub mod error;
pub mod observable;
pub mod result;
pub mod task;

pub use backend::{
    Backend, RunnerReply, STATUS_EXCESSIVE_SCALE, STATUS_INVALID_CIRCUIT, STATUS_OK, send,
};
pub use error::{HalError, HalResult};
pub use observable::{
    MeasureBasis, Pauli, PauliObservable, TaskOutcome, merge_measure, run, submit_task,
};
pub use result::{Counts, ExecResult};
pub use task::Task;
