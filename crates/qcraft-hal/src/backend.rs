//! Backend trait and runner replies.
//!
//! A [`Backend`] is the single seam between qcraft and whatever executes a
//! circuit. It receives a serialized [`Task`] and answers with a
//! [`RunnerReply`]; this crate never opens a connection itself.
//!
//! ```text
//!   Circuit ──→ Task::from_circuit() ──→ Backend::execute() ──→ RunnerReply
//!                                                                   │
//!                                       ExecResult ←── into_counts()┘
//! ```

use async_trait::async_trait;
use qcraft_ir::Circuit;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{HalError, HalResult};
use crate::result::{Counts, ExecResult};
use crate::task::Task;

/// Status reported with a successful run.
pub const STATUS_OK: u32 = 0;

/// Status for a circuit the runner refused.
pub const STATUS_INVALID_CIRCUIT: u32 = 5001;

/// Status for a task too large for the runner.
pub const STATUS_EXCESSIVE_SCALE: u32 = 5002;

/// Trait for circuit runners.
///
/// Implementations must be usable from several tasks at once. A failed
/// execution is reported once; callers do not retry.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Execute a task and return the runner's raw reply.
    async fn execute(&self, task: &Task) -> HalResult<RunnerReply>;
}

/// Raw reply from a runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerReply {
    /// Runner status code.
    #[serde(alias = "stat")]
    pub status: u32,
    /// Measured bitstrings, present on success.
    #[serde(default, alias = "res")]
    pub counts: Counts,
    /// Free-form message from the runner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RunnerReply {
    /// A successful reply carrying `counts`.
    pub fn ok(counts: Counts) -> Self {
        Self {
            status: STATUS_OK,
            counts,
            message: None,
        }
    }

    /// A failed reply with the given status.
    pub fn failed(status: u32, message: impl Into<String>) -> Self {
        Self {
            status,
            counts: Counts::new(),
            message: Some(message.into()),
        }
    }

    /// Decode a reply from JSON.
    pub fn from_json(json: &str) -> HalResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Map the status code to counts or an error.
    pub fn into_counts(self) -> HalResult<Counts> {
        let message = self.message.unwrap_or_default();
        match self.status {
            STATUS_OK => Ok(self.counts),
            STATUS_INVALID_CIRCUIT => Err(HalError::InvalidCircuit(message)),
            STATUS_EXCESSIVE_SCALE => Err(HalError::ExcessiveScale),
            status => Err(HalError::Backend(format!("status {status}: {message}"))),
        }
    }
}

/// Serialize `circuit`, execute it once and collect its counts.
#[instrument(skip_all, fields(backend = backend.name(), qubits = circuit.num_qubits(), shots = circuit.shots()))]
pub async fn send(backend: &dyn Backend, circuit: &Circuit, compile: bool) -> HalResult<ExecResult> {
    let task = Task::from_circuit(circuit, compile);
    let reply = backend.execute(&task).await?;
    debug!(status = reply.status, "runner replied");

    let counts = reply.into_counts()?;
    Ok(ExecResult::new(counts, circuit.measures().clone()))
}
