//! Pauli observables and basis-rotated measurement tasks.
//!
//! An observable such as `XYX` on qubits 0, 1, 2 is estimated by rotating
//! each measured qubit into the eigenbasis of its Pauli factor and reading
//! the Z-parity of the outcome. Observables that agree on every shared
//! qubit are measured together in one [`MeasureBasis`].

use std::f64::consts::FRAC_PI_2;
use std::fmt;

use qcraft_ir::{Circuit, QubitId};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::backend::{Backend, send};
use crate::error::{HalError, HalResult};
use crate::result::ExecResult;

/// A single-qubit Pauli factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    /// Identity; read in any basis.
    I,
    /// Pauli X, read after `ry(-π/2)`.
    X,
    /// Pauli Y, read after `rx(π/2)`.
    Y,
    /// Pauli Z, the computational basis.
    Z,
}

impl Pauli {
    /// Parse a factor from its letter.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'I' => Some(Pauli::I),
            'X' => Some(Pauli::X),
            'Y' => Some(Pauli::Y),
            'Z' => Some(Pauli::Z),
            _ => None,
        }
    }

    /// The factor's letter.
    pub fn as_char(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }
}

/// A Pauli string placed on specific qubits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauliObservable {
    paulis: Vec<Pauli>,
    qubits: Vec<QubitId>,
}

impl PauliObservable {
    /// Place the Pauli string `paulis` (for example `"XZ"`) on `qubits`.
    pub fn new(paulis: &str, qubits: impl IntoIterator<Item = QubitId>) -> HalResult<Self> {
        let qubits: Vec<QubitId> = qubits.into_iter().collect();
        let paulis = paulis
            .chars()
            .map(|c| {
                Pauli::from_char(c).ok_or_else(|| {
                    HalError::InvalidObservable(format!("'{c}' is not a Pauli operator"))
                })
            })
            .collect::<HalResult<Vec<_>>>()?;

        if paulis.len() != qubits.len() {
            return Err(HalError::InvalidObservable(format!(
                "{} Pauli factors on {} qubits",
                paulis.len(),
                qubits.len()
            )));
        }
        let mut seen = FxHashSet::default();
        if let Some(q) = qubits.iter().find(|q| !seen.insert(**q)) {
            return Err(HalError::InvalidObservable(format!(
                "qubit {q} appears twice"
            )));
        }
        Ok(Self { paulis, qubits })
    }

    /// Pauli factors in operand order.
    pub fn paulis(&self) -> &[Pauli] {
        &self.paulis
    }

    /// Qubits the factors act on.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Non-identity `(qubit, factor)` pairs.
    pub fn terms(&self) -> impl Iterator<Item = (QubitId, Pauli)> + '_ {
        self.qubits
            .iter()
            .copied()
            .zip(self.paulis.iter().copied())
            .filter(|(_, p)| *p != Pauli::I)
    }
}

impl fmt::Display for PauliObservable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.paulis {
            write!(f, "{}", p.as_char())?;
        }
        let qubits: Vec<String> = self.qubits.iter().map(ToString::to_string).collect();
        write!(f, "({})", qubits.join(","))
    }
}

/// The Pauli basis each qubit is read in. Unlisted qubits read in Z.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureBasis {
    bases: Vec<(QubitId, Pauli)>,
}

impl MeasureBasis {
    /// The computational basis.
    pub fn new() -> Self {
        Self::default()
    }

    /// Basis of `qubit`, if constrained.
    pub fn get(&self, qubit: QubitId) -> Option<Pauli> {
        self.bases
            .iter()
            .find(|(q, _)| *q == qubit)
            .map(|(_, p)| *p)
    }

    /// Constrained `(qubit, basis)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (QubitId, Pauli)> + '_ {
        self.bases.iter().copied()
    }

    /// Number of constrained qubits.
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    /// Whether no qubit is constrained.
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    fn is_compatible(&self, observable: &PauliObservable) -> bool {
        observable
            .terms()
            .all(|(q, p)| self.get(q).is_none_or(|b| b == p))
    }

    fn absorb(&mut self, observable: &PauliObservable) {
        for (q, p) in observable.terms() {
            if self.get(q).is_none() {
                self.bases.push((q, p));
            }
        }
    }

    /// Copy `circuit` with the basis-change rotations appended:
    /// `ry(-π/2)` for X and `rx(π/2)` for Y.
    pub fn apply(&self, circuit: &Circuit) -> HalResult<Circuit> {
        let mut rotated = circuit.clone();
        for (q, p) in self.iter() {
            match p {
                Pauli::X => {
                    rotated.ry(-FRAC_PI_2, q)?;
                }
                Pauli::Y => {
                    rotated.rx(FRAC_PI_2, q)?;
                }
                Pauli::Z | Pauli::I => {}
            }
        }
        Ok(rotated)
    }
}

impl fmt::Display for MeasureBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bases.is_empty() {
            return write!(f, "Z");
        }
        let parts: Vec<String> = self
            .bases
            .iter()
            .map(|(q, p)| format!("{}{}", p.as_char(), q.0))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// Group observables into as few measurement bases as first-fit allows.
///
/// Returns the bases and, for each observable, the index of the basis it is
/// read from.
pub fn merge_measure(observables: &[PauliObservable]) -> (Vec<MeasureBasis>, Vec<usize>) {
    let mut bases: Vec<MeasureBasis> = Vec::new();
    let mut targets = Vec::with_capacity(observables.len());

    for observable in observables {
        let index = match bases.iter().position(|b| b.is_compatible(observable)) {
            Some(i) => i,
            None => {
                bases.push(MeasureBasis::new());
                bases.len() - 1
            }
        };
        bases[index].absorb(observable);
        targets.push(index);
    }
    (bases, targets)
}

/// Execute `circuit` once, read in `basis` when given.
pub async fn run(
    backend: &dyn Backend,
    circuit: &Circuit,
    compile: bool,
    basis: Option<&MeasureBasis>,
) -> HalResult<ExecResult> {
    let Some(basis) = basis else {
        return send(backend, circuit, compile).await;
    };
    let rotated = basis.apply(circuit)?;
    let mut result = send(backend, &rotated, compile).await?;
    result.measure_base = Some(basis.clone());
    Ok(result)
}

/// Results of an observable measurement task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskOutcome {
    /// One result per measurement basis, in basis order.
    pub results: Vec<ExecResult>,
    /// One expectation value per observable, in input order.
    pub expectations: Vec<f64>,
}

/// Estimate each observable on `circuit`.
///
/// With no observables the circuit runs once in the computational basis.
/// Every observable qubit must be measured by the circuit.
#[instrument(skip_all, fields(backend = backend.name(), observables = observables.len()))]
pub async fn submit_task(
    backend: &dyn Backend,
    circuit: &Circuit,
    observables: &[PauliObservable],
    compile: bool,
) -> HalResult<TaskOutcome> {
    if observables.is_empty() {
        let result = run(backend, circuit, compile, None).await?;
        return Ok(TaskOutcome {
            results: vec![result],
            expectations: Vec::new(),
        });
    }

    let measures = circuit.measures();
    let mut positions = Vec::with_capacity(observables.len());
    for observable in observables {
        let bits = observable
            .qubits()
            .iter()
            .map(|&q| {
                measures
                    .get(q)
                    .map(|c| c.0 as usize)
                    .ok_or_else(|| HalError::UnmeasuredQubit {
                        qubit: q,
                        observable: observable.to_string(),
                    })
            })
            .collect::<HalResult<Vec<_>>>()?;
        positions.push(bits);
    }

    let (bases, targets) = merge_measure(observables);
    info!(bases = bases.len(), "measuring observables");

    let mut results = Vec::with_capacity(bases.len());
    for basis in &bases {
        results.push(run(backend, circuit, compile, Some(basis)).await?);
    }

    let expectations = targets
        .iter()
        .zip(&positions)
        .map(|(&t, bits)| results[t].calculate_obs(bits))
        .collect();

    Ok(TaskOutcome {
        results,
        expectations,
    })
}
