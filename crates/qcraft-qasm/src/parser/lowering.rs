//! AST-to-Circuit lowering for QASM2.

use std::f64::consts::FRAC_PI_2;

use qcraft_ir::gate::check_arity;
use qcraft_ir::{Circuit, ClbitId, GateKind, IrError, IrResult, MeasureMap, QubitId};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::ast::{BitRef, GateCall, Program, QubitRef, RegisterRef, Statement, StatementKind};
use crate::error::{ParseError, ParseResult};
use crate::import::{Diagnostic, Import, ImportOptions, MAX_REGISTER_BITS};

/// Builds the instructions of one gate application.
type Lowering = fn(&mut Circuit, &[f64], &[QubitId]) -> IrResult<()>;

/// Mnemonics lowered by decomposition rather than by direct gate lookup.
const DECOMPOSITIONS: &[(&str, Lowering)] = &[
    ("u1", lower_u1),
    ("u2", lower_u2),
    ("u3", lower_u3),
    ("u", lower_u3),
    ("cu1", lower_cu1),
];

/// Lower an AST Program to a Circuit.
pub(crate) fn lower_to_circuit(program: &Program, options: &ImportOptions) -> ParseResult<Import> {
    let mut lowerer = Lowerer::new(options);
    let import = lowerer.lower(program)?;

    for diagnostic in &import.diagnostics {
        warn!("{diagnostic}");
    }
    if import.had_invalid_ops() {
        warn!("All operations after measurement were removed for execution");
    }
    debug!(
        qubits = import.circuit.num_qubits(),
        instructions = import.circuit.len(),
        diagnostics = import.diagnostics.len(),
        "imported QASM circuit"
    );
    Ok(import)
}

/// Lowers AST to Circuit.
struct Lowerer<'o> {
    options: &'o ImportOptions,
    /// Qubit registers: name -> (`start_id`, size).
    qregs: FxHashMap<String, (u32, u32)>,
    /// Classical bit registers: name -> (`start_id`, size).
    cregs: FxHashMap<String, (u32, u32)>,
    /// Next qubit ID.
    next_qubit: u32,
    /// Next clbit ID.
    next_clbit: u32,
    /// Qubits measured so far.
    measured: FxHashSet<QubitId>,
    /// Measurement map collected from `measure` statements.
    measures: MeasureMap,
    diagnostics: Vec<Diagnostic>,
}

impl<'o> Lowerer<'o> {
    fn new(options: &'o ImportOptions) -> Self {
        Self {
            options,
            qregs: FxHashMap::default(),
            cregs: FxHashMap::default(),
            next_qubit: 0,
            next_clbit: 0,
            measured: FxHashSet::default(),
            measures: MeasureMap::new(),
            diagnostics: Vec::new(),
        }
    }

    fn lower(&mut self, program: &Program) -> ParseResult<Import> {
        // First pass: flatten register declarations in order
        for stmt in &program.statements {
            match &stmt.kind {
                StatementKind::QregDecl { name, size } => {
                    declare(&mut self.qregs, &mut self.next_qubit, name, *size)?;
                }
                StatementKind::CregDecl { name, size } => {
                    declare(&mut self.cregs, &mut self.next_clbit, name, *size)?;
                }
                _ => {}
            }
        }

        let mut circuit = Circuit::new(self.next_qubit);

        // Second pass: lower statements
        for stmt in &program.statements {
            self.lower_statement(&mut circuit, stmt)?;
        }

        if !self.measures.is_empty() {
            circuit.set_measures(std::mem::take(&mut self.measures))?;
        }

        Ok(Import {
            circuit,
            diagnostics: std::mem::take(&mut self.diagnostics),
        })
    }

    /// Record a diagnostic, or fail with it under strict import.
    fn report(&mut self, diagnostic: Diagnostic) -> ParseResult<()> {
        if self.options.strict {
            return Err(ParseError::Rejected(diagnostic));
        }
        self.diagnostics.push(diagnostic);
        Ok(())
    }

    fn lower_statement(&mut self, circuit: &mut Circuit, stmt: &Statement) -> ParseResult<()> {
        let line = stmt.line;
        match &stmt.kind {
            StatementKind::QregDecl { .. }
            | StatementKind::CregDecl { .. }
            | StatementKind::Include(_) => Ok(()),

            StatementKind::Gate(call) => self.lower_gate_call(circuit, line, call),

            StatementKind::Measure { qubit, bit } => self.lower_measure(line, qubit, bit),

            StatementKind::Barrier { qubits } => {
                let mut seen = FxHashSet::default();
                let mut ids = Vec::new();
                for r in qubits {
                    for q in self.resolve_qubits(r)? {
                        if seen.insert(q) {
                            ids.push(q);
                        }
                    }
                }
                if let Some(&q) = ids.iter().find(|q| self.measured.contains(*q)) {
                    return self.report(Diagnostic::OperationAfterMeasurement {
                        line,
                        name: "barrier".into(),
                        qubit: q,
                    });
                }
                circuit.barrier(ids)?;
                Ok(())
            }

            kind @ (StatementKind::Reset { .. }
            | StatementKind::If { .. }
            | StatementKind::GateDef { .. }
            | StatementKind::Opaque { .. }) => self.report(Diagnostic::UnsupportedStatement {
                line,
                statement: kind.keyword().into(),
            }),
        }
    }

    fn lower_gate_call(
        &mut self,
        circuit: &mut Circuit,
        line: usize,
        call: &GateCall,
    ) -> ParseResult<()> {
        let name = call.name.to_ascii_lowercase();
        let params: Vec<f64> = call
            .params
            .iter()
            .map(|e| e.evaluate())
            .collect::<ParseResult<_>>()?;

        let lowering = match DECOMPOSITIONS.iter().find(|(n, _)| *n == name) {
            Some((_, lowering)) => Some(Gate::Decomposed(*lowering)),
            None => match GateKind::from_name(&name, &params) {
                Ok(kind) => Some(Gate::Direct(kind)),
                Err(IrError::UnknownGate(_)) => None,
                Err(e) => return Err(e.into()),
            },
        };

        let mut unsupported_reported = false;
        for qubits in self.broadcast(line, &call.name, &call.qubits)? {
            let after_measure = qubits.iter().find(|q| self.measured.contains(*q)).copied();
            if let Some(qubit) = after_measure {
                self.report(Diagnostic::OperationAfterMeasurement {
                    line,
                    name: call.name.clone(),
                    qubit,
                })?;
            }
            match lowering {
                None if !unsupported_reported => {
                    unsupported_reported = true;
                    self.report(Diagnostic::UnsupportedGate {
                        line,
                        name: call.name.clone(),
                    })?;
                }
                None => {}
                Some(_) if after_measure.is_some() => {}
                Some(Gate::Decomposed(lower)) => lower(circuit, &params, &qubits)?,
                Some(Gate::Direct(kind)) => {
                    circuit.gate(kind, qubits)?;
                }
            }
        }
        Ok(())
    }

    fn lower_measure(&mut self, line: usize, qubit: &QubitRef, bit: &BitRef) -> ParseResult<()> {
        let qubits = self.resolve_qubits(qubit)?;
        let bits = self.resolve_clbits(bit)?;
        if qubits.len() != bits.len() {
            return Err(ParseError::BroadcastMismatch {
                line,
                name: "measure".into(),
            });
        }
        for (q, c) in qubits.into_iter().zip(bits) {
            self.measures.insert(q, c);
            self.measured.insert(q);
        }
        Ok(())
    }

    /// Expand register operands into one operand list per application.
    fn broadcast(
        &self,
        line: usize,
        name: &str,
        refs: &[QubitRef],
    ) -> ParseResult<Vec<Vec<QubitId>>> {
        let groups: Vec<Vec<QubitId>> = refs
            .iter()
            .map(|r| self.resolve_qubits(r))
            .collect::<ParseResult<_>>()?;

        let mut width = None;
        for (r, group) in refs.iter().zip(&groups) {
            if r.index.is_none() {
                match width {
                    None => width = Some(group.len()),
                    Some(w) if w != group.len() => {
                        return Err(ParseError::BroadcastMismatch {
                            line,
                            name: name.to_string(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        let Some(width) = width else {
            return Ok(vec![groups.into_iter().flatten().collect()]);
        };
        Ok((0..width)
            .map(|i| {
                refs.iter()
                    .zip(&groups)
                    .map(|(r, g)| if r.index.is_none() { g[i] } else { g[0] })
                    .collect()
            })
            .collect())
    }

    fn resolve_qubits(&self, r: &QubitRef) -> ParseResult<Vec<QubitId>> {
        Ok(resolve(&self.qregs, r)?.map(QubitId).collect())
    }

    fn resolve_clbits(&self, r: &BitRef) -> ParseResult<Vec<ClbitId>> {
        Ok(resolve(&self.cregs, r)?.map(ClbitId).collect())
    }
}

/// How a recognized mnemonic becomes instructions.
#[derive(Clone, Copy)]
enum Gate {
    Decomposed(Lowering),
    Direct(GateKind),
}

fn declare(
    regs: &mut FxHashMap<String, (u32, u32)>,
    next: &mut u32,
    name: &str,
    size: u32,
) -> ParseResult<()> {
    if regs.contains_key(name) {
        return Err(ParseError::DuplicateDeclaration(name.to_string()));
    }
    let end = next
        .checked_add(size)
        .filter(|&end| end <= MAX_REGISTER_BITS)
        .ok_or_else(|| ParseError::RegisterTooLarge {
            register: name.to_string(),
            total: u64::from(*next) + u64::from(size),
            limit: MAX_REGISTER_BITS,
        })?;
    regs.insert(name.to_string(), (*next, size));
    *next = end;
    Ok(())
}

/// Flat indices referenced by `r`.
fn resolve(
    regs: &FxHashMap<String, (u32, u32)>,
    r: &RegisterRef,
) -> ParseResult<std::ops::Range<u32>> {
    let &(start, size) = regs
        .get(&r.register)
        .ok_or_else(|| ParseError::UndefinedIdentifier(r.register.clone()))?;

    // `declare` keeps `start + size` within `MAX_REGISTER_BITS`.
    match r.index {
        None => Ok(start..start + size),
        Some(idx) if idx < size => Ok(start + idx..start + idx + 1),
        Some(idx) => Err(ParseError::IndexOutOfBounds {
            register: r.register.clone(),
            index: idx as usize,
            size: size as usize,
        }),
    }
}

fn single(name: &str, qubits: &[QubitId]) -> IrResult<QubitId> {
    match qubits {
        [q] => Ok(*q),
        _ => Err(IrError::QubitCountMismatch {
            gate_name: name.to_string(),
            expected: 1,
            got: qubits.len(),
        }),
    }
}

/// `u1(λ)` → `rz(λ)`.
fn lower_u1(circuit: &mut Circuit, params: &[f64], qubits: &[QubitId]) -> IrResult<()> {
    check_arity("u1", params, 1)?;
    circuit.rz(params[0], single("u1", qubits)?)?;
    Ok(())
}

/// `u2(φ, λ)` → `rz(λ) ry(π/2) rz(φ)`.
fn lower_u2(circuit: &mut Circuit, params: &[f64], qubits: &[QubitId]) -> IrResult<()> {
    check_arity("u2", params, 2)?;
    let q = single("u2", qubits)?;
    circuit.rz(params[1], q)?.ry(FRAC_PI_2, q)?.rz(params[0], q)?;
    Ok(())
}

/// `u3(θ, φ, λ)` → `rz(λ) ry(θ) rz(φ)`.
fn lower_u3(circuit: &mut Circuit, params: &[f64], qubits: &[QubitId]) -> IrResult<()> {
    check_arity("u3", params, 3)?;
    let q = single("u3", qubits)?;
    circuit.rz(params[2], q)?.ry(params[0], q)?.rz(params[1], q)?;
    Ok(())
}

/// `cu1(λ)` → `cp(λ)`.
fn lower_cu1(circuit: &mut Circuit, params: &[f64], qubits: &[QubitId]) -> IrResult<()> {
    check_arity("cu1", params, 1)?;
    let [control, target] = qubits else {
        return Err(IrError::QubitCountMismatch {
            gate_name: "cu1".into(),
            expected: 2,
            got: qubits.len(),
        });
    };
    circuit.cp(params[0], *control, *target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::parser::parse_with;
    use crate::{Diagnostic, ImportOptions, MAX_REGISTER_BITS, ParseError};
    use qcraft_ir::{ClbitId, GateKind, QubitId, StandardGate};
    use std::f64::consts::PI;

    const HEADER: &str = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\n";

    fn import(body: &str) -> crate::Import {
        parse_with(&format!("{HEADER}{body}"), &ImportOptions::default()).unwrap()
    }

    fn names(import: &crate::Import) -> Vec<String> {
        import
            .circuit
            .instructions()
            .iter()
            .map(|i| i.name())
            .collect()
    }

    #[test]
    fn test_registers_are_flattened() {
        let import = import("qreg a[2];\nqreg b[3];\ncx a[1],b[0];");
        assert_eq!(import.circuit.num_qubits(), 5);
        assert_eq!(
            import.circuit.instructions()[0].qubits,
            vec![QubitId(1), QubitId(2)]
        );
    }

    #[test]
    fn test_single_qubit_broadcast() {
        let import = import("qreg q[3];\nh q;");
        assert_eq!(names(&import), vec!["h", "h", "h"]);
        assert_eq!(import.circuit.instructions()[2].qubits, vec![QubitId(2)]);
    }

    #[test]
    fn test_two_qubit_broadcast() {
        let import = import("qreg a[2];\nqreg b[2];\ncx a,b;\ncx a[0],b;");
        let ops: Vec<_> = import
            .circuit
            .instructions()
            .iter()
            .map(|i| (i.qubits[0].0, i.qubits[1].0))
            .collect();
        assert_eq!(ops, vec![(0, 2), (1, 3), (0, 2), (0, 3)]);
    }

    #[test]
    fn test_broadcast_mismatch() {
        let err = parse_with(
            &format!("{HEADER}qreg a[2];\nqreg b[3];\ncx a,b;"),
            &ImportOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::BroadcastMismatch { line: 5, .. }));
    }

    #[test]
    fn test_barrier_register() {
        let import = import("qreg q[3];\nbarrier q;");
        let inst = &import.circuit.instructions()[0];
        assert!(inst.is_barrier());
        assert_eq!(inst.qubits.len(), 3);
    }

    #[test]
    fn test_u_decompositions() {
        let import = import("qreg q[1];\nu1(0.1) q[0];\nu2(0.2,0.3) q[0];\nu3(0.4,0.5,0.6) q[0];");
        let gates: Vec<_> = import
            .circuit
            .instructions()
            .iter()
            .map(|i| *i.as_gate().unwrap())
            .collect();
        assert_eq!(
            gates,
            vec![
                GateKind::Standard(StandardGate::Rz(0.1)),
                GateKind::Standard(StandardGate::Rz(0.3)),
                GateKind::Standard(StandardGate::Ry(PI / 2.0)),
                GateKind::Standard(StandardGate::Rz(0.2)),
                GateKind::Standard(StandardGate::Rz(0.6)),
                GateKind::Standard(StandardGate::Ry(0.4)),
                GateKind::Standard(StandardGate::Rz(0.5)),
            ]
        );
    }

    #[test]
    fn test_uppercase_builtins() {
        let import = import("qreg q[2];\nU(pi,0,pi) q[0];\nCX q[0],q[1];");
        assert_eq!(names(&import), vec!["rz", "ry", "rz", "cx"]);
    }

    #[test]
    fn test_post_measurement_ops_are_dropped() {
        let import = import(
            "qreg q[2];\ncreg meas[2];\nh q[0];\nmeasure q[0] -> meas[0];\nx q[0];\ncx q[1],q[0];\nx q[1];",
        );
        assert_eq!(names(&import), vec!["h", "x"]);
        assert!(import.had_invalid_ops());
        assert_eq!(import.diagnostics.len(), 2);
        assert_eq!(
            import.diagnostics[0],
            Diagnostic::OperationAfterMeasurement {
                line: 7,
                name: "x".into(),
                qubit: QubitId(0),
            }
        );
        assert_eq!(import.circuit.measures().len(), 1);
    }

    #[test]
    fn test_unknown_gate_is_skipped() {
        let import = import("qreg q[2];\nfsim(0.1,0.2) q[0],q[1];\nh q[1];");
        assert_eq!(names(&import), vec!["h"]);
        assert!(!import.had_invalid_ops());
        assert!(matches!(
            &import.diagnostics[0],
            Diagnostic::UnsupportedGate { name, line: 4 } if name == "fsim"
        ));
    }

    #[test]
    fn test_unknown_gate_after_measure_reports_both() {
        let import = import(
            "qreg q[2];\ncreg c[2];\nmeasure q[0] -> c[0];\nfoo q;\nh q[1];",
        );
        assert_eq!(names(&import), vec!["h"]);
        assert!(import.had_invalid_ops());
        assert_eq!(
            import.diagnostics,
            vec![
                Diagnostic::OperationAfterMeasurement {
                    line: 6,
                    name: "foo".into(),
                    qubit: QubitId(0),
                },
                Diagnostic::UnsupportedGate {
                    line: 6,
                    name: "foo".into(),
                },
            ]
        );
    }

    #[test]
    fn test_register_totals_are_bounded() {
        let overflow = format!("{HEADER}qreg a[4294967295];\nqreg b[2];");
        assert!(matches!(
            parse_with(&overflow, &ImportOptions::default()),
            Err(ParseError::RegisterTooLarge { total: 4_294_967_297, .. })
        ));

        let huge = format!("{HEADER}qreg q[4000000000];");
        assert!(matches!(
            parse_with(&huge, &ImportOptions::default()),
            Err(ParseError::RegisterTooLarge { register, .. }) if register == "q"
        ));

        let cbits = format!("{HEADER}qreg q[1];\ncreg c[{}];\ncreg d[1];", MAX_REGISTER_BITS);
        assert!(matches!(
            parse_with(&cbits, &ImportOptions::default()),
            Err(ParseError::RegisterTooLarge { register, .. }) if register == "d"
        ));

        let at_limit = format!("{HEADER}qreg q[{}];", MAX_REGISTER_BITS);
        assert!(parse_with(&at_limit, &ImportOptions::default()).is_ok());
    }

    #[test]
    fn test_unsupported_statements() {
        let import = import(
            "qreg q[1];\ncreg c[1];\nreset q[0];\nif (c == 1) x q[0];\ngate g a { x a; }",
        );
        assert!(import.circuit.is_empty());
        let kinds: Vec<_> = import
            .diagnostics
            .iter()
            .map(|d| match d {
                Diagnostic::UnsupportedStatement { statement, .. } => statement.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(kinds, vec!["reset", "if", "gate"]);
    }

    #[test]
    fn test_strict_import_rejects() {
        let source = format!("{HEADER}qreg q[1];\nfoo q[0];");
        let err = parse_with(&source, &ImportOptions::strict()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Rejected(Diagnostic::UnsupportedGate { .. })
        ));
    }

    #[test]
    fn test_default_measures_are_identity() {
        let import = import("qreg q[3];\nh q[0];");
        let pairs: Vec<_> = import.circuit.measures().iter().collect();
        assert_eq!(
            pairs,
            vec![
                (QubitId(0), ClbitId(0)),
                (QubitId(1), ClbitId(1)),
                (QubitId(2), ClbitId(2)),
            ]
        );
    }

    #[test]
    fn test_measure_register() {
        let import = import("qreg q[2];\ncreg c[2];\nmeasure q -> c;");
        assert_eq!(import.circuit.measures().len(), 2);
        assert_eq!(import.circuit.measures().get(QubitId(1)), Some(ClbitId(1)));
    }

    #[test]
    fn test_construction_errors_are_fatal() {
        let cases = [
            "qreg q[1];\nrx q[0];",
            "qreg q[2];\nh q[0],q[1];",
            "qreg q[1];\nh q[4];",
            "qreg q[1];\nh r[0];",
            "qreg q[1];\nqreg q[2];",
        ];
        for body in cases {
            let source = format!("{HEADER}{body}");
            assert!(
                parse_with(&source, &ImportOptions::default()).is_err(),
                "accepted: {body}"
            );
        }
    }
}
