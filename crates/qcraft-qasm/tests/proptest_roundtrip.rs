//! Property-based tests for QASM2 roundtrip conversion.
//!
//! Tests that circuit → QASM2 → circuit reproduces the circuit exactly.

use qcraft_ir::{Circuit, ClbitId, DEFAULT_SHOTS, Instruction, QubitId, StandardGate};
use qcraft_qasm::{emit, parse};
use proptest::prelude::*;
use proptest::sample::subsequence;

/// Distinct operands for an `arity`-qubit instruction.
fn arb_operands(num_qubits: u32, arity: usize) -> impl Strategy<Value = Vec<QubitId>> {
    subsequence((0..num_qubits).collect::<Vec<_>>(), arity)
        .prop_shuffle()
        .prop_map(|qs| qs.into_iter().map(QubitId).collect())
}

fn arb_angle() -> impl Strategy<Value = f64> {
    -10.0_f64..10.0
}

/// Generate a random instruction valid for `num_qubits`.
fn arb_instruction(num_qubits: u32) -> BoxedStrategy<Instruction> {
    let fixed = prop_oneof![
        Just(StandardGate::H),
        Just(StandardGate::X),
        Just(StandardGate::Y),
        Just(StandardGate::Z),
        Just(StandardGate::S),
        Just(StandardGate::Tdg),
        Just(StandardGate::SX),
    ];
    let rotation = prop_oneof![
        arb_angle().prop_map(StandardGate::Rx),
        arb_angle().prop_map(StandardGate::Ry),
        arb_angle().prop_map(StandardGate::Rz),
        arb_angle().prop_map(StandardGate::P),
    ];
    let single = (prop_oneof![fixed, rotation], arb_operands(num_qubits, 1))
        .prop_map(|(g, qs)| Instruction::gate(g, qs));

    if num_qubits < 2 {
        return single.boxed();
    }

    let two = prop_oneof![
        Just(StandardGate::Swap),
        Just(StandardGate::ISwap),
        arb_angle().prop_map(StandardGate::Rzz),
    ];
    let pair = (two, arb_operands(num_qubits, 2)).prop_map(|(g, qs)| Instruction::gate(g, qs));
    let cx = arb_operands(num_qubits, 2).prop_map(|qs| {
        Instruction::gate(qcraft_ir::ControlledGate::new(1, StandardGate::X), qs)
    });
    let crz = (arb_angle(), arb_operands(num_qubits, 2)).prop_map(|(theta, qs)| {
        Instruction::gate(qcraft_ir::ControlledGate::new(1, StandardGate::Rz(theta)), qs)
    });
    let barrier = (1..=num_qubits as usize)
        .prop_flat_map(move |n| arb_operands(num_qubits, n))
        .prop_map(Instruction::barrier);

    if num_qubits < 3 {
        return prop_oneof![4 => single, 2 => pair, 2 => cx, 1 => crz, 1 => barrier].boxed();
    }

    let ccx = arb_operands(num_qubits, 3).prop_map(|qs| {
        Instruction::gate(qcraft_ir::ControlledGate::new(2, StandardGate::X), qs)
    });
    prop_oneof![4 => single, 2 => pair, 2 => cx, 1 => crz, 1 => ccx, 1 => barrier].boxed()
}

/// Measured qubits in random order, read into consecutive bits.
fn arb_measured(num_qubits: u32) -> impl Strategy<Value = Vec<QubitId>> {
    (1..=num_qubits as usize).prop_flat_map(move |n| arb_operands(num_qubits, n))
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1_u32..=5).prop_flat_map(|num_qubits| {
        (
            prop::collection::vec(arb_instruction(num_qubits), 0..=12),
            prop::option::of(arb_measured(num_qubits)),
        )
            .prop_map(move |(instructions, measured)| {
                let mut circuit = Circuit::new(num_qubits);
                for instruction in instructions {
                    circuit.append(instruction).unwrap();
                }
                if let Some(qubits) = measured {
                    circuit.measure(&qubits, None, DEFAULT_SHOTS, false).unwrap();
                }
                circuit
            })
    })
}

proptest! {
    /// Emitting and re-importing a circuit yields an equal circuit.
    #[test]
    fn test_circuit_qasm_roundtrip(circuit in arb_circuit()) {
        let qasm = emit(&circuit);
        let import = parse(&qasm).expect("emitted QASM must parse");

        prop_assert!(import.is_clean(), "diagnostics: {:?}", import.diagnostics);
        prop_assert_eq!(&import.circuit, &circuit);
    }

    /// The layered view survives the roundtrip.
    #[test]
    fn test_roundtrip_preserves_layout(circuit in arb_circuit()) {
        let parsed = parse(&emit(&circuit)).unwrap().circuit;

        let before = circuit.layered();
        let after = parsed.layered();
        prop_assert_eq!(before.depth(), after.depth());
        prop_assert_eq!(before.rows(), after.rows());
    }

    /// Emission is deterministic and emits one measure line per mapped qubit.
    #[test]
    fn test_emit_is_deterministic(circuit in arb_circuit()) {
        let qasm1 = emit(&circuit);
        let qasm2 = emit(&circuit);
        prop_assert_eq!(&qasm1, &qasm2);

        let measures = qasm1.lines().filter(|l| l.starts_with("measure ")).count();
        prop_assert_eq!(measures, circuit.measures().len());
    }
}

#[test]
fn test_explicit_clbits_roundtrip() {
    let mut circuit = Circuit::new(3);
    circuit.h(QubitId(0)).unwrap();
    circuit
        .measure(
            &[QubitId(2), QubitId(0)],
            Some(&[ClbitId(0), ClbitId(5)]),
            DEFAULT_SHOTS,
            false,
        )
        .unwrap();

    let parsed = parse(&emit(&circuit)).unwrap().circuit;
    assert_eq!(parsed, circuit);
}
