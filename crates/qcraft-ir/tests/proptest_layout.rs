//! Property-based tests for the layering scheduler and gate algebra.

use ndarray::Array2;
use num_complex::Complex64;
use proptest::prelude::*;
use qcraft_ir::unitary::{self, controlled_embedding, reorder_matrix};
use qcraft_ir::{Circuit, Instruction, QubitId, StandardGate};

/// Gate operations that can be applied to a circuit.
#[derive(Debug, Clone)]
enum GateOp {
    H(u32),
    Rz(u32),
    CX(u32, u32),
    Swap(u32, u32),
    Ccx(u32, u32, u32),
    Barrier(Vec<u32>),
}

impl GateOp {
    fn apply(self, circuit: &mut Circuit) {
        let _ = match self {
            GateOp::H(q) => circuit.h(QubitId(q)),
            GateOp::Rz(q) => circuit.rz(0.5, QubitId(q)),
            GateOp::CX(c, t) => circuit.cx(QubitId(c), QubitId(t)),
            GateOp::Swap(a, b) => circuit.swap(QubitId(a), QubitId(b)),
            GateOp::Ccx(a, b, t) => circuit.ccx(QubitId(a), QubitId(b), QubitId(t)),
            GateOp::Barrier(qs) => circuit.barrier(qs.into_iter().map(QubitId)),
        };
    }
}

fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    let pair = (0..num_qubits, 0..num_qubits).prop_filter("operands must differ", |(a, b)| a != b);
    let triple = (0..num_qubits, 0..num_qubits, 0..num_qubits)
        .prop_filter("operands must differ", |(a, b, c)| a != b && b != c && a != c);
    prop_oneof![
        (0..num_qubits).prop_map(GateOp::H),
        (0..num_qubits).prop_map(GateOp::Rz),
        pair.clone().prop_map(|(c, t)| GateOp::CX(c, t)),
        pair.prop_map(|(a, b)| GateOp::Swap(a, b)),
        triple.prop_map(|(a, b, t)| GateOp::Ccx(a, b, t)),
        proptest::sample::subsequence((0..num_qubits).collect::<Vec<_>>(), 1..=num_qubits as usize)
            .prop_map(GateOp::Barrier),
    ]
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (3_u32..=6).prop_flat_map(|num_qubits| {
        prop::collection::vec(arb_gate_op(num_qubits), 1..=20).prop_map(move |ops| {
            let mut circuit = Circuit::new(num_qubits);
            for op in ops {
                op.apply(&mut circuit);
            }
            circuit
        })
    })
}

fn arb_matrix(k: usize) -> impl Strategy<Value = Array2<Complex64>> {
    let side = 1usize << k;
    prop::collection::vec((-4i32..=4, -4i32..=4), side * side).prop_map(move |entries| {
        let data = entries
            .into_iter()
            .map(|(re, im)| Complex64::new(re as f64 * 0.25, im as f64 * 0.25))
            .collect();
        Array2::from_shape_vec((side, side), data).unwrap()
    })
}

fn arb_reorder_case() -> impl Strategy<Value = (Array2<Complex64>, Vec<u32>)> {
    (1_usize..=4).prop_flat_map(|k| {
        (
            arb_matrix(k),
            Just((0..k as u32).collect::<Vec<_>>()).prop_shuffle(),
        )
    })
}

proptest! {
    /// Reordering by the identity permutation is a no-op.
    #[test]
    fn test_reorder_identity((matrix, perm) in arb_reorder_case()) {
        let identity: Vec<u32> = (0..perm.len() as u32).collect();
        prop_assert_eq!(reorder_matrix(&matrix, &identity).unwrap(), matrix);
    }

    /// Reordering by `p` then by `p⁻¹` restores the matrix exactly.
    #[test]
    fn test_reorder_involution((matrix, perm) in arb_reorder_case()) {
        let mut inverse = vec![0u32; perm.len()];
        for (i, &p) in perm.iter().enumerate() {
            inverse[p as usize] = i as u32;
        }
        let there = reorder_matrix(&matrix, &perm).unwrap();
        let back = reorder_matrix(&there, &inverse).unwrap();
        prop_assert_eq!(back, matrix);
    }

    /// Controlled embedding is identity outside the control-active block.
    #[test]
    fn test_controlled_embedding_shape(c in 1_usize..=3, two_targets in any::<bool>()) {
        let (target, t) = if two_targets {
            (StandardGate::Swap.matrix(), 2)
        } else {
            (StandardGate::Ry(0.7).matrix(), 1)
        };
        let controls: Vec<u32> = (0..c as u32).collect();
        let targets: Vec<u32> = (c as u32..(c + t) as u32).collect();
        let m = controlled_embedding(&controls, &targets, &target).unwrap();

        let side = 1usize << (c + t);
        prop_assert_eq!(m.dim(), (side, side));
        let block = side - (1 << t);
        for i in 0..side {
            for j in 0..side {
                if i < block || j < block {
                    let expected = if i == j { 1.0 } else { 0.0 };
                    prop_assert_eq!(m[[i, j]], Complex64::new(expected, 0.0));
                }
            }
        }
        prop_assert!(unitary::is_unitary(&m, unitary::EPSILON));
    }

    /// A multi-qubit gate is placed after every earlier instruction on any
    /// wire of its span, and before every later one.
    #[test]
    fn test_layering_respects_spans(circuit in arb_circuit()) {
        let layout = circuit.layered();
        let insts = circuit.instructions();

        for (i, a) in insts.iter().enumerate() {
            let (alo, ahi) = a.span().unwrap();
            let la = layout.layer_of(i).unwrap();
            for (j, b) in insts.iter().enumerate().skip(i + 1) {
                let (blo, bhi) = b.span().unwrap();
                if alo <= bhi && blo <= ahi {
                    let lb = layout.layer_of(j).unwrap();
                    prop_assert!(la < lb, "instruction {} at {} not before {} at {}", i, la, j, lb);
                }
            }
        }
    }

    /// Reading any qubit's row left to right yields exactly the
    /// instructions that list it as an operand, in program order.
    #[test]
    fn test_layering_preserves_program_order(circuit in arb_circuit()) {
        let layout = circuit.layered();
        for q in 0..circuit.num_qubits() {
            let qubit = QubitId(q);
            let read: Vec<*const Instruction> = layout
                .gates_on(qubit)
                .into_iter()
                .flatten()
                .map(std::ptr::from_ref)
                .collect();
            let expected: Vec<*const Instruction> = circuit
                .instructions()
                .iter()
                .filter(|inst| inst.qubits.contains(&qubit))
                .map(std::ptr::from_ref)
                .collect();
            prop_assert_eq!(read, expected);
        }
    }

    /// A multi-qubit gate reads at the same layer from every operand row.
    #[test]
    fn test_operands_share_a_layer(circuit in arb_circuit()) {
        let layout = circuit.layered();
        for (i, inst) in circuit.instructions().iter().enumerate() {
            let layer = layout.layer_of(i).unwrap();
            for q in &inst.qubits {
                let found = layout.gates_on(*q)[layer];
                prop_assert!(found.is_some_and(|f| std::ptr::eq(f, inst)));
                if let Some(row) = layout.row_of(*q) {
                    prop_assert!(layout.occupant(row, layer).is_some_and(|f| std::ptr::eq(f, inst)));
                }
            }
        }
    }

    /// Every row has the same length.
    #[test]
    fn test_layering_is_rectangular(circuit in arb_circuit()) {
        let layout = circuit.layered();
        for row in layout.rows() {
            prop_assert_eq!(row.cells.len(), layout.depth());
        }
    }
}

#[test]
fn test_bell_layout_end_to_end() {
    let mut circuit = Circuit::new(2);
    circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
    circuit
        .measure(&[QubitId(0), QubitId(1)], None, 1000, false)
        .unwrap();

    let layout = circuit.layered();
    assert_eq!(layout.num_rows(), 2);
    assert_eq!(layout.depth(), 2);

    let row0: Vec<_> = (0..2).map(|l| layout.cell(0, l).map(|i| i.name())).collect();
    assert_eq!(row0, vec![Some("h".to_string()), Some("cx".to_string())]);

    // Read by operand, q1 sees the cx in the same layer as q0.
    let row1: Vec<_> = (0..2).map(|l| layout.occupant(1, l).map(|i| i.name())).collect();
    assert_eq!(row1, vec![None, Some("cx".to_string())]);
    assert_eq!(layout.layer_of(1), Some(1));

    // Storage keeps the cx on its lowest wire only.
    assert_eq!(layout.rows()[1].cells, vec![None, None]);
}

#[test]
fn test_layout_serializes_rows() {
    let circuit = Circuit::bell().unwrap();
    let layout = circuit.layered();
    let json = serde_json::to_value(layout.rows()).unwrap();
    assert_eq!(json[0]["qubit"], 0);
    assert_eq!(json[0]["cells"], serde_json::json!([0, 1]));
    assert_eq!(json[1]["cells"], serde_json::json!([null, null]));
}
