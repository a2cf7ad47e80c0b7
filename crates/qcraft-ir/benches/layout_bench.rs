//! Benchmarks for layering and operator construction
//!
//! Run with: cargo bench -p qcraft-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qcraft_ir::{Circuit, QubitId};
use std::f64::consts::PI;

/// Brick-wall circuit: a row of rotations then alternating CX pairs.
fn brickwork(num_qubits: u32, layers: u32) -> Circuit {
    let mut circuit = Circuit::new(num_qubits);
    for layer in 0..layers {
        for i in 0..num_qubits {
            circuit.ry(PI / 4.0, QubitId(i)).unwrap();
        }
        for i in ((layer % 2)..num_qubits.saturating_sub(1)).step_by(2) {
            circuit.cx(QubitId(i), QubitId(i + 1)).unwrap();
        }
    }
    circuit
}

/// Benchmark GHZ construction
fn bench_ghz_circuit(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghz_circuit");

    for num_qubits in &[3, 10, 50, 100] {
        group.bench_with_input(
            BenchmarkId::new("create", num_qubits),
            num_qubits,
            |b, &n| {
                b.iter(|| black_box(Circuit::ghz(n).unwrap()));
            },
        );
    }

    group.finish();
}

/// Benchmark the layering scheduler
fn bench_layered(c: &mut Criterion) {
    let mut group = c.benchmark_group("layered");

    for num_qubits in &[5, 10, 20, 50] {
        let circuit = brickwork(*num_qubits, 10);
        group.bench_with_input(
            BenchmarkId::new("brickwork", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| black_box(circuit.layered().depth()));
            },
        );
    }

    // Long-range gates stress the span alignment.
    for num_qubits in &[10, 50] {
        let mut circuit = Circuit::new(*num_qubits);
        for i in 0..*num_qubits - 1 {
            circuit.h(QubitId(i)).unwrap();
            circuit.cx(QubitId(0), QubitId(*num_qubits - 1 - i)).unwrap();
        }
        group.bench_with_input(
            BenchmarkId::new("long_range", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| black_box(circuit.layered().depth()));
            },
        );
    }

    group.finish();
}

/// Benchmark per-gate operator construction
fn bench_operators(c: &mut Criterion) {
    let mut group = c.benchmark_group("operators");

    let circuit = brickwork(10, 5);
    group.bench_function("brickwork_10x5", |b| {
        b.iter(|| black_box(circuit.operators().unwrap()));
    });

    let mut toffolis = Circuit::new(6);
    for i in 0..4 {
        toffolis
            .toffoli(QubitId(i + 2), QubitId(i), QubitId(i + 1))
            .unwrap();
    }
    group.bench_function("toffoli_chain", |b| {
        b.iter(|| black_box(toffolis.operators().unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_ghz_circuit, bench_layered, bench_operators);

criterion_main!(benches);
