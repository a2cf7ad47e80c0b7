//! Gate algebra: matrix constructors, tensor-axis reordering and
//! controlled-gate embedding.
//!
//! Matrices are dense `2^k × 2^k` [`Array2<Complex64>`] values. The first
//! tensor axis is the most significant bit of the row/column index, so a
//! matrix "in the order `[a, b]`" has qubit `a` as its leading axis.

use ndarray::{Array2, IxDyn, array, s};
use num_complex::Complex64;

use crate::error::{IrError, IrResult};

/// Dense complex matrix used for every gate operator.
pub type Matrix = Array2<Complex64>;

/// Default tolerance for unitarity checks.
pub const EPSILON: f64 = 1e-10;

#[inline]
fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// Number of qubits a square matrix of side `2^k` acts on.
pub fn num_qubits_of(matrix: &Matrix) -> IrResult<usize> {
    let side = matrix.nrows();
    if matrix.ncols() != side || !side.is_power_of_two() {
        return Err(IrError::MatrixShape {
            side,
            positions: 0,
        });
    }
    Ok(side.trailing_zeros() as usize)
}

/// Reorder the tensor axes of `matrix` according to `positions`.
///
/// The matrix is reshaped into a rank-`2k` tensor, the argsort of
/// `positions` is applied to the row axes and (offset by `k`) to the column
/// axes, and the tensor is reshaped back. Only basis labels move, so the
/// result is bit-exact.
pub fn reorder_matrix(matrix: &Matrix, positions: &[u32]) -> IrResult<Matrix> {
    let k = positions.len();
    let side = matrix.nrows();
    if matrix.ncols() != side || k >= usize::BITS as usize || side != 1usize << k {
        return Err(IrError::MatrixShape {
            side,
            positions: k,
        });
    }
    if k < 2 {
        return Ok(matrix.clone());
    }

    let mut order: Vec<usize> = (0..k).collect();
    order.sort_by_key(|&i| positions[i]);
    let axes: Vec<usize> = order
        .iter()
        .copied()
        .chain(order.iter().map(|&i| i + k))
        .collect();

    let shape_err = |_| IrError::MatrixShape {
        side,
        positions: k,
    };
    let tensor = matrix
        .as_standard_layout()
        .into_owned()
        .into_shape_with_order(IxDyn(&vec![2; 2 * k]))
        .map_err(shape_err)?;
    tensor
        .permuted_axes(axes)
        .as_standard_layout()
        .into_owned()
        .into_shape_with_order((side, side))
        .map_err(shape_err)
}

/// Reverse the tensor-axis order of a matrix (`[0, 1, …, k-1]` becomes
/// `[k-1, …, 1, 0]`).
pub fn reverse_order(matrix: &Matrix) -> IrResult<Matrix> {
    let k = num_qubits_of(matrix)?;
    let reversed: Vec<u32> = (0..k as u32).rev().collect();
    reorder_matrix(matrix, &reversed)
}

/// Embed `target` into the bottom-right block of an identity matrix sized
/// for `num_controls` extra leading qubits.
///
/// The resulting matrix is in the order `controls ++ targets` and acts
/// non-trivially only when every control is `|1⟩`.
pub fn controlled_matrix(num_controls: usize, target: &Matrix) -> IrResult<Matrix> {
    let num_targets = num_qubits_of(target)?;
    let target_dim = target.nrows();
    let dim = 1usize << (num_controls + num_targets);
    let offset = dim - target_dim;

    let mut matrix = identity(dim);
    matrix.slice_mut(s![offset.., offset..]).assign(target);
    Ok(matrix)
}

/// Build the full operator of a controlled gate whose operands are
/// `controls ++ targets`.
///
/// Reordering only fixes the relative order among the gate's own
/// positions; placing the operator inside a register is the caller's job.
pub fn controlled_embedding(controls: &[u32], targets: &[u32], target: &Matrix) -> IrResult<Matrix> {
    if target.nrows() != 1usize << targets.len() {
        return Err(IrError::MatrixShape {
            side: target.nrows(),
            positions: targets.len(),
        });
    }
    let matrix = controlled_matrix(controls.len(), target)?;
    let positions: Vec<u32> = controls.iter().chain(targets).copied().collect();
    reorder_matrix(&matrix, &positions)
}

/// Check `m · m† ≈ I` within `tol`.
pub fn is_unitary(matrix: &Matrix, tol: f64) -> bool {
    let side = matrix.nrows();
    if matrix.ncols() != side {
        return false;
    }
    let adjoint = matrix.t().mapv(|z| z.conj());
    let product = matrix.dot(&adjoint);
    let eye = identity(side);
    product
        .iter()
        .zip(eye.iter())
        .all(|(a, b)| (a - b).norm() < tol)
}

/// Identity matrix of side `dim`.
pub fn identity(dim: usize) -> Matrix {
    Array2::eye(dim)
}

// =========================================================================
// Fixed single-qubit matrices
// =========================================================================

/// Hadamard.
pub fn h() -> Matrix {
    let s = std::f64::consts::FRAC_1_SQRT_2;
    array![[c(s, 0.0), c(s, 0.0)], [c(s, 0.0), c(-s, 0.0)]]
}

/// Pauli-X.
pub fn x() -> Matrix {
    array![[c(0.0, 0.0), c(1.0, 0.0)], [c(1.0, 0.0), c(0.0, 0.0)]]
}

/// Pauli-Y.
pub fn y() -> Matrix {
    array![[c(0.0, 0.0), c(0.0, -1.0)], [c(0.0, 1.0), c(0.0, 0.0)]]
}

/// Pauli-Z.
pub fn z() -> Matrix {
    array![[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(-1.0, 0.0)]]
}

/// S = sqrt(Z).
pub fn s() -> Matrix {
    p(std::f64::consts::FRAC_PI_2)
}

/// S-dagger.
pub fn sdg() -> Matrix {
    p(-std::f64::consts::FRAC_PI_2)
}

/// T = fourth root of Z.
pub fn t() -> Matrix {
    p(std::f64::consts::FRAC_PI_4)
}

/// T-dagger.
pub fn tdg() -> Matrix {
    p(-std::f64::consts::FRAC_PI_4)
}

/// sqrt(X).
pub fn sx() -> Matrix {
    array![[c(0.5, 0.5), c(0.5, -0.5)], [c(0.5, -0.5), c(0.5, 0.5)]]
}

/// sqrt(Y).
pub fn sy() -> Matrix {
    array![[c(0.5, 0.5), c(-0.5, -0.5)], [c(0.5, 0.5), c(0.5, 0.5)]]
}

/// W = (X + Y) / sqrt(2).
pub fn w() -> Matrix {
    let s = std::f64::consts::FRAC_1_SQRT_2;
    array![[c(0.0, 0.0), c(s, -s)], [c(s, s), c(0.0, 0.0)]]
}

// =========================================================================
// Parametric single-qubit matrices
// =========================================================================

/// Rotation about X.
pub fn rx(theta: f64) -> Matrix {
    let (s, co) = (theta / 2.0).sin_cos();
    array![[c(co, 0.0), c(0.0, -s)], [c(0.0, -s), c(co, 0.0)]]
}

/// Rotation about Y.
pub fn ry(theta: f64) -> Matrix {
    let (s, co) = (theta / 2.0).sin_cos();
    array![[c(co, 0.0), c(-s, 0.0)], [c(s, 0.0), c(co, 0.0)]]
}

/// Rotation about Z.
pub fn rz(theta: f64) -> Matrix {
    array![
        [Complex64::from_polar(1.0, -theta / 2.0), c(0.0, 0.0)],
        [c(0.0, 0.0), Complex64::from_polar(1.0, theta / 2.0)]
    ]
}

/// Phase gate `diag(1, e^{iλ})`.
pub fn p(lambda: f64) -> Matrix {
    array![
        [c(1.0, 0.0), c(0.0, 0.0)],
        [c(0.0, 0.0), Complex64::from_polar(1.0, lambda)]
    ]
}

// =========================================================================
// Two-qubit matrices
// =========================================================================

/// SWAP.
pub fn swap() -> Matrix {
    let (o, l) = (c(0.0, 0.0), c(1.0, 0.0));
    array![[l, o, o, o], [o, o, l, o], [o, l, o, o], [o, o, o, l]]
}

/// iSWAP.
pub fn iswap() -> Matrix {
    let (o, l, i) = (c(0.0, 0.0), c(1.0, 0.0), c(0.0, 1.0));
    array![[l, o, o, o], [o, o, i, o], [o, i, o, o], [o, o, o, l]]
}

/// XX rotation `exp(-iθ/2 X⊗X)`.
pub fn rxx(theta: f64) -> Matrix {
    let (s, co) = (theta / 2.0).sin_cos();
    let (o, d, a) = (c(0.0, 0.0), c(co, 0.0), c(0.0, -s));
    array![[d, o, o, a], [o, d, a, o], [o, a, d, o], [a, o, o, d]]
}

/// YY rotation `exp(-iθ/2 Y⊗Y)`.
pub fn ryy(theta: f64) -> Matrix {
    let (s, co) = (theta / 2.0).sin_cos();
    let (o, d) = (c(0.0, 0.0), c(co, 0.0));
    let (plus, minus) = (c(0.0, s), c(0.0, -s));
    array![
        [d, o, o, plus],
        [o, d, minus, o],
        [o, minus, d, o],
        [plus, o, o, d]
    ]
}

/// ZZ rotation `exp(-iθ/2 Z⊗Z)`.
pub fn rzz(theta: f64) -> Matrix {
    let neg = Complex64::from_polar(1.0, -theta / 2.0);
    let pos = Complex64::from_polar(1.0, theta / 2.0);
    let o = c(0.0, 0.0);
    array![
        [neg, o, o, o],
        [o, pos, o, o],
        [o, o, pos, o],
        [o, o, o, neg]
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn approx_eq(a: &Matrix, b: &Matrix) -> bool {
        a.shape() == b.shape() && a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() < 1e-9)
    }

    /// CNOT with control on the leading axis.
    fn cnot_leading_control() -> Matrix {
        let (o, l) = (c(0.0, 0.0), c(1.0, 0.0));
        array![[l, o, o, o], [o, l, o, o], [o, o, o, l], [o, o, l, o]]
    }

    #[test]
    fn test_identity_positions_leave_matrix_untouched() {
        let m = rxx(0.3).dot(&cnot_leading_control());
        assert_eq!(reorder_matrix(&m, &[0, 1]).unwrap(), m);
        assert_eq!(reorder_matrix(&m, &[3, 8]).unwrap(), m);
    }

    #[test]
    fn test_reorder_swaps_control_and_target() {
        // Control on the second operand: positions [1, 0].
        let flipped = reorder_matrix(&cnot_leading_control(), &[1, 0]).unwrap();
        let (o, l) = (c(0.0, 0.0), c(1.0, 0.0));
        let expected = array![[l, o, o, o], [o, o, o, l], [o, o, l, o], [o, l, o, o]];
        assert_eq!(flipped, expected);
    }

    #[test]
    fn test_reorder_rejects_wrong_width() {
        let err = reorder_matrix(&swap(), &[0, 1, 2]).unwrap_err();
        assert!(matches!(
            err,
            IrError::MatrixShape {
                side: 4,
                positions: 3
            }
        ));
    }

    #[test]
    fn test_reverse_order_of_symmetric_gate() {
        assert_eq!(reverse_order(&swap()).unwrap(), swap());
        assert_eq!(reverse_order(&h()).unwrap(), h());
    }

    #[test]
    fn test_controlled_matrix_block() {
        let cz = controlled_matrix(1, &z()).unwrap();
        assert_eq!(cz.dim(), (4, 4));
        assert_eq!(cz[[3, 3]], c(-1.0, 0.0));
        assert_eq!(cz[[0, 0]], c(1.0, 0.0));

        let ccx = controlled_matrix(2, &x()).unwrap();
        assert_eq!(ccx.dim(), (8, 8));
        assert_eq!(ccx[[6, 7]], c(1.0, 0.0));
        assert_eq!(ccx[[7, 6]], c(1.0, 0.0));
        assert_eq!(ccx[[6, 6]], c(0.0, 0.0));
        for i in 0..6 {
            assert_eq!(ccx[[i, i]], c(1.0, 0.0));
        }
    }

    #[test]
    fn test_controlled_embedding_matches_cnot() {
        let cx = controlled_embedding(&[0], &[1], &x()).unwrap();
        assert_eq!(cx, cnot_leading_control());

        let reversed = controlled_embedding(&[1], &[0], &x()).unwrap();
        assert_eq!(reversed, reorder_matrix(&cnot_leading_control(), &[1, 0]).unwrap());
    }

    #[test]
    fn test_controlled_embedding_rejects_bad_target() {
        let err = controlled_embedding(&[0], &[1, 2], &x()).unwrap_err();
        assert!(matches!(err, IrError::MatrixShape { .. }));
    }

    #[test]
    fn test_standard_matrices_are_unitary() {
        for m in [
            h(),
            x(),
            y(),
            z(),
            s(),
            sdg(),
            t(),
            tdg(),
            sx(),
            sy(),
            w(),
            rx(0.7),
            ry(-1.3),
            rz(2.1),
            p(PI / 3.0),
            swap(),
            iswap(),
            rxx(0.4),
            ryy(1.9),
            rzz(-0.8),
        ] {
            assert!(is_unitary(&m, EPSILON), "not unitary: {m:?}");
        }
    }

    #[test]
    fn test_square_roots() {
        assert!(approx_eq(&sx().dot(&sx()), &x()));
        assert!(approx_eq(&sy().dot(&sy()), &y()));
        assert!(approx_eq(&s().dot(&s()), &z()));
        assert!(approx_eq(&t().dot(&t()), &s()));
    }

    #[test]
    fn test_rotation_at_pi_is_pauli_up_to_phase() {
        let minus_i = c(0.0, -1.0);
        assert!(approx_eq(&rx(PI), &x().mapv(|v| v * minus_i)));
        assert!(approx_eq(&ry(PI), &y().mapv(|v| v * minus_i)));
    }

    #[test]
    fn test_num_qubits_of() {
        assert_eq!(num_qubits_of(&h()).unwrap(), 1);
        assert_eq!(num_qubits_of(&swap()).unwrap(), 2);
        assert!(num_qubits_of(&Array2::zeros((3, 3))).is_err());
    }
}
