use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::field::{F64Field, RealField};

// ======================== tridiagonal eigenvalues ========================

#[test]
fn eigen_empty_and_single() {
    assert_eq!(zero_diagonal_eigenvalues::<f64>(vec![]).unwrap(), Vec::<f64>::new());
    // A 1x1 zero matrix has the single eigenvalue 0.
    assert_eq!(zero_diagonal_eigenvalues(vec![0.0_f64]).unwrap(), vec![0.0]);
}

#[test]
fn eigen_two_by_two() {
    // [[0, b], [b, 0]] has eigenvalues -b, b.
    let b = 0.7_f64;
    let ev = zero_diagonal_eigenvalues(vec![b, 0.0]).unwrap();
    assert!((ev[0] + b).abs() < 1e-14);
    assert!((ev[1] - b).abs() < 1e-14);
}

#[test]
fn eigen_three_by_three() {
    // [[0,a,0],[a,0,b],[0,b,0]] has eigenvalues -r, 0, r with r = hypot(a, b).
    let (a, b) = (0.6_f64, 0.8);
    let ev = zero_diagonal_eigenvalues(vec![a, b, 0.0]).unwrap();
    assert!((ev[0] + 1.0).abs() < 1e-14);
    assert!(ev[1].abs() < 1e-14);
    assert!((ev[2] - 1.0).abs() < 1e-14);
}

#[test]
fn eigen_sorted_ascending() {
    let ev = zero_diagonal_eigenvalues(vec![0.3_f64, 0.9, 0.2, 0.5, 0.0]).unwrap();
    for w in ev.windows(2) {
        assert!(w[0] < w[1]);
    }
    // Zero-diagonal symmetric matrices have symmetric spectra.
    let n = ev.len();
    for i in 0..n {
        assert!((ev[i] + ev[n - 1 - i]).abs() < 1e-13);
    }
}

#[cfg(feature = "rug")]
#[test]
fn eigen_high_precision_two_by_two() {
    use crate::field::{MpField, Real};

    let field = MpField::decimal(45);
    let b = field.from_i64(3).sqrt().recip();
    let ev = zero_diagonal_eigenvalues(vec![b.clone(), field.zero()]).unwrap();
    let err = (ev[1].clone() - b).abs();
    assert!(err < field.from_f64(1e-40), "error {err}");
}

// ======================== structure ========================

#[test]
fn structure_single_block() {
    assert_eq!(collocation_structure(3, 1), vec![Block { rows: 5, steps: 5 }]);
}

#[test]
fn structure_general() {
    let s = collocation_structure(2, 3);
    assert_eq!(
        s,
        vec![
            Block { rows: 3, steps: 2 },
            Block { rows: 2, steps: 2 },
            Block { rows: 2, steps: 2 },
            Block { rows: 2, steps: 2 },
            Block { rows: 3, steps: 4 },
        ]
    );
    let rows: usize = s.iter().map(|b| b.rows).sum();
    let steps: usize = s.iter().map(|b| b.steps).sum();
    assert_eq!(rows, 3 * 4);
    assert_eq!(steps, 3 * 4);
}

#[test]
fn structure_k1_degenerate() {
    let s = collocation_structure(1, 3);
    assert_eq!(
        s,
        vec![
            Block { rows: 2, steps: 1 },
            Block { rows: 2, steps: 2 },
            Block { rows: 1, steps: 1 },
            Block { rows: 1, steps: 1 },
            Block { rows: 3, steps: 4 },
        ]
    );
    let rows: usize = s.iter().map(|b| b.rows).sum();
    assert_eq!(rows, 9);
    assert_eq!(s.iter().map(|b| b.steps).sum::<usize>(), 9);
}

// ======================== banded solve ========================

#[test]
fn solve_single_block_3x3() {
    let field = F64Field;
    let mut a = BandMatrix::zeros(&field, 3, 3);
    for (r, row) in [[2.0, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 2.0]].iter().enumerate() {
        a.row_mut(r).clone_from_slice(row);
    }
    let x = BlockBanded::collocation(a, 1, 1).unwrap().solve(vec![3.0, 5.0, 3.0]).unwrap();
    for xi in &x {
        assert!((xi - 1.0).abs() < 1e-14);
    }
}

#[test]
fn solve_rejects_zero_row() {
    let field = F64Field;
    let mut a = BandMatrix::zeros(&field, 3, 3);
    a.row_mut(0).clone_from_slice(&[1.0, 0.0, 0.0]);
    // row 1 left all zero
    a.row_mut(2).clone_from_slice(&[0.0, 0.0, 1.0]);
    let err = BlockBanded::collocation(a, 1, 1).unwrap().solve(vec![1.0, 1.0, 1.0]).unwrap_err();
    assert_eq!(err, LinalgError::Singular);
}

#[test]
fn solve_rejects_dependent_rows() {
    let field = F64Field;
    let mut a = BandMatrix::zeros(&field, 3, 3);
    a.row_mut(0).clone_from_slice(&[1.0, 2.0, 3.0]);
    a.row_mut(1).clone_from_slice(&[2.0, 4.0, 6.0]);
    a.row_mut(2).clone_from_slice(&[0.0, 1.0, 1.0]);
    let err = BlockBanded::collocation(a, 1, 1).unwrap().solve(vec![1.0, 2.0, 1.0]).unwrap_err();
    assert_eq!(err, LinalgError::Singular);
}

#[test]
fn dimension_checks() {
    let field = F64Field;
    let a: BandMatrix<f64> = BandMatrix::zeros(&field, 7, 4);
    assert!(matches!(
        BlockBanded::collocation(a, 2, 2),
        Err(LinalgError::DimensionMismatch { expected: 8, got: 7 })
    ));

    let a: BandMatrix<f64> = BandMatrix::zeros(&field, 8, 5);
    assert!(matches!(
        BlockBanded::collocation(a, 2, 2),
        Err(LinalgError::DimensionMismatch { expected: 4, got: 5 })
    ));

    let mut a = BandMatrix::zeros(&field, 3, 3);
    a.row_mut(0).clone_from_slice(&[1.0, 0.0, 0.0]);
    a.row_mut(1).clone_from_slice(&[0.0, 1.0, 0.0]);
    a.row_mut(2).clone_from_slice(&[0.0, 0.0, 1.0]);
    let err = BlockBanded::collocation(a, 1, 1).unwrap().solve(vec![1.0; 4]).unwrap_err();
    assert_eq!(err, LinalgError::DimensionMismatch { expected: 3, got: 4 });
}

// Global column of the first stored coefficient of each equation, for the
// collocation layout with k >= 2.
fn row_origin(r: usize, k: usize, l: usize) -> usize {
    let n = l * (k + 2);
    if r == 0 {
        return 0;
    }
    if r == n - 1 {
        return (l - 1) * (k + 2);
    }
    let i = r / (k + 2);
    let j = r % (k + 2);
    match j {
        0 => (i - 1) * (k + 2) + k,            // C0 continuity row
        _ if j == k + 1 => i * (k + 2) + k,    // C1 continuity row
        _ => i * (k + 2),                      // collocation row
    }
}

/// Textbook dense LU with partial pivoting, for cross-checking.
fn dense_solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Vec<f64> {
    let n = b.len();
    for col in 0..n {
        let mut piv = col;
        for r in col + 1..n {
            if a[r][col].abs() > a[piv][col].abs() {
                piv = r;
            }
        }
        a.swap(col, piv);
        b.swap(col, piv);
        assert!(a[col][col] != 0.0, "reference matrix is singular");
        for r in col + 1..n {
            let f = a[r][col] / a[col][col];
            for c in col..n {
                a[r][c] -= f * a[col][c];
            }
            b[r] -= f * b[col];
        }
    }
    let mut x = vec![0.0; n];
    for r in (0..n).rev() {
        let mut sum = b[r];
        for c in r + 1..n {
            sum -= a[r][c] * x[c];
        }
        x[r] = sum / a[r][r];
    }
    x
}

#[test]
fn solve_matches_dense_lu_on_random_structured_systems() {
    let mut rng = StdRng::seed_from_u64(0x9d2c5680);
    for &(k, l) in &[(2usize, 3usize), (3, 4), (4, 2), (5, 1)] {
        let n = l * (k + 2);
        let field = F64Field;
        let mut band = BandMatrix::zeros(&field, n, k + 2);
        let mut dense = vec![vec![0.0_f64; n]; n];
        for r in 0..n {
            let origin = row_origin(r, k, l);
            for c in 0..k + 2 {
                let mut v: f64 = rng.random_range(-1.0..1.0);
                if origin + c == r {
                    // keep the reference solve comfortably well conditioned
                    v += 4.0;
                }
                band[(r, c)] = v;
                dense[r][origin + c] = v;
            }
        }
        let b: Vec<f64> = (0..n).map(|_| rng.random_range(-1.0..1.0)).collect();

        let want = dense_solve(dense, b.clone());
        let got = BlockBanded::collocation(band, k, l).unwrap().solve(b).unwrap();
        for (g, w) in got.iter().zip(&want) {
            assert!((g - w).abs() < 1e-10, "k={k} l={l}: {g} vs {w}");
        }
    }
}

#[test]
fn solve_with_explicit_structure() {
    // Same 3x3 system as above, but through the generic entry point.
    let field = F64Field;
    let mut a = BandMatrix::zeros(&field, 3, 3);
    a.row_mut(0).clone_from_slice(&[2.0, 1.0, 0.0]);
    a.row_mut(1).clone_from_slice(&[1.0, 3.0, 1.0]);
    a.row_mut(2).clone_from_slice(&[0.0, 1.0, 2.0]);
    let dec = BlockBanded::with_structure(a, vec![Block { rows: 3, steps: 3 }]).unwrap();
    let x = dec.solve(vec![3.0, 5.0, 3.0]).unwrap();
    for xi in &x {
        assert!((xi - 1.0).abs() < 1e-14);
    }
}

#[test]
fn with_structure_validates_row_sums() {
    let field = F64Field;
    let a: BandMatrix<f64> = BandMatrix::zeros(&field, 3, 3);
    assert!(BlockBanded::with_structure(a, vec![Block { rows: 2, steps: 3 }]).is_err());
}
