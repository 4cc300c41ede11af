//! Implicit QL eigenvalues of a zero-diagonal symmetric tridiagonal matrix.
//!
//! Based on the implicit QL algorithm of Dubrulle, Martin and Wilkinson
//! (Handbook for Automatic Computation, vol. 2). The main diagonal is known
//! to be zero on input — the Jacobi matrix of the Legendre weight has that
//! form — which saves the usual diagonal bookkeeping at initialization.
//!
//! Convergence is detected in the field's own arithmetic: an off-diagonal
//! entry is negligible once `|e[m]| + (|d[m]| + |d[m+1]|)` is bit-identical
//! to `|d[m]| + |d[m+1]|`. The test must not be rewritten against a native
//! `f64` tolerance; at 45-digit precision the two are very different claims.

use log::trace;

use super::LinalgError;
use crate::field::{Real, RealField};

/// Sweep budget per eigenvalue.
const MAX_SWEEPS: usize = 30;

/// Eigenvalues, sorted ascending, of the symmetric tridiagonal matrix with
/// zero main diagonal and off-diagonal `e[0..n-1]`.
///
/// `e` has one entry per matrix row; the final entry is a formal trailing
/// term that the iteration never reads. The vector is consumed as workspace.
///
/// Returns [`LinalgError::ConvergenceFailed`] if any eigenvalue fails to
/// deflate within 30 QL sweeps.
pub fn zero_diagonal_eigenvalues<T: Real>(mut e: Vec<T>) -> Result<Vec<T>, LinalgError> {
    let n = e.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    let field = e[0].field();
    let mut d: Vec<T> = (0..n).map(|_| field.zero()).collect();

    for j in 0..n {
        let mut sweeps = 0usize;
        loop {
            // Find the first negligible off-diagonal entry at or after j.
            let mut m = j;
            while m < n - 1 {
                let anchor = d[m].abs() + d[m + 1].abs();
                if e[m].abs() + anchor.clone() == anchor {
                    break;
                }
                m += 1;
            }
            if m == j {
                break;
            }
            if sweeps == MAX_SWEEPS {
                return Err(LinalgError::ConvergenceFailed(MAX_SWEEPS));
            }
            sweeps += 1;

            // Wilkinson shift from the leading 2x2 block.
            let mut q = (d[j + 1].clone() - d[j].clone()) / e[j].mul_int(2);
            let mut t = (field.one() + q.clone() * q.clone()).sqrt();
            q = if q < field.zero() {
                d[m].clone() - d[j].clone() + e[j].clone() / (q.clone() - t.clone())
            } else {
                d[m].clone() - d[j].clone() + e[j].clone() / (q.clone() + t.clone())
            };

            // Chase the bulge from m-1 down to j with Givens-like rotations.
            let mut u = field.zero();
            let mut s = field.one();
            let mut c = field.one();
            let mut stopped_early = false;
            for i in (j..m).rev() {
                let p = s.clone() * e[i].clone();
                let h = c.clone() * e[i].clone();
                if p.abs() >= q.abs() {
                    c = q.clone() / p.clone();
                    t = (c.clone() * c.clone() + field.one()).sqrt();
                    e[i + 1] = p * t.clone();
                    s = t.recip();
                    c = c * s.clone();
                } else {
                    s = p / q.clone();
                    t = (s.clone() * s.clone() + field.one()).sqrt();
                    e[i + 1] = q.clone() * t.clone();
                    c = t.recip();
                    s = s * c.clone();
                }
                if e[i + 1].is_zero() {
                    // Underflow in the rotated entry: absorb the correction
                    // and restart the sweep for this eigenvalue.
                    d[i + 1] = d[i + 1].clone() - u.clone();
                    e[m] = field.zero();
                    stopped_early = true;
                    break;
                }
                q = d[i + 1].clone() - u.clone();
                t = (d[i].clone() - q.clone()) * s.clone() + c.mul_int(2) * h.clone();
                u = s.clone() * t.clone();
                d[i + 1] = q.clone() + u.clone();
                q = c.clone() * t.clone() - h;
            }
            if stopped_early && t.is_zero() {
                continue;
            }
            d[j] = d[j].clone() - u;
            e[j] = q;
            e[m] = field.zero();
        }
        trace!("eigenvalue {j} deflated after {sweeps} sweeps");
    }

    sort_ascending(&mut d);
    Ok(d)
}

/// In-place ascending selection sort; n stays small here.
fn sort_ascending<T: Real>(d: &mut [T]) {
    let n = d.len();
    for i in 0..n {
        let mut min = i;
        for j in i + 1..n {
            if d[j] < d[min] {
                min = j;
            }
        }
        if min != i {
            d.swap(i, min);
        }
    }
}
