//! Collocation abscissae on the reference interval (−1, 1).
//!
//! The driver places k collocation points per mesh subinterval by mapping a
//! fixed set of reference abscissae. The canonical choice is the set of
//! Gauss–Legendre nodes — zeros of the degree-k Legendre polynomial — which
//! maximizes the superconvergence order of the collocation spline at the
//! mesh points. The equidistant alternative is kept for experiments; its
//! orders are visibly worse, which is half the point of having it.

use crate::field::{Real, RealField};
use crate::linalg::{self, LinalgError};

/// The k Gauss–Legendre nodes, strictly ascending in (−1, 1).
///
/// The nodes are the eigenvalues of the symmetric tridiagonal Jacobi matrix
/// of the Legendre weight: zero main diagonal and off-diagonal entries
/// β_j = j/√(4j² − 1). The eigenvalue solver receives k off-diagonal
/// entries, the last being the formal trailing zero it never reads.
///
/// ```
/// use bezcol::field::F64Field;
/// use bezcol::nodes;
///
/// let rho = nodes::gauss_legendre(2, &F64Field).unwrap();
/// assert!((rho[1] - 0.5773502691896257).abs() < 1e-15);
/// assert!((rho[0] + rho[1]).abs() < 1e-15);
/// ```
pub fn gauss_legendre<F: RealField>(k: usize, field: &F) -> Result<Vec<F::Elem>, LinalgError> {
    let mut off = Vec::with_capacity(k);
    for j in 1..k {
        let denom = field.from_i64((4 * j * j) as i64 - 1).sqrt();
        off.push(field.from_usize(j) / denom);
    }
    if k > 0 {
        off.push(field.zero());
    }
    linalg::zero_diagonal_eigenvalues(off)
}

/// k equidistant abscissae ρ_j = 2j/(k+1) − 1, j = 1, …, k.
pub fn equispaced<F: RealField>(k: usize, field: &F) -> Vec<F::Elem> {
    let half = field.from_usize(k + 1).div_int(2);
    (1..=k).map(|j| half.recip().mul_int(j as i64) - field.one()).collect()
}
