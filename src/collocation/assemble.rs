//! Assembly of the collocation system in compressed band form.
//!
//! Unknowns are the Bézier ordinates b_{i,0}, …, b_{i,k+1} of each
//! subinterval, N = l·(k+2) in total. Per block the rows are: the left
//! Dirichlet condition (first block only), the k collocation residuals of
//! −ε·g″ − p·g′ + q·g = f at the τ points, and the C¹/C⁰ continuity
//! conditions toward the next subinterval. The right Dirichlet condition
//! closes the final block.
//!
//! Each row stores only its k+2 possibly nonzero coefficients (k+3 for the
//! k = 1 layout, whose continuity rows are wider than its blocks). The
//! entries are the Bernstein derivative identities evaluated with the
//! cached μ powers; columns k and k+1 are the μ ↔ 1−μ mirrors of columns 1
//! and 0 with the sign of the first-derivative term flipped, since d/dx is
//! antisymmetric under that reflection.

use crate::binomial::Binomial;
use crate::field::{Real, RealField};
use crate::linalg::BandMatrix;
use crate::mesh::Mesh;

use super::grid::CollocationGrid;

/// Build the band matrix and right-hand side of the collocation system.
#[allow(clippy::too_many_arguments)]
pub(crate) fn assemble<T, P, Q, F>(
    k: usize,
    mesh: &Mesh<T>,
    grid: &CollocationGrid<T>,
    epsilon: &T,
    eta1: &T,
    eta2: &T,
    p: &P,
    q: &Q,
    f: &F,
) -> (BandMatrix<T>, Vec<T>)
where
    T: Real,
    P: Fn(&T) -> T,
    Q: Fn(&T) -> T,
    F: Fn(&T) -> T,
{
    let l = mesh.intervals();
    let n = l * (k + 2);
    let ncols = if k == 1 && l > 1 { k + 3 } else { k + 2 };
    let field = mesh.start().field();

    let binom_m = Binomial::new(k - 1);
    let binom_k = Binomial::new(k);
    let binom_p = Binomial::new(k + 1);

    let mut a = BandMatrix::zeros(&field, n, ncols);

    // Dirichlet rows: a single 1 on the first, resp. last, ordinate.
    a[(0, 0)] = field.one();
    a[(n - 1, ncols - 1)] = field.one();

    let mut delta_prev = field.one();
    for i in 0..l {
        let delta = mesh.knot(i + 1).clone() - mesh.knot(i).clone();
        let delta_sq = delta.clone() * delta.clone();

        // Continuity rows toward the previous subinterval.
        if i > 0 {
            let c1 = i * (k + 2) - 1;
            a[(c1, 0)] = delta.clone();
            a[(c1, 1)] = -(delta_prev.clone() + delta.clone());
            a[(c1, 3)] = delta_prev.clone();
            let c0 = i * (k + 2);
            a[(c0, 1)] = field.one();
            a[(c0, 2)] = -field.one();
        }
        delta_prev = delta.clone();

        // (k+1)/Δ and ε·(k+1)·k/Δ².
        let k1 = delta.recip().mul_int(k as i64 + 1);
        let k2 = epsilon.clone() * k1.clone().mul_int(k as i64) / delta.clone();
        // ε·k/Δ², the second-derivative scale of the near-edge columns.
        let ek = epsilon.clone().mul_int(k as i64) / delta_sq.clone();

        for j in 1..=k {
            let row = i * (k + 2) + j;
            let tau = grid.tau(i, j);
            let p_j = p(tau);
            let q_j = q(tau);
            let mup = |e: i32| grid.mu_pow(i, j, e, false);
            let mum = |e: i32| grid.mu_pow(i, j, e, true);
            let kk = k as i32;

            // b_{i,0}
            a[(row, 0)] = mum(kk - 1)
                * (p_j.clone() * k1.clone() * mum(1) + q_j.clone() * mum(2) - k2.clone());

            // b_{i,1}
            a[(row, 1)] = mum(kk - 2).mul_int(k as i64 + 1)
                * (ek.clone() * (field.from_i64(2) - mup(1).mul_int(k as i64 + 1))
                    - p_j.clone() / delta.clone()
                        * (field.one() - mup(1).mul_int(k as i64 + 1))
                        * mum(1)
                    + q_j.clone() * mum(2) * mup(1));

            // b_{i,kappa}, kappa = 2, …, k−1
            for kappa in 2..k {
                let kap = kappa as i32;
                let second = k2.clone()
                    * (mum(1) * mup(1).mul_int(2 * binom_m.choose(kappa - 1) as i64)
                        - mum(2).mul_int(binom_m.choose(kappa - 2) as i64)
                        - mup(2).mul_int(binom_m.choose(kappa) as i64))
                    * mum(kk - 1 - kap)
                    * mup(kap - 2);
                let first = p_j.clone()
                    * k1.clone()
                    * (field.from_i64(binom_k.choose(kappa - 1) as i64)
                        - mup(1).mul_int(binom_p.choose(kappa) as i64))
                    * mum(kk - kap)
                    * mup(kap - 1);
                let zeroth = q_j.clone().mul_int(binom_p.choose(kappa) as i64)
                    * mum(kk + 1 - kap)
                    * mup(kap);
                a[(row, kappa)] = second - first + zeroth;
            }

            // b_{i,k}: mirror of b_{i,1} with the p-term sign flipped.
            a[(row, k)] = mup(kk - 2).mul_int(k as i64 + 1)
                * (ek.clone() * (field.from_i64(2) - mum(1).mul_int(k as i64 + 1))
                    + p_j.clone() / delta.clone()
                        * (field.one() - mum(1).mul_int(k as i64 + 1))
                        * mup(1)
                    + q_j.clone() * mup(2) * mum(1));

            // b_{i,k+1}: mirror of b_{i,0} with the p-term sign flipped.
            a[(row, k + 1)] = mup(kk - 1)
                * (q_j * mup(2) - p_j * k1.clone() * mup(1) - k2.clone());
        }
    }

    // Right-hand side: boundary values, zeros on the continuity rows, f at
    // the collocation points.
    let mut v: Vec<T> = (0..n).map(|_| field.zero()).collect();
    v[0] = eta1.clone();
    for i in 0..l {
        for j in 1..=k {
            v[i * (k + 2) + j] = f(grid.tau(i, j));
        }
    }
    v[n - 1] = eta2.clone();

    (a, v)
}
