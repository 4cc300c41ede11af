//! Collocation points and the μ-cache.
//!
//! For every mesh subinterval the reference abscissae ρ are mapped to the
//! collocation points τ, and the local coordinates μ(τ) = (τ − ξᵢ)/Δᵢ are
//! cached together with their powers up to μ^{k+1}. The assembler reads
//! those powers thousands of times; computing each power by one
//! multiplication from its predecessor, and each mirrored node from
//! μ_j = 1 − μ_{k−j−1}, keeps the cache construction linear in its size.

use crate::field::{Real, RealField};
use crate::mesh::Mesh;

/// The τ table and μ-cache for one (mesh, ρ) pair.
#[derive(Debug, Clone)]
pub(crate) struct CollocationGrid<T> {
    k: usize,
    tau: Vec<T>,
    /// mu[i·k + j − 1][r − 1] = μ(τ_{ik+j})^r for r = 1, …, k+1.
    mu: Vec<Vec<T>>,
}

impl<T: Real> CollocationGrid<T> {
    /// Build the table for `mesh` and the reference abscissae `rho`
    /// (strictly ascending in (−1, 1), symmetric about 0).
    pub fn new(mesh: &Mesh<T>, rho: &[T]) -> Self {
        let k = rho.len();
        let l = mesh.intervals();
        let field = mesh.start().field();

        let mut tau = Vec::with_capacity(l * k);
        for i in 0..l {
            let plus = mesh.knot(i).clone() + mesh.knot(i + 1).clone();
            let minus = mesh.knot(i + 1).clone() - mesh.knot(i).clone();
            for r in rho {
                tau.push((plus.clone() + minus.clone() * r.clone()).div_int(2));
            }
        }

        let mut mu: Vec<Vec<T>> = Vec::with_capacity(l * k);
        for i in 0..l {
            let delta = mesh.knot(i + 1).clone() - mesh.knot(i).clone();
            for j in 0..k {
                // The nodes are symmetric, so only the left half needs a
                // division; the right half mirrors it.
                let base = if 2 * j > k - 1 {
                    field.one() - mu[i * k + (k - 1 - j)][0].clone()
                } else {
                    (tau[i * k + j].clone() - mesh.knot(i).clone()) / delta.clone()
                };
                let mut powers = Vec::with_capacity(k + 1);
                powers.push(base.clone());
                for r in 1..=k {
                    powers.push(powers[r - 1].clone() * base.clone());
                }
                mu.push(powers);
            }
        }

        Self { k, tau, mu }
    }

    /// τ_{ik+j} for subinterval `i` and local index `j = 1, …, k`.
    pub fn tau(&self, i: usize, j: usize) -> &T {
        &self.tau[i * self.k + j - 1]
    }

    /// The whole ascending τ sequence.
    pub fn taus(&self) -> &[T] {
        &self.tau
    }

    /// μ(τ_{ik+j})^exponent, or (1 − μ(τ_{ik+j}))^exponent when `inverse`.
    ///
    /// `exponent` ranges over −1 (reciprocal) through k+1; anything else is
    /// a programmer error and panics, as does an out-of-range index.
    pub fn mu_pow(&self, i: usize, j: usize, exponent: i32, inverse: bool) -> T {
        assert!(
            (-1..=self.k as i32 + 1).contains(&exponent),
            "collocation factor exponent {exponent} out of range"
        );
        assert!(j >= 1 && j <= self.k, "local collocation index {j} out of range");
        let idx = if inverse { (i + 1) * self.k - j } else { i * self.k + j - 1 };
        let powers = &self.mu[idx];
        match exponent {
            -1 => powers[0].recip(),
            0 => powers[0].field().one(),
            e => powers[e as usize - 1].clone(),
        }
    }
}
