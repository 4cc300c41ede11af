//! Orthogonal spline collocation for scalar two-point boundary value
//! problems.
//!
//! The driver approximates the solution of
//!
//! ```text
//! -eps*y'' - p(x)*y' + q(x)*y = f(x),   x in [s, t],   y(s) = eta1, y(t) = eta2
//! ```
//!
//! by a globally C¹ spline of degree k+1 in Bernstein–Bézier form,
//! collocated at the k Gauss–Legendre points of every mesh subinterval.
//! The classical form y″ + p̂y′ + q̂y = f is reached by passing `epsilon`
//! = −1 together with p = −p̂, q = q̂.
//!
//! Pipeline: Gauss–Legendre abscissae → τ table and μ-cache → almost
//! block-diagonal system → block banded solve → one Bézier segment per
//! subinterval. The system matrix and right-hand side are consumed by the
//! in-place factorization.
//!
//! ```
//! use bezcol::collocation::solve_collocation;
//! use bezcol::mesh::Mesh;
//!
//! // y'' = 2 with y(0) = y(1) = 0 has the exact solution x^2 - x.
//! let mesh = Mesh::uniform(2, &0.0_f64, &1.0).unwrap();
//! let g = solve_collocation(
//!     2, &mesh, &-1.0, &0.0, &0.0,
//!     |_: &f64| 0.0, |_: &f64| 0.0, |_: &f64| 2.0,
//! ).unwrap();
//! assert!((g.value(&0.5) - (-0.25)).abs() < 1e-12);
//! assert!((g.value(&0.25) - (-0.1875)).abs() < 1e-12);
//! ```

use log::debug;

use crate::bezier::{BezierSegment, BezierSpline};
use crate::field::Real;
use crate::linalg::{BlockBanded, LinalgError};
use crate::mesh::Mesh;
use crate::nodes;

mod assemble;
mod grid;

#[cfg(test)]
mod tests;

pub(crate) use grid::CollocationGrid;

/// Errors from the collocation driver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollocationError {
    /// At least one collocation point per subinterval is required.
    #[error("need at least one collocation point per subinterval")]
    InvalidOrder,

    /// ε, η₁, η₂ and the mesh must share one precision context.
    #[error("inputs come from different precision contexts")]
    PrecisionMismatch,

    /// The underlying eigensolver or banded solver failed.
    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

/// Solve the boundary value problem by Bézier collocation.
///
/// `k` is the number of collocation points per subinterval; the returned
/// spline has one segment of degree k+1 per subinterval of `mesh`, is
/// globally C¹, matches the boundary values at s and t and satisfies the
/// differential equation exactly (in the field's arithmetic) at every
/// collocation point.
///
/// The coefficient callbacks are assumed pure; they are invoked once per
/// collocation point.
#[allow(clippy::too_many_arguments)]
pub fn solve_collocation<T, P, Q, F>(
    k: usize,
    mesh: &Mesh<T>,
    epsilon: &T,
    eta1: &T,
    eta2: &T,
    p: P,
    q: Q,
    f: F,
) -> Result<BezierSpline<T>, CollocationError>
where
    T: Real,
    P: Fn(&T) -> T,
    Q: Fn(&T) -> T,
    F: Fn(&T) -> T,
{
    if k < 1 {
        return Err(CollocationError::InvalidOrder);
    }
    let field = mesh.start().field();
    if [epsilon, eta1, eta2].iter().any(|v| v.field() != field) {
        return Err(CollocationError::PrecisionMismatch);
    }

    let l = mesh.intervals();
    debug!("collocation solve: k={k}, l={l}, {} unknowns", l * (k + 2));

    let rho = nodes::gauss_legendre(k, &field)?;
    let grid = CollocationGrid::new(mesh, &rho);
    let (a, v) = assemble::assemble(k, mesh, &grid, epsilon, eta1, eta2, &p, &q, &f);
    let x = BlockBanded::collocation(a, k, l)?.solve(v)?;

    let segments: Vec<BezierSegment<T>> = x
        .chunks(k + 2)
        .enumerate()
        .map(|(i, ordinates)| {
            BezierSegment::new(ordinates.to_vec(), mesh.knot(i).clone(), mesh.knot(i + 1).clone())
                .expect("mesh subintervals are nonempty")
        })
        .collect();
    Ok(BezierSpline::new(mesh.knots().to_vec(), segments)
        .expect("one segment per mesh subinterval"))
}
