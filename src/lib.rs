//! # bezcol
//!
//! High-accuracy collocation for scalar linear two-point boundary value
//! problems
//!
//! ```text
//! -eps*y'' - p(x)*y' + q(x)*y = f(x),   x in [s, t],   y(s) = eta1, y(t) = eta2,
//! ```
//!
//! where `eps` may be a genuinely small singular-perturbation parameter
//! (down to 1e-48 and beyond, given enough precision). The approximation is
//! a globally C¹ piecewise-polynomial spline in Bernstein–Bézier form,
//! obtained by collocation at the Gauss–Legendre points of every mesh
//! subinterval, with layer-adapted meshes (Shishkin, Bakhvalov) available
//! for the perturbed regime. All numerics are generic over an
//! arbitrary-precision scalar field; convergence studies at 45–100 decimal
//! digits are the intended workload.
//!
//! ## Quick start
//!
//! ```
//! use bezcol::collocation::solve_collocation;
//! use bezcol::mesh::Mesh;
//!
//! // y'' - 4y = 4*cosh(1), y(0) = y(1) = 0, solved with 2 Gauss points on
//! // each of 8 subintervals. The classical sign convention is selected by
//! // eps = -1.
//! let mesh = Mesh::uniform(8, &0.0_f64, &1.0).unwrap();
//! let g = solve_collocation(
//!     2, &mesh, &-1.0, &0.0, &0.0,
//!     |_: &f64| 0.0,
//!     |_: &f64| -4.0,
//!     |_: &f64| 4.0 * 1.0_f64.cosh(),
//! ).unwrap();
//!
//! let exact = |x: f64| (2.0 * x - 1.0).cosh() - 1.0_f64.cosh();
//! assert!((g.value(&0.5) - exact(0.5)).abs() < 1e-3);
//! ```
//!
//! ## Modules
//!
//! - [`field`] — the scalar-field contract ([`Real`]/[`RealField`]) with an
//!   `f64` backend and, behind the default `rug` feature, an MPFR-backed
//!   arbitrary-precision backend whose precision is fixed per context.
//! - [`mesh`] — uniform, Shishkin (convection and reaction variants) and
//!   Bakhvalov meshes plus r-fold refinement, all validated and with
//!   bit-exact endpoint invariants.
//! - [`nodes`] — Gauss–Legendre abscissae from the zero-diagonal Jacobi
//!   matrix, and an equispaced alternative.
//! - [`linalg`] — the implicit-QL tridiagonal eigensolver and the almost
//!   block-diagonal banded solver with scaled column pivoting.
//! - [`bezier`] — Bézier segments (iterative de Casteljau, derivatives of
//!   any order) and C¹ splines over a knot vector.
//! - [`collocation`] — the assembler and driver tying everything together.
//! - [`binomial`], [`poly`] — small supporting caches and coefficient
//!   helpers.
//!
//! ## Precision model
//!
//! There is no global precision switch. A [`field::RealField`] handle is
//! the configuration: values carry their context, constructors check that
//! their inputs agree, and combining values from different contexts is a
//! detected error rather than a silent downcast.

pub mod bezier;
pub mod binomial;
pub mod collocation;
pub mod field;
pub mod linalg;
pub mod mesh;
pub mod nodes;
pub mod poly;

pub use bezier::{BezierError, BezierSegment, BezierSpline};
pub use collocation::{solve_collocation, CollocationError};
pub use field::{F64Field, Real, RealField};
pub use linalg::LinalgError;
pub use mesh::{Mesh, MeshError};

#[cfg(feature = "rug")]
pub use field::{MpField, MpReal};
