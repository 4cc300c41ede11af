//! Structured linear algebra over the scalar field.
//!
//! Two solvers live here, both specialized rather than general:
//!
//! - [`tridiagonal`] — eigenvalues of a symmetric tridiagonal matrix with a
//!   zero main diagonal, by the implicit QL algorithm with Wilkinson shift.
//!   This is exactly the Jacobi matrix shape that produces Gauss–Legendre
//!   abscissae.
//! - [`block_banded`] — factorization and solution of the almost
//!   block-diagonal systems produced by spline collocation, in the
//!   Martin–Wilkinson / de Boor CWIDTH fashion: compressed band storage,
//!   scaled column pivoting confined to the active block, and block-aware
//!   back substitution.

pub mod block_banded;
pub mod tridiagonal;

#[cfg(test)]
mod tests;

pub use block_banded::{collocation_structure, BandMatrix, Block, BlockBanded};
pub use tridiagonal::zero_diagonal_eigenvalues;

/// Errors from the linear-algebra layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinalgError {
    /// A zero pivot or zero row sum was met during elimination.
    #[error("matrix is singular")]
    Singular,

    /// The eigenvalue iteration exceeded its sweep budget.
    #[error("eigenvalue iteration failed to converge within {0} sweeps")]
    ConvergenceFailed(usize),

    /// A matrix or vector dimension disagrees with the block structure.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}
