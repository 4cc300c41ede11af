//! Almost block-diagonal solver for spline-collocation systems.
//!
//! An adaptation of the `bandet1` algorithm of Martin and Wilkinson
//! (Numer. Math. 9, 1967) in the version de Boor specialized to spline
//! collocation (`SUBROUTINE CWIDTH`, A Practical Guide to Splines, 1978).
//! Each equation stores only its band of possibly nonzero coefficients;
//! elimination shifts the surviving tail of a row one column left after
//! every pivot step, so the active entries always start at column zero.
//!
//! The pivot search is a scaled column search: within the rows the current
//! block has made eligible, the winner maximizes |a| relative to the row-sum
//! norm of its original row. Ties keep the first row seen, which makes the
//! factorization bit-reproducible.

use log::debug;

use super::LinalgError;
use crate::field::{Real, RealField};

/// Compressed band storage: `nrows` equations of `ncols` active
/// coefficients each, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct BandMatrix<T> {
    data: Vec<T>,
    nrows: usize,
    ncols: usize,
}

impl<T: Real> BandMatrix<T> {
    /// An `nrows x ncols` band filled with zeros of `field`.
    pub fn zeros(field: &T::Field, nrows: usize, ncols: usize) -> Self {
        Self {
            data: (0..nrows * ncols).map(|_| field.zero()).collect(),
            nrows,
            ncols,
        }
    }

    /// Number of equations.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of stored coefficients per equation.
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// The stored coefficients of equation `r`.
    pub fn row(&self, r: usize) -> &[T] {
        &self.data[r * self.ncols..(r + 1) * self.ncols]
    }

    /// Mutable access to the stored coefficients of equation `r`.
    pub fn row_mut(&mut self, r: usize) -> &mut [T] {
        &mut self.data[r * self.ncols..(r + 1) * self.ncols]
    }

    fn swap_row_prefix(&mut self, r1: usize, r2: usize, len: usize) {
        for m in 0..len {
            self.data.swap(r1 * self.ncols + m, r2 * self.ncols + m);
        }
    }
}

impl<T> core::ops::Index<(usize, usize)> for BandMatrix<T> {
    type Output = T;

    fn index(&self, (r, c): (usize, usize)) -> &T {
        &self.data[r * self.ncols + c]
    }
}

impl<T> core::ops::IndexMut<(usize, usize)> for BandMatrix<T> {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut T {
        &mut self.data[r * self.ncols + c]
    }
}

/// One diagonal block of the structure: how many fresh rows it contributes
/// and how many pivot steps may run before the next block's rows join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    /// Rows entering the elimination with this block.
    pub rows: usize,
    /// Pivot steps permitted inside this block.
    pub steps: usize,
}

/// The block structure of a collocation matrix with `k` collocation rows
/// per subinterval and `l` subintervals.
///
/// For a single subinterval everything is one dense block. Otherwise the
/// left boundary row plus the first k collocation rows open the structure,
/// each pair of continuity rows and the following k collocation rows
/// alternate, and the final block absorbs the right boundary row. For `k = 1` the
/// three-wide blocks cannot hold both continuity rows, so the penultimate
/// block degenerates to the lone C¹ row and the C⁰ row migrates into a
/// four-step final block (see [`BlockBanded::collocation`] for the matching
/// column shifts).
pub fn collocation_structure(k: usize, l: usize) -> Vec<Block> {
    if l == 1 {
        return vec![Block { rows: k + 2, steps: k + 2 }];
    }
    let mut s = Vec::with_capacity(2 * l - 1);
    s.push(Block { rows: k + 1, steps: k });
    for _ in 1..l {
        s.push(Block { rows: 2, steps: 2 });
        s.push(Block { rows: k, steps: k });
    }
    let last = s.len() - 1;
    if k == 1 {
        s[last - 1] = s[last];
        s[last] = Block { rows: 3, steps: 4 };
    } else {
        s[last] = Block { rows: k + 1, steps: k + 2 };
    }
    s
}

/// A band matrix paired with its block structure, ready to be factored.
///
/// `solve` consumes the decomposition: the matrix and right-hand side are
/// destroyed by the in-place elimination.
#[derive(Debug, Clone)]
pub struct BlockBanded<T> {
    a: BandMatrix<T>,
    structure: Vec<Block>,
}

impl<T: Real> BlockBanded<T> {
    /// Wrap a collocation matrix for `k` collocation points per subinterval
    /// and `l` subintervals.
    ///
    /// Checks the dimensions against the block structure and, for `k = 1`
    /// with more than one subinterval, performs the column realignment that
    /// moves the last C⁰ continuity row into the final block's frame: that
    /// row slides one column left and the last collocation row one column
    /// right.
    pub fn collocation(mut a: BandMatrix<T>, k: usize, l: usize) -> Result<Self, LinalgError> {
        let n = l * (k + 2);
        if a.nrows() != n {
            return Err(LinalgError::DimensionMismatch { expected: n, got: a.nrows() });
        }
        let want = if k == 1 && l > 1 { k + 3 } else { k + 2 };
        if a.ncols() != want {
            return Err(LinalgError::DimensionMismatch { expected: want, got: a.ncols() });
        }
        if k == 1 && l > 1 {
            let zero = a[(0, 0)].field().zero();
            let r = (l - 1) * 3;
            a[(r, 0)] = a[(r, 1)].clone();
            a[(r, 1)] = a[(r, 2)].clone();
            a[(r, 2)] = zero.clone();
            a[(r + 1, 3)] = a[(r + 1, 2)].clone();
            a[(r + 1, 2)] = a[(r + 1, 1)].clone();
            a[(r + 1, 1)] = a[(r + 1, 0)].clone();
            a[(r + 1, 0)] = zero;
        }
        Ok(Self { a, structure: collocation_structure(k, l) })
    }

    /// Wrap a band matrix with an explicit block structure.
    ///
    /// Both the row counts and the pivot steps of `structure` must sum to
    /// the number of equations.
    pub fn with_structure(a: BandMatrix<T>, structure: Vec<Block>) -> Result<Self, LinalgError> {
        let rows: usize = structure.iter().map(|b| b.rows).sum();
        if rows != a.nrows() {
            return Err(LinalgError::DimensionMismatch { expected: a.nrows(), got: rows });
        }
        let steps: usize = structure.iter().map(|b| b.steps).sum();
        if steps != a.nrows() {
            return Err(LinalgError::DimensionMismatch { expected: a.nrows(), got: steps });
        }
        Ok(Self { a, structure })
    }

    /// Solve `A x = b`, consuming the decomposition and the right-hand side.
    pub fn solve(mut self, mut b: Vec<T>) -> Result<Vec<T>, LinalgError> {
        let n = self.a.nrows();
        if b.len() != n {
            return Err(LinalgError::DimensionMismatch { expected: n, got: b.len() });
        }
        if n == 0 {
            return Ok(Vec::new());
        }
        let field = b[0].field();
        let ncols = self.a.ncols();
        debug!("block banded solve: {} equations, band width {}, {} blocks", n, ncols, self.structure.len());

        let a = &mut self.a;
        let mut scale: Vec<T> = (0..n).map(|_| field.zero()).collect();

        // Elimination with scaled column pivoting.
        let mut pivot = 0usize;
        let mut last_row = 0usize;
        for block in &self.structure {
            // Row-sum norms of the rows this block brings in.
            for r in last_row..last_row + block.rows {
                let mut sum = field.zero();
                for m in 0..ncols {
                    sum = sum + a[(r, m)].abs();
                }
                if sum.is_zero() {
                    return Err(LinalgError::Singular);
                }
                scale[r] = sum;
            }
            last_row += block.rows;

            // Each pivot step retires one column; the survivors of every
            // row below slide left so the block restarts at column zero.
            let mut col_end = ncols;
            for _ in 0..block.steps {
                if pivot < last_row {
                    let mut best = pivot;
                    let mut best_val = a[(pivot, 0)].abs() / scale[pivot].clone();
                    for r in pivot + 1..last_row {
                        let val = a[(r, 0)].abs() / scale[r].clone();
                        if val > best_val {
                            best_val = val;
                            best = r;
                        }
                    }
                    if best != pivot {
                        scale.swap(best, pivot);
                        b.swap(best, pivot);
                        a.swap_row_prefix(best, pivot, col_end);
                    }
                    if a[(pivot, 0)].is_zero() {
                        return Err(LinalgError::Singular);
                    }
                    for r in pivot + 1..last_row {
                        let ratio = a[(r, 0)].clone() / a[(pivot, 0)].clone();
                        for m in 1..col_end {
                            a[(r, m - 1)] = a[(r, m)].clone() - ratio.clone() * a[(pivot, m)].clone();
                        }
                        a[(r, col_end - 1)] = field.zero();
                        b[r] = b[r].clone() - ratio * b[pivot].clone();
                    }
                    col_end -= 1;
                } else if a[(pivot, 0)].is_zero() {
                    return Err(LinalgError::Singular);
                }
                pivot += 1;
            }
        }

        // Back substitution, block by block from the bottom.
        let mut x: Vec<T> = (0..n).map(|_| field.zero()).collect();
        let mut row = n;
        for block in self.structure.iter().rev() {
            let mut off = ncols - block.steps;
            for _ in 0..block.steps {
                row -= 1;
                let mut sum = field.zero();
                for m in 1..=off {
                    sum = sum + x[row + m].clone() * a[(row, m)].clone();
                }
                x[row] = (b[row].clone() - sum) / a[(row, 0)].clone();
                off += 1;
            }
        }
        Ok(x)
    }
}
