//! Polynomials and splines in Bernstein–Bézier form.
//!
//! A [`BezierSegment`] stores the ordinates b₀, …, bₙ of a polynomial in
//! the Bernstein basis over its own interval [s, t] and evaluates through
//! the de Casteljau recurrence, implemented iteratively: stable convex
//! combinations only, O(n²) scalar operations, no recursion. Derivatives of
//! order one and two are the hot path of the collocation residual and keep
//! their hardcoded forms; higher orders go through the general
//! finite-difference formula.
//!
//! A [`BezierSpline`] strings l segments over a shared knot vector.
//! Evaluation dispatches to the segment whose interval contains the point;
//! queries left of the first knot extend the first segment's polynomial and
//! queries right of the last knot extend the last one.

use crate::field::{Real, RealField};


/// Errors from assembling Bézier segments and splines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BezierError {
    /// A segment needs at least one ordinate.
    #[error("a Bézier segment needs at least one ordinate")]
    EmptyControlPolygon,

    /// A segment interval [s, t] must satisfy s < t.
    #[error("segment interval must satisfy s < t")]
    EmptyInterval,

    /// Spline knots and segments disagree in number.
    #[error("a spline needs one segment per subinterval, got {knots} knots and {segments} segments")]
    SegmentCountMismatch { knots: usize, segments: usize },

    /// Spline knots must increase strictly.
    #[error("spline knots must be strictly increasing")]
    KnotsNotIncreasing,

    /// Inputs minted by different precision contexts.
    #[error("segment inputs come from different precision contexts")]
    PrecisionMismatch,
}

/// A polynomial of degree n in Bernstein–Bézier form over [s, t].
#[derive(Debug, Clone)]
pub struct BezierSegment<T> {
    ordinates: Vec<T>,
    lower: T,
    upper: T,
    // Cached interval quantities used by every evaluation.
    width: T,
    width_sq: T,
    lower_over_width: T,
}

impl<T: Real> BezierSegment<T> {
    /// Build a segment from its ordinates b₀, …, bₙ over [lower, upper].
    pub fn new(ordinates: Vec<T>, lower: T, upper: T) -> Result<Self, BezierError> {
        if ordinates.is_empty() {
            return Err(BezierError::EmptyControlPolygon);
        }
        let field = lower.field();
        if upper.field() != field || ordinates.iter().any(|b| b.field() != field) {
            return Err(BezierError::PrecisionMismatch);
        }
        if upper <= lower {
            return Err(BezierError::EmptyInterval);
        }
        let width = upper.clone() - lower.clone();
        let width_sq = width.clone() * width.clone();
        let lower_over_width = lower.clone() / width.clone();
        Ok(Self { ordinates, lower, upper, width, width_sq, lower_over_width })
    }

    /// The polynomial degree n.
    pub fn degree(&self) -> usize {
        self.ordinates.len() - 1
    }

    /// The ordinates b₀, …, bₙ.
    pub fn control_points(&self) -> &[T] {
        &self.ordinates
    }

    /// The left end of the segment interval.
    pub fn lower(&self) -> &T {
        &self.lower
    }

    /// The right end of the segment interval.
    pub fn upper(&self) -> &T {
        &self.upper
    }

    /// The local coordinate μ(x) = (x − s)/(t − s).
    pub fn mu(&self, x: &T) -> T {
        x.clone() / self.width.clone() - self.lower_over_width.clone()
    }

    /// Evaluate the polynomial at `x`.
    pub fn value(&self, x: &T) -> T {
        let row = self.de_casteljau(&self.mu(x), self.degree());
        row.into_iter().next().expect("nonempty de Casteljau row")
    }

    /// Evaluate the ν-th derivative at `x`; ν = 0 is the value itself and
    /// any ν beyond the degree is identically zero.
    pub fn derivative(&self, x: &T, nu: usize) -> T {
        let n = self.degree();
        if nu == 0 {
            return self.value(x);
        }
        if nu > n {
            return self.lower.field().zero();
        }
        let mu = self.mu(x);
        match nu {
            1 => {
                let row = self.de_casteljau(&mu, n - 1);
                self.width.recip().mul_int(n as i64) * (row[1].clone() - row[0].clone())
            }
            2 => {
                let row = self.de_casteljau(&mu, n - 2);
                let second =
                    row[0].clone() - row[1].mul_int(2) + row[2].clone();
                self.width_sq.recip().mul_int((n * (n - 1)) as i64) * second
            }
            _ => {
                // (n!/(n-nu)!) / width^nu * sum_j (-1)^(nu-j) C(nu,j) b_j^(n-nu)
                let row = self.de_casteljau(&mu, n - nu);
                let binom = crate::binomial::Binomial::new(nu);
                let field = self.lower.field();
                let mut acc = field.zero();
                for (j, b) in row.iter().enumerate() {
                    let term = b.mul_int(binom.choose(j) as i64);
                    acc = if (nu - j) % 2 == 0 { acc + term } else { acc - term };
                }
                let mut falling = 1i64;
                for m in 0..nu {
                    falling *= (n - m) as i64;
                }
                acc.mul_int(falling) / self.width.powi(nu as i32)
            }
        }
    }

    /// Run `steps` passes of the de Casteljau recurrence
    /// bᵢ⁽ʳ⁾ = μ·bᵢ₊₁⁽ʳ⁻¹⁾ + (1 − μ)·bᵢ⁽ʳ⁻¹⁾ and return the surviving
    /// entries b₀⁽ˢ⁾, …, b₍ₙ₋ₛ₎⁽ˢ⁾.
    fn de_casteljau(&self, mu: &T, steps: usize) -> Vec<T> {
        let n = self.degree();
        let one_minus = self.lower.field().one() - mu.clone();
        let mut row = self.ordinates.clone();
        for r in 1..=steps {
            for i in 0..=n - r {
                row[i] = mu.clone() * row[i + 1].clone() + one_minus.clone() * row[i].clone();
            }
        }
        row.truncate(n - steps + 1);
        row
    }
}

/// A C¹ piecewise-polynomial spline in Bézier form.
#[derive(Debug, Clone)]
pub struct BezierSpline<T> {
    knots: Vec<T>,
    segments: Vec<BezierSegment<T>>,
}

impl<T: Real> BezierSpline<T> {
    /// Assemble a spline from its knot vector and one segment per
    /// subinterval.
    pub fn new(knots: Vec<T>, segments: Vec<BezierSegment<T>>) -> Result<Self, BezierError> {
        if knots.len() < 2 || segments.len() != knots.len() - 1 {
            return Err(BezierError::SegmentCountMismatch {
                knots: knots.len(),
                segments: segments.len(),
            });
        }
        for w in knots.windows(2) {
            if w[1] <= w[0] {
                return Err(BezierError::KnotsNotIncreasing);
            }
        }
        Ok(Self { knots, segments })
    }

    /// The number of segments l.
    pub fn intervals(&self) -> usize {
        self.segments.len()
    }

    /// The knot vector.
    pub fn knots(&self) -> &[T] {
        &self.knots
    }

    /// The segment polynomials.
    pub fn segments(&self) -> &[BezierSegment<T>] {
        &self.segments
    }

    /// Evaluate the spline at `x`.
    pub fn value(&self, x: &T) -> T {
        self.segments[self.segment_index(x)].value(x)
    }

    /// Evaluate the ν-th derivative at `x`.
    pub fn derivative(&self, x: &T, nu: usize) -> T {
        self.segments[self.segment_index(x)].derivative(x, nu)
    }

    /// Index of the segment responsible for `x`: the one whose interval
    /// contains it, the first for x below the knot range, the last above.
    fn segment_index(&self, x: &T) -> usize {
        let l = self.segments.len();
        // Binary search for the first interior knot strictly greater than x.
        let (mut lo, mut hi) = (1usize, l);
        while lo < hi {
            let mid = (lo + hi) / 2;
            if self.knots[mid] <= *x {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo - 1
    }
}
