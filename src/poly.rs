//! Dense polynomials over the scalar field.
//!
//! The boundary value problems this crate targets usually have constant or
//! low-degree coefficient functions p and q; `RealPolynomial` is the
//! convenient way to write them once and pass them as `Fn(&T) -> T`
//! callbacks to [`solve_collocation`](crate::collocation::solve_collocation).

use crate::field::Real;

/// A polynomial p(x) = c₀ + c₁x + … + cₙxⁿ in the monomial basis.
///
/// Trailing zero coefficients are trimmed at construction so `degree`
/// reflects the mathematical degree (the zero polynomial has degree 0).
///
/// ```
/// use bezcol::poly::RealPolynomial;
///
/// // 1 - 2x + x^2 evaluated at 3.0
/// let p = RealPolynomial::new(vec![1.0_f64, -2.0, 1.0]);
/// assert_eq!(p.value(&3.0), 4.0);
/// ```
#[derive(Debug, Clone)]
pub struct RealPolynomial<T> {
    coeffs: Vec<T>,
}

impl<T: Real> RealPolynomial<T> {
    /// Build a polynomial from coefficients in ascending degree order.
    ///
    /// Panics if `coeffs` is empty.
    pub fn new(mut coeffs: Vec<T>) -> Self {
        assert!(!coeffs.is_empty(), "a polynomial needs at least one coefficient");
        while coeffs.len() > 1 && coeffs.last().map(Real::is_zero) == Some(true) {
            coeffs.pop();
        }
        Self { coeffs }
    }

    /// The constant polynomial `c`.
    pub fn constant(c: T) -> Self {
        Self { coeffs: vec![c] }
    }

    /// Evaluate by Horner's rule.
    pub fn value(&self, x: &T) -> T {
        let mut acc = self.coeffs[self.coeffs.len() - 1].clone();
        for c in self.coeffs.iter().rev().skip(1) {
            acc = acc * x.clone() + c.clone();
        }
        acc
    }

    /// The degree of the polynomial.
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// The coefficients, constant term first.
    pub fn coeffs(&self) -> &[T] {
        &self.coeffs
    }
}
