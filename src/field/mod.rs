//! Scalar-field abstraction: the numbers the whole crate computes with.
//!
//! Every algorithm in this crate is generic over [`Real`], an ordered field
//! element with the elementary functions the collocation method needs. Each
//! element carries a handle to its [`RealField`], the precision context that
//! mints constants (`zero`, `one`, `e`, integer and float conversions). The
//! handle replaces any process-wide precision setting: constructors either
//! receive it explicitly or derive it from an argument via [`Real::field`].
//!
//! Two backends are provided:
//!
//! - `f64` with the trivial [`F64Field`] handle — fast, good for smoke tests
//!   and benchmarks;
//! - [`MpReal`](crate::field::MpReal) backed by MPFR via `rug` (default
//!   `rug` feature) — the extended-precision field used for the actual
//!   convergence experiments.
//!
//! Mixing elements minted by unequal contexts is a programmer error: the
//! multiprecision operators assert matching precision, and the public
//! constructors of this crate report `PrecisionMismatch` instead of
//! computing at a silently truncated precision.
//!
//! ```
//! use bezcol::field::{Real, RealField, F64Field};
//!
//! let field = F64Field;
//! let one = field.one();
//! assert_eq!(one.clone() + one, field.from_i64(2));
//! ```

use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

#[cfg(feature = "rug")]
mod mpreal;
#[cfg(feature = "rug")]
pub use mpreal::{MpField, MpReal};


/// Handle to a real field: mints elements at a fixed precision.
///
/// Handles are cheap to clone and comparable; two handles compare equal
/// exactly when elements minted by them may be combined.
pub trait RealField: Clone + PartialEq + fmt::Debug {
    /// The element type of this field.
    type Elem: Real<Field = Self>;

    /// The additive identity.
    fn zero(&self) -> Self::Elem;

    /// The multiplicative identity.
    fn one(&self) -> Self::Elem;

    /// Exact conversion from a machine integer (up to the field's precision).
    fn from_i64(&self, n: i64) -> Self::Elem;

    /// Nearest field element to an `f64`.
    fn from_f64(&self, x: f64) -> Self::Elem;

    /// Convenience conversion for index-like quantities.
    fn from_usize(&self, n: usize) -> Self::Elem {
        self.from_i64(n as i64)
    }

    /// Euler's number at the field's precision.
    fn e(&self) -> Self::Elem {
        self.one().exp()
    }

    /// The unit roundoff: distance from 1 to the next representable value.
    fn epsilon(&self) -> Self::Elem {
        let one = self.one();
        one.next_after(&self.from_i64(2)) - self.one()
    }
}

/// An element of an ordered real field.
///
/// Arithmetic is by value; elements are `Clone` and the multiprecision
/// backend keeps values small enough that cloning inside inner loops is
/// acceptable. The trait mirrors the operation set the collocation pipeline
/// actually uses: field arithmetic, `abs`/`sqrt`/`powi`, the elementary
/// transcendentals, `floor` for mesh bookkeeping, and `next_after` for
/// roundoff-level thresholding in the eigensolver and the tests.
pub trait Real:
    Sized
    + Clone
    + PartialEq
    + PartialOrd
    + fmt::Debug
    + fmt::Display
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// The precision context this element belongs to.
    type Field: RealField<Elem = Self>;

    /// The handle of the context that minted this element.
    fn field(&self) -> Self::Field;

    /// Absolute value.
    fn abs(&self) -> Self;

    /// Square root. The argument must be nonnegative.
    fn sqrt(&self) -> Self;

    /// Multiplicative inverse.
    fn recip(&self) -> Self;

    /// Integer power.
    fn powi(&self, n: i32) -> Self;

    /// Exponential.
    fn exp(&self) -> Self;

    /// Natural logarithm. The argument must be positive.
    fn ln(&self) -> Self;

    /// Sine.
    fn sin(&self) -> Self;

    /// Cosine.
    fn cos(&self) -> Self;

    /// Hyperbolic sine.
    fn sinh(&self) -> Self;

    /// Hyperbolic cosine.
    fn cosh(&self) -> Self;

    /// Largest integral value not above `self`.
    fn floor(&self) -> Self;

    /// The nearest representable value in the direction of `toward`;
    /// `self` if the two are equal.
    fn next_after(&self, toward: &Self) -> Self;

    /// Whether this is the additive identity.
    fn is_zero(&self) -> bool;

    /// Nearest `f64`, for diagnostics and convergence-rate bookkeeping.
    fn to_f64(&self) -> f64;

    /// `self * n` without minting an intermediate element.
    fn mul_int(&self, n: i64) -> Self {
        self.clone() * self.field().from_i64(n)
    }

    /// `self / n` without minting an intermediate element.
    fn div_int(&self, n: i64) -> Self {
        self.clone() / self.field().from_i64(n)
    }
}

/// The trivial precision context of the native `f64` backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct F64Field;

impl RealField for F64Field {
    type Elem = f64;

    fn zero(&self) -> f64 {
        0.0
    }

    fn one(&self) -> f64 {
        1.0
    }

    fn from_i64(&self, n: i64) -> f64 {
        n as f64
    }

    fn from_f64(&self, x: f64) -> f64 {
        x
    }
}

impl Real for f64 {
    type Field = F64Field;

    fn field(&self) -> F64Field {
        F64Field
    }

    fn abs(&self) -> f64 {
        f64::abs(*self)
    }

    fn sqrt(&self) -> f64 {
        f64::sqrt(*self)
    }

    fn recip(&self) -> f64 {
        f64::recip(*self)
    }

    fn powi(&self, n: i32) -> f64 {
        f64::powi(*self, n)
    }

    fn exp(&self) -> f64 {
        f64::exp(*self)
    }

    fn ln(&self) -> f64 {
        f64::ln(*self)
    }

    fn sin(&self) -> f64 {
        f64::sin(*self)
    }

    fn cos(&self) -> f64 {
        f64::cos(*self)
    }

    fn sinh(&self) -> f64 {
        f64::sinh(*self)
    }

    fn cosh(&self) -> f64 {
        f64::cosh(*self)
    }

    fn floor(&self) -> f64 {
        f64::floor(*self)
    }

    fn next_after(&self, toward: &f64) -> f64 {
        if self < toward {
            f64::next_up(*self)
        } else if self > toward {
            f64::next_down(*self)
        } else {
            *self
        }
    }

    fn is_zero(&self) -> bool {
        *self == 0.0
    }

    fn to_f64(&self) -> f64 {
        *self
    }

    fn mul_int(&self, n: i64) -> f64 {
        self * n as f64
    }

    fn div_int(&self, n: i64) -> f64 {
        self / n as f64
    }
}
