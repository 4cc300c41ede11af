//! MPFR-backed field elements via `rug`.
//!
//! [`MpField`] fixes the working precision in bits (or decimal digits via
//! [`MpField::decimal`]); every element it mints, and every result derived
//! from those elements, carries that precision. Binary operators assert that
//! both operands agree — combining values from different contexts is a bug
//! in the caller, not something to paper over with silent rounding.

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

use rug::ops::Pow;
use rug::Float;

use super::{Real, RealField};

/// Precision context for [`MpReal`] elements.
///
/// ```
/// use bezcol::field::{MpField, Real, RealField};
///
/// let field = MpField::decimal(45);
/// let two = field.from_i64(2);
/// assert!((two.sqrt().to_f64() - 1.4142135623730951).abs() < 1e-15);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MpField {
    prec: u32,
}

impl MpField {
    /// A context computing with `prec` bits of mantissa.
    pub fn new(prec: u32) -> Self {
        assert!(prec >= 2, "MPFR requires at least 2 bits of precision");
        Self { prec }
    }

    /// A context with at least `digits` significant decimal digits.
    pub fn decimal(digits: u32) -> Self {
        let bits = (digits as f64 * core::f64::consts::LOG2_10).ceil() as u32 + 2;
        Self::new(bits)
    }

    /// The working precision in bits.
    pub fn prec(&self) -> u32 {
        self.prec
    }
}

impl RealField for MpField {
    type Elem = MpReal;

    fn zero(&self) -> MpReal {
        MpReal(Float::with_val(self.prec, 0))
    }

    fn one(&self) -> MpReal {
        MpReal(Float::with_val(self.prec, 1))
    }

    fn from_i64(&self, n: i64) -> MpReal {
        MpReal(Float::with_val(self.prec, n))
    }

    fn from_f64(&self, x: f64) -> MpReal {
        MpReal(Float::with_val(self.prec, x))
    }
}

/// An arbitrary-precision real number.
///
/// The wrapped [`rug::Float`] knows its own precision, so the context handle
/// can always be recovered with [`Real::field`].
#[derive(Clone, Debug)]
pub struct MpReal(Float);

impl MpReal {
    /// Borrow the underlying MPFR value.
    pub fn as_float(&self) -> &Float {
        &self.0
    }

    /// Unwrap into the underlying MPFR value.
    pub fn into_float(self) -> Float {
        self.0
    }
}

impl fmt::Display for MpReal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl PartialEq for MpReal {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for MpReal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

macro_rules! mp_binop {
    ($trait:ident, $method:ident) => {
        impl $trait for MpReal {
            type Output = MpReal;

            fn $method(self, rhs: MpReal) -> MpReal {
                assert_eq!(
                    self.0.prec(),
                    rhs.0.prec(),
                    "operands minted by different precision contexts"
                );
                MpReal(self.0.$method(rhs.0))
            }
        }
    };
}

mp_binop!(Add, add);
mp_binop!(Sub, sub);
mp_binop!(Mul, mul);
mp_binop!(Div, div);

impl Neg for MpReal {
    type Output = MpReal;

    fn neg(self) -> MpReal {
        MpReal(-self.0)
    }
}

impl Real for MpReal {
    type Field = MpField;

    fn field(&self) -> MpField {
        MpField { prec: self.0.prec() }
    }

    fn abs(&self) -> Self {
        MpReal(self.0.clone().abs())
    }

    fn sqrt(&self) -> Self {
        MpReal(self.0.clone().sqrt())
    }

    fn recip(&self) -> Self {
        MpReal(self.0.clone().recip())
    }

    fn powi(&self, n: i32) -> Self {
        MpReal(self.0.clone().pow(n))
    }

    fn exp(&self) -> Self {
        MpReal(self.0.clone().exp())
    }

    fn ln(&self) -> Self {
        MpReal(self.0.clone().ln())
    }

    fn sin(&self) -> Self {
        MpReal(self.0.clone().sin())
    }

    fn cos(&self) -> Self {
        MpReal(self.0.clone().cos())
    }

    fn sinh(&self) -> Self {
        MpReal(self.0.clone().sinh())
    }

    fn cosh(&self) -> Self {
        MpReal(self.0.clone().cosh())
    }

    fn floor(&self) -> Self {
        MpReal(self.0.clone().floor())
    }

    fn next_after(&self, toward: &Self) -> Self {
        let mut v = self.0.clone();
        v.next_toward(&toward.0);
        MpReal(v)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    fn to_f64(&self) -> f64 {
        self.0.to_f64()
    }

    fn mul_int(&self, n: i64) -> Self {
        MpReal(self.0.clone() * n)
    }

    fn div_int(&self, n: i64) -> Self {
        MpReal(self.0.clone() / n)
    }
}
