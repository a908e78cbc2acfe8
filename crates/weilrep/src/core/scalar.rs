//! Exact scalar types.
//!
//! Fourier coefficients and scalar multipliers are arbitrary-precision
//! rationals. Weights and exponent offsets are small rationals and use
//! the fixed-width [`Rational64`].

use num_bigint::BigInt;
use num_rational::{BigRational, Rational64};
use num_traits::One;

/// Coefficient field of every q-expansion.
pub type Scalar = BigRational;

/// Weight of a (quasi)modular form. May be half-integral.
pub type Weight = Rational64;

/// Fractional exponent offset of a component, or a coordinate of a
/// discriminant-group vector.
pub type Offset = Rational64;

/// Lifts a small rational into the coefficient field.
///
/// # Example
///
/// ```
/// use weilrep::{to_scalar, Scalar, Weight};
///
/// assert_eq!(to_scalar(&Weight::new(3, 2)), Scalar::new(3.into(), 2.into()));
/// ```
#[inline]
#[must_use]
pub fn to_scalar(value: &Rational64) -> Scalar {
    Scalar::new(BigInt::from(*value.numer()), BigInt::from(*value.denom()))
}

/// Integer scalar.
#[inline]
#[must_use]
pub fn integer(n: i64) -> Scalar {
    Scalar::from_integer(BigInt::from(n))
}

/// `floor(value)` as an integer.
#[inline]
#[must_use]
pub fn floor(value: &Rational64) -> i64 {
    value.floor().to_integer()
}

/// `value - floor(value)`, always in `[0, 1)`.
///
/// # Example
///
/// ```
/// use weilrep::{fract, Offset};
///
/// assert_eq!(fract(&Offset::new(5, 4)), Offset::new(1, 4));
/// assert_eq!(fract(&Offset::new(-1, 4)), Offset::new(3, 4));
/// ```
#[inline]
#[must_use]
pub fn fract(value: &Rational64) -> Rational64 {
    value - value.floor()
}

/// `n!` as a scalar.
#[must_use]
pub fn factorial(n: usize) -> Scalar {
    let mut acc = BigInt::one();
    for i in 2..=n {
        acc *= BigInt::from(i);
    }
    Scalar::from_integer(acc)
}

/// Returns true if `value` is an integer.
#[inline]
#[must_use]
pub fn is_integral(value: &Rational64) -> bool {
    value.denom().is_one()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_rounds_toward_negative_infinity() {
        assert_eq!(floor(&Offset::new(7, 4)), 1);
        assert_eq!(floor(&Offset::new(-1, 4)), -1);
        assert_eq!(floor(&Offset::from(3)), 3);
    }

    #[test]
    fn factorials() {
        assert_eq!(factorial(0), integer(1));
        assert_eq!(factorial(1), integer(1));
        assert_eq!(factorial(5), integer(120));
    }

    #[test]
    fn weight_lifts_exactly() {
        assert_eq!(to_scalar(&Weight::from(-3)), integer(-3));
        assert!(is_integral(&Weight::from(4)));
        assert!(!is_integral(&Weight::new(1, 2)));
    }
}
