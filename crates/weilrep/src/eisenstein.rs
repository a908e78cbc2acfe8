//! Level-one Eisenstein series on the trivial lattice.
//!
//! `E_k = 1 - (2k / B_k) Σ σ_{k-1}(n) q^n`, with the Bernoulli numbers
//! computed exactly. `E_2` is not modular; [`eisenstein_e2`] returns it as
//! the depth-1 quasimodular form whose completion is
//! `E_2 - 3 / (π y)`.

use std::sync::Arc;

use num_bigint::BigInt;
use num_traits::{One, Zero};
use tracing::debug;

use crate::core::gram::GramMatrix;
use crate::core::scalar::{factorial, integer, Scalar, Weight};
use crate::error::{FormError, Result};
use crate::form::WeilRepModularForm;
use crate::lattice::WeilRep;
use crate::quasi::QuasiForm;
use crate::series::QSeries;

/// `B_0, ..., B_n` with the convention `B_1 = -1/2`.
fn bernoulli(n: usize) -> Vec<Scalar> {
    let mut b: Vec<Scalar> = Vec::with_capacity(n + 1);
    b.push(Scalar::one());
    for m in 1..=n {
        // Σ_{j<=m} C(m+1, j) B_j = 0
        let total = b
            .iter()
            .enumerate()
            .fold(Scalar::zero(), |acc, (j, bj)| acc + binomial(m + 1, j) * bj);
        b.push(-total / integer(m as i64 + 1));
    }
    b
}

fn binomial(n: usize, k: usize) -> Scalar {
    factorial(n) / (factorial(k) * factorial(n - k))
}

/// Sum of the `e`-th powers of the divisors of `n >= 1`.
fn sigma(e: u32, n: u64) -> BigInt {
    let mut total = BigInt::zero();
    let mut d = 1;
    while d * d <= n {
        if n % d == 0 {
            total += BigInt::from(d).pow(e);
            let co = n / d;
            if co != d {
                total += BigInt::from(co).pow(e);
            }
        }
        d += 1;
    }
    total
}

// 1 - (2k / B_k) Σ σ_{k-1}(n) q^n
fn normalized_series(k: usize, precision: i64) -> QSeries {
    let bk = bernoulli(k).swap_remove(k);
    let factor = -integer(2 * k as i64) / bk;
    let e = (k - 1) as u32;
    let mut coefficients = vec![Scalar::one()];
    coefficients.extend(
        (1..precision.max(1) as u64).map(|n| &factor * Scalar::from_integer(sigma(e, n))),
    );
    QSeries::new(0, coefficients, precision)
}

/// The Eisenstein series `E_k` for even `k >= 4`, to `O(q^precision)`.
///
/// # Example
///
/// ```
/// use weilrep::eisenstein::eisenstein_series;
///
/// let e6 = eisenstein_series(6, 3).unwrap();
/// assert_eq!(e6.to_string(), "[(), 1 - 504*q - 16632*q^2 + O(q^3)]");
/// ```
///
/// # Errors
///
/// Returns [`FormError::Unsupported`] for odd `k` or `k < 4`.
pub fn eisenstein_series(k: i64, precision: i64) -> Result<WeilRepModularForm> {
    if k < 4 || k % 2 != 0 {
        return Err(FormError::Unsupported(
            "Eisenstein series are available for even weight at least 4",
        ));
    }
    let series = normalized_series(k as usize, precision);
    debug!(k, precision, "Eisenstein series");
    WeilRepModularForm::new(Weight::from(k), Arc::new(WeilRep::trivial()), vec![series])
}

/// `E_2` as a quasimodular form of weight 2 and depth 1, with terms
/// `[-12, E_2]`.
///
/// # Errors
///
/// Propagates [`QuasiForm::new`]; the terms built here always satisfy it.
pub fn eisenstein_e2(precision: i64) -> Result<QuasiForm> {
    let w = Arc::new(WeilRep::trivial());
    let head = WeilRepModularForm::new(
        Weight::from(0),
        Arc::clone(&w),
        vec![QSeries::constant(integer(-12), precision)],
    )?;
    let e2 = WeilRepModularForm::new(Weight::from(2), w, vec![normalized_series(2, precision)])?;
    QuasiForm::new(Weight::from(2), &GramMatrix::empty(), vec![head, e2])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bernoulli_numbers() {
        let b = bernoulli(8);
        let r = |n, d| Scalar::new(BigInt::from(n), BigInt::from(d));
        assert_eq!(b[1], r(-1, 2));
        assert_eq!(b[2], r(1, 6));
        assert_eq!(b[3], Scalar::zero());
        assert_eq!(b[4], r(-1, 30));
        assert_eq!(b[6], r(1, 42));
        assert_eq!(b[8], r(-1, 30));
    }

    #[test]
    fn divisor_sums() {
        assert_eq!(sigma(1, 1), BigInt::from(1));
        assert_eq!(sigma(1, 4), BigInt::from(7));
        assert_eq!(sigma(3, 6), BigInt::from(1 + 8 + 27 + 216));
    }

    #[test]
    fn e4_coefficients() {
        let e4 = eisenstein_series(4, 4).unwrap();
        assert_eq!(e4.to_string(), "[(), 1 + 240*q + 2160*q^2 + 6720*q^3 + O(q^4)]");
        assert_eq!(e4.weight(), Weight::from(4));
    }

    #[test]
    fn weight_must_be_even_and_at_least_four() {
        assert!(matches!(eisenstein_series(2, 5), Err(FormError::Unsupported(_))));
        assert!(matches!(eisenstein_series(5, 5), Err(FormError::Unsupported(_))));
    }

    #[test]
    fn e2_terms() {
        let e2 = eisenstein_e2(5).unwrap();
        assert_eq!(e2.depth(), 1);
        assert_eq!(e2.weight(), Weight::from(2));
        assert_eq!(e2.terms()[0].to_string(), "[(), -12 + O(q^5)]");
        assert_eq!(e2.to_string(), "[(), 1 - 24*q - 72*q^2 - 96*q^3 - 168*q^4 + O(q^5)]");
    }
}
