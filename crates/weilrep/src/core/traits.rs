//! Algebra traits shared by every form type.
//!
//! Forms are immutable values: every operation returns a new form. Binary
//! operations can fail on incompatible operands, so they return
//! [`Result`] instead of going through `std::ops`.

use num_traits::Zero;

use super::scalar::Scalar;
use crate::error::{FormError, Result};

/// Unary and scalar operations.
pub trait FormAlgebra: Sized {
    /// Additive inverse.
    fn negated(&self) -> Self;

    /// Multiplication by a rational scalar.
    fn scale(&self, c: &Scalar) -> Self;

    /// Division by a rational scalar.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::DivisionByZero`] if `c` is zero.
    fn try_div(&self, c: &Scalar) -> Result<Self> {
        if c.is_zero() {
            return Err(FormError::DivisionByZero);
        }
        Ok(self.scale(&c.recip()))
    }
}

/// Addition and subtraction against `Rhs`.
pub trait Additive<Rhs: ?Sized = Self>: Sized {
    /// `self + rhs`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::IncompatibleGramMatrices`] or
    /// [`FormError::IncompatibleWeights`] if the operands do not live on the
    /// same lattice in the same weight.
    fn try_add(&self, rhs: &Rhs) -> Result<Self>;

    /// `self - rhs`.
    ///
    /// # Errors
    ///
    /// Same as [`Additive::try_add`].
    fn try_sub(&self, rhs: &Rhs) -> Result<Self>;
}

/// Tensor multiplication against `Rhs`.
pub trait Multiplicative<Rhs: ?Sized = Self> {
    /// Type of the product.
    type Output;

    /// `self ⊗ rhs`. Weights add and lattices combine by direct sum.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Unsupported`] if the product is not defined for
    /// these operand types.
    fn try_mul(&self, rhs: &Rhs) -> Result<Self::Output>;
}
