//! Mock modular forms.
//!
//! A [`MockForm`] is a modular-form-like expansion tagged with its shadow.
//! Linear operations act on both in lock-step; a plain form mixed into a
//! sum contributes nothing to the shadow.

use core::fmt;

use crate::core::gram::GramMatrix;
use crate::core::scalar::{Scalar, Weight};
use crate::core::traits::{Additive, FormAlgebra, Multiplicative};
use crate::error::{FormError, Result};
use crate::form::WeilRepModularForm;

/// An expansion together with its shadow.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use weilrep::{Additive, MockForm, QSeries, WeilRep, WeilRepModularForm, Weight};
///
/// let w = Arc::new(WeilRep::trivial());
/// let f = WeilRepModularForm::new(Weight::new(3, 2), Arc::clone(&w), vec![QSeries::from_integers(&[0, 1], 3)]).unwrap();
/// let shadow = WeilRepModularForm::new(Weight::new(1, 2), w, vec![QSeries::from_integers(&[1], 3)]).unwrap();
/// let m = MockForm::new(f.clone(), shadow.clone());
/// let sum = m.try_add(&f).unwrap();
/// assert_eq!(sum.shadow(), &shadow);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MockForm {
    form: WeilRepModularForm,
    shadow: WeilRepModularForm,
}

impl MockForm {
    /// Pairs an expansion with its shadow.
    #[must_use]
    pub fn new(form: WeilRepModularForm, shadow: WeilRepModularForm) -> Self {
        Self { form, shadow }
    }

    /// The holomorphic expansion.
    #[inline]
    #[must_use]
    pub fn form(&self) -> &WeilRepModularForm {
        &self.form
    }

    /// The shadow.
    #[inline]
    #[must_use]
    pub fn shadow(&self) -> &WeilRepModularForm {
        &self.shadow
    }

    /// Weight of the expansion.
    #[inline]
    #[must_use]
    pub fn weight(&self) -> Weight {
        self.form.weight()
    }

    /// Gram matrix of the expansion's lattice.
    #[inline]
    #[must_use]
    pub fn gram_matrix(&self) -> &GramMatrix {
        self.form.gram_matrix()
    }

    /// Not available: no shadow transformation is implemented for the
    /// raising operator.
    ///
    /// # Errors
    ///
    /// Always returns [`FormError::Unsupported`].
    pub fn derivative(&self) -> Result<Self> {
        Err(FormError::Unsupported("derivative of a mock modular form"))
    }
}

impl FormAlgebra for MockForm {
    fn negated(&self) -> Self {
        Self::new(self.form.negated(), self.shadow.negated())
    }

    fn scale(&self, c: &Scalar) -> Self {
        Self::new(self.form.scale(c), self.shadow.scale(c))
    }
}

impl Additive for MockForm {
    fn try_add(&self, rhs: &Self) -> Result<Self> {
        Ok(Self::new(self.form.try_add(&rhs.form)?, self.shadow.try_add(&rhs.shadow)?))
    }

    fn try_sub(&self, rhs: &Self) -> Result<Self> {
        Ok(Self::new(self.form.try_sub(&rhs.form)?, self.shadow.try_sub(&rhs.shadow)?))
    }
}

impl Additive<WeilRepModularForm> for MockForm {
    fn try_add(&self, rhs: &WeilRepModularForm) -> Result<Self> {
        Ok(Self::new(self.form.try_add(rhs)?, self.shadow.clone()))
    }

    fn try_sub(&self, rhs: &WeilRepModularForm) -> Result<Self> {
        Ok(Self::new(self.form.try_sub(rhs)?, self.shadow.clone()))
    }
}

impl Multiplicative for MockForm {
    type Output = Self;

    fn try_mul(&self, _rhs: &Self) -> Result<Self> {
        Err(FormError::Unsupported("product of mock modular forms"))
    }
}

impl Multiplicative<WeilRepModularForm> for MockForm {
    type Output = Self;

    fn try_mul(&self, _rhs: &WeilRepModularForm) -> Result<Self> {
        Err(FormError::Unsupported("product of a mock modular form with a modular form"))
    }
}

impl core::ops::Neg for &MockForm {
    type Output = MockForm;

    fn neg(self) -> MockForm {
        self.negated()
    }
}

/// Displays the expansion; the shadow is available through
/// [`MockForm::shadow`].
impl fmt::Display for MockForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.form, f)
    }
}
