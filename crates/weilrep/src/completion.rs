//! Almost-holomorphic completions of quasimodular forms.
//!
//! [`AlmostHolomorphicForm`] presents a quasimodular form `f` as the list
//! `[f, shift(f) / 1!, shift²(f) / (1!·2!), ...]`, whose `i`-th entry has
//! holomorphic part `f_i`. It owns no arithmetic of its own: every
//! operation is carried out on term 0 and the result is completed again, so
//! the list always satisfies `list[i] = shift(list[i - 1]) / i!`.

use core::fmt;
use core::ops::Index;
use std::borrow::Cow;

use crate::core::gram::GramMatrix;
use crate::core::scalar::{Scalar, Weight};
use crate::core::traits::{Additive, FormAlgebra, Multiplicative};
use crate::error::Result;
use crate::form::WeilRepModularForm;
use crate::quasi::QuasiForm;

/// Anything that can be completed to an almost-holomorphic form.
pub trait Completable {
    /// The underlying quasimodular form.
    fn term_zero(&self) -> Cow<'_, QuasiForm>;

    /// The almost-holomorphic completion.
    fn completion(&self) -> AlmostHolomorphicForm;
}

impl Completable for QuasiForm {
    fn term_zero(&self) -> Cow<'_, QuasiForm> {
        Cow::Borrowed(self)
    }

    fn completion(&self) -> AlmostHolomorphicForm {
        QuasiForm::completion(self)
    }
}

impl Completable for WeilRepModularForm {
    fn term_zero(&self) -> Cow<'_, QuasiForm> {
        Cow::Owned(QuasiForm::from(self.clone()))
    }

    fn completion(&self) -> AlmostHolomorphicForm {
        QuasiForm::from(self.clone()).completion()
    }
}

impl Completable for AlmostHolomorphicForm {
    fn term_zero(&self) -> Cow<'_, QuasiForm> {
        Cow::Borrowed(&self.list[0])
    }

    fn completion(&self) -> AlmostHolomorphicForm {
        self.clone()
    }
}

/// `f_0 + f_1 (4πy)^-1 + ... + f_r (4πy)^-r`, built from a quasimodular
/// form by [`QuasiForm::completion`].
#[derive(Clone, Debug, PartialEq)]
pub struct AlmostHolomorphicForm {
    weight: Weight,
    gram: GramMatrix,
    list: Vec<QuasiForm>,
    depth: usize,
}

impl AlmostHolomorphicForm {
    // `list` is `[f, shift(f), shift²(f) / 2, shift³(f) / 12, ...]` and never empty.
    pub(crate) fn new(list: Vec<QuasiForm>) -> Self {
        let weight = list[0].weight();
        let gram = list[0].gram_matrix().clone();
        let depth = list[0].depth();
        Self {
            weight,
            gram,
            list,
            depth,
        }
    }

    /// Weight.
    #[inline]
    #[must_use]
    pub fn weight(&self) -> Weight {
        self.weight
    }

    /// Gram matrix of the lattice.
    #[inline]
    #[must_use]
    pub fn gram_matrix(&self) -> &GramMatrix {
        &self.gram
    }

    /// Depth of the underlying quasimodular form.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The terms `f_0, ..., f_r`, lowest degree first.
    #[inline]
    #[must_use]
    pub fn terms(&self) -> &[QuasiForm] {
        &self.list
    }

    /// Iterates the terms, lowest degree first.
    pub fn iter(&self) -> core::slice::Iter<'_, QuasiForm> {
        self.list.iter()
    }

    /// Tensor power of term 0, completed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FormError::InvalidExponent`] if `n < 1`.
    pub fn pow(&self, n: i64) -> Result<Self> {
        Ok(self.list[0].pow(n)?.completion())
    }

    /// Raising operator on term 0, completed.
    ///
    /// # Errors
    ///
    /// Propagates [`QuasiForm::derivative`].
    pub fn derivative(&self) -> Result<Self> {
        Ok(self.list[0].derivative()?.completion())
    }

    /// Shift operator on term 0, completed.
    #[must_use]
    pub fn shift(&self) -> Self {
        self.list[0].shift().completion()
    }
}

impl Index<usize> for AlmostHolomorphicForm {
    type Output = QuasiForm;

    fn index(&self, n: usize) -> &QuasiForm {
        &self.list[n]
    }
}

impl<'a> IntoIterator for &'a AlmostHolomorphicForm {
    type Item = &'a QuasiForm;
    type IntoIter = core::slice::Iter<'a, QuasiForm>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

impl FormAlgebra for AlmostHolomorphicForm {
    fn negated(&self) -> Self {
        self.list[0].negated().completion()
    }

    fn scale(&self, c: &Scalar) -> Self {
        self.list[0].scale(c).completion()
    }
}

impl<C: Completable> Additive<C> for AlmostHolomorphicForm {
    fn try_add(&self, rhs: &C) -> Result<Self> {
        Ok(self.list[0].try_add(&*rhs.term_zero())?.completion())
    }

    fn try_sub(&self, rhs: &C) -> Result<Self> {
        Ok(self.list[0].try_sub(&*rhs.term_zero())?.completion())
    }
}

impl<C: Completable> Multiplicative<C> for AlmostHolomorphicForm {
    type Output = Self;

    fn try_mul(&self, rhs: &C) -> Result<Self> {
        Ok(self.list[0].try_mul(&*rhs.term_zero())?.completion())
    }
}

impl core::ops::Neg for &AlmostHolomorphicForm {
    type Output = AlmostHolomorphicForm;

    fn neg(self) -> AlmostHolomorphicForm {
        self.negated()
    }
}

impl fmt::Display for AlmostHolomorphicForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Almost holomorphic modular form f_0")?;
        for i in 1..self.list.len() {
            write!(f, " + f_{i} * (4 pi y)^(-{i})")?;
        }
        write!(f, ", where:\nf_0 =\n{}", self.list[0])?;
        for (i, x) in self.list.iter().enumerate().skip(1) {
            write!(f, "\n{}\nf_{i} =\n{x}", "-".repeat(80))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::core::scalar::integer;
    use crate::eisenstein::{eisenstein_e2, eisenstein_series};

    #[test]
    fn e2_completion_display() {
        let c = eisenstein_e2(5).unwrap().completion();
        let expected = format!(
            "Almost holomorphic modular form f_0 + f_1 * (4 pi y)^(-1), where:\n\
             f_0 =\n[(), 1 - 24*q - 72*q^2 - 96*q^3 - 168*q^4 + O(q^5)]\n\
             {}\n\
             f_1 =\n[(), -12 + O(q^5)]",
            "-".repeat(80)
        );
        assert_eq!(c.to_string(), expected);
    }

    #[test]
    fn depth_zero_completion_has_one_term() {
        let e4 = eisenstein_series(4, 5).unwrap();
        let c = e4.completion();
        assert_eq!(c.depth(), 0);
        assert_eq!(c.terms().len(), 1);
        assert!(c.to_string().starts_with("Almost holomorphic modular form f_0, where:\nf_0 =\n"));
    }

    #[test]
    fn arithmetic_recompletes() {
        let e2 = eisenstein_e2(5).unwrap();
        let c = e2.completion();
        let doubled = c.try_add(&c).unwrap();
        assert_eq!(doubled, e2.scale(&integer(2)).completion());
        assert_eq!(doubled[1].to_string(), "[(), -24 + O(q^5)]");
        let zero = c.try_sub(&e2).unwrap();
        assert_eq!(zero.depth(), 0);
        assert!(zero[0].is_zero());
        assert_eq!(-&c, e2.negated().completion());
    }

    #[test]
    fn operators_delegate_to_term_zero() {
        let e2 = eisenstein_e2(5).unwrap();
        let c = e2.completion();
        assert_eq!(c.derivative().unwrap(), e2.derivative().unwrap().completion());
        assert_eq!(c.shift(), e2.shift().completion());
        assert_eq!(c.pow(2).unwrap(), e2.pow(2).unwrap().completion());
        assert_eq!(c.try_mul(&e2).unwrap(), e2.try_mul(&e2).unwrap().completion());
    }

    #[test]
    fn iteration_runs_lowest_degree_first() {
        let c = eisenstein_e2(5).unwrap().completion();
        let weights: Vec<_> = c.iter().map(QuasiForm::weight).collect();
        assert_eq!(weights, vec![Weight::from(2), Weight::from(0)]);
        assert_eq!((&c).into_iter().count(), 2);
    }
}
