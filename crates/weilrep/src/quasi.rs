//! Vector-valued quasimodular forms.
//!
//! A quasimodular form is the holomorphic part of an almost-holomorphic
//! modular form
//!
//! ```text
//! F(τ) = f_0(τ) + f_1(τ) (4πy)^-1 + ... + f_r(τ) (4πy)^-r
//! ```
//!
//! and is stored as its term list `[f_r, ..., f_1, f_0]`, highest degree
//! first. The term `f_j` has weight `k - 2j`. The form itself *is* `f_0`:
//! [`QuasiForm::as_form`] returns it.
//!
//! Leading zero terms are trimmed on construction. A list that trims down
//! to `f_0` alone becomes [`QuasiForm::Plain`]; anything longer is
//! [`QuasiForm::Expanded`]. The variant is fixed at construction.

use core::fmt;
use std::sync::Arc;

use num_bigint::BigInt;
use tracing::{debug, trace};

use crate::completion::AlmostHolomorphicForm;
use crate::core::gram::GramMatrix;
use crate::core::scalar::{integer, to_scalar, Scalar, Weight};
use crate::core::traits::{Additive, FormAlgebra, Multiplicative};
use crate::error::{FormError, Result};
use crate::form::WeilRepModularForm;
use crate::lattice::WeilRep;

/// A quasimodular form of some depth.
///
/// # Example
///
/// ```
/// use weilrep::eisenstein::eisenstein_e2;
///
/// let e2 = eisenstein_e2(5).unwrap();
/// assert_eq!(e2.depth(), 1);
/// let de2 = e2.derivative().unwrap();
/// assert_eq!(de2.depth(), 2);
/// assert_eq!(
///     de2.to_string(),
///     "[(), -24*q - 144*q^2 - 288*q^3 - 672*q^4 + O(q^5)]"
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum QuasiForm {
    /// Depth 0: an ordinary modular form.
    Plain(WeilRepModularForm),
    /// Depth at least 1.
    Expanded(Expansion),
}

/// Term list of a quasimodular form of depth at least 1.
///
/// Holds `[f_r, ..., f_0]` with `r >= 1` and `f_r != 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct Expansion {
    terms: Vec<WeilRepModularForm>,
}

impl Expansion {
    /// The terms, highest degree first.
    #[inline]
    #[must_use]
    pub fn terms(&self) -> &[WeilRepModularForm] {
        &self.terms
    }

    /// Degree of the highest nonzero term.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.terms.len() - 1
    }
}

impl From<WeilRepModularForm> for QuasiForm {
    fn from(form: WeilRepModularForm) -> Self {
        QuasiForm::Plain(form)
    }
}

impl QuasiForm {
    /// Builds the quasimodular form `f_0 + f_1 (4πy)^-1 + ... + f_r (4πy)^-r`
    /// from `terms = [f_r, ..., f_0]`.
    ///
    /// Leading zero terms are dropped. Every kept term must lie on `gram`
    /// and `f_j` must have weight `weight - 2j`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::EmptyTerms`] for an empty list,
    /// [`FormError::IncompatibleGramMatrices`] if a term lives on another
    /// lattice, and [`FormError::IncompatibleWeights`] if a kept term has the
    /// wrong weight.
    pub fn new(weight: Weight, gram: &GramMatrix, terms: Vec<WeilRepModularForm>) -> Result<Self> {
        if terms.is_empty() {
            return Err(FormError::EmptyTerms);
        }
        let depth = terms.len() - 1;
        let first = first_nonzero(&terms[..depth]);
        for (i, term) in terms.iter().enumerate() {
            if term.gram_matrix() != gram {
                return Err(FormError::IncompatibleGramMatrices {
                    left: gram.clone(),
                    right: term.gram_matrix().clone(),
                });
            }
            let expected = weight - Weight::from(2 * (depth - i) as i64);
            if i >= first && term.weight() != expected {
                return Err(FormError::IncompatibleWeights {
                    left: expected,
                    right: term.weight(),
                });
            }
        }
        Ok(Self::assemble(weight, terms))
    }

    // Trims leading zeros and picks the variant. `terms` must be nonempty
    // and have consistent weights.
    pub(crate) fn assemble(weight: Weight, mut terms: Vec<WeilRepModularForm>) -> Self {
        let depth = terms.len() - 1;
        let first = first_nonzero(&terms[..depth]);
        if first == depth {
            debug!(%weight, dropped = depth, "quasimodular expansion collapsed to a modular form");
            return QuasiForm::Plain(terms.swap_remove(depth).with_weight(weight));
        }
        terms.drain(..first);
        let last = terms.len() - 1;
        terms[last] = terms[last].with_weight(weight);
        trace!(%weight, depth = last, "assembled quasimodular form");
        QuasiForm::Expanded(Expansion { terms })
    }

    /// Weight of the form (the weight of `f_0`).
    #[must_use]
    pub fn weight(&self) -> Weight {
        self.as_form().weight()
    }

    /// Gram matrix of the lattice.
    #[must_use]
    pub fn gram_matrix(&self) -> &GramMatrix {
        self.as_form().gram_matrix()
    }

    /// The lattice handle.
    #[must_use]
    pub fn weilrep(&self) -> &Arc<WeilRep> {
        self.as_form().weilrep()
    }

    /// Precision of `f_0`.
    #[must_use]
    pub fn precision(&self) -> i64 {
        self.as_form().precision()
    }

    /// Number of terms beyond `f_0`.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            QuasiForm::Plain(_) => 0,
            QuasiForm::Expanded(e) => e.depth(),
        }
    }

    /// Terms `[f_r, ..., f_0]`, highest degree first. A plain form returns
    /// `[f_0]`.
    ///
    /// Apart from `f_0` the terms are not modular forms; they are only
    /// handled as if they were.
    #[must_use]
    pub fn terms(&self) -> &[WeilRepModularForm] {
        match self {
            QuasiForm::Plain(f) => std::slice::from_ref(f),
            QuasiForm::Expanded(e) => e.terms(),
        }
    }

    /// The degree-0 term `f_0`.
    #[must_use]
    pub fn as_form(&self) -> &WeilRepModularForm {
        match self {
            QuasiForm::Plain(f) => f,
            QuasiForm::Expanded(e) => &e.terms[e.terms.len() - 1],
        }
    }

    /// Returns true if the form is zero. Forms of depth at least 1 never are.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self, QuasiForm::Plain(f) if f.is_zero())
    }

    fn check_additive(&self, other: &Self) -> Result<()> {
        if self.gram_matrix() != other.gram_matrix() {
            return Err(FormError::IncompatibleGramMatrices {
                left: self.gram_matrix().clone(),
                right: other.gram_matrix().clone(),
            });
        }
        if self.weight() != other.weight() {
            return Err(FormError::IncompatibleWeights {
                left: self.weight(),
                right: other.weight(),
            });
        }
        Ok(())
    }

    // Aligns the two term lists at the degree-0 end. The shallower list is
    // padded on the high-degree side, contributing `pad` (the deeper list's
    // head, negated when subtracting a deeper right operand).
    fn combine(
        &self,
        other: &Self,
        op: impl Fn(&WeilRepModularForm, &WeilRepModularForm) -> Result<WeilRepModularForm>,
        pad: impl Fn(&WeilRepModularForm) -> WeilRepModularForm,
    ) -> Result<Self> {
        self.check_additive(other)?;
        let (t1, t2) = (self.terms(), other.terms());
        let (d1, d2) = (self.depth(), other.depth());
        let mut terms = Vec::with_capacity(d1.max(d2) + 1);
        if d1 <= d2 {
            let j = d2 - d1;
            terms.extend(t2[..j].iter().map(pad));
            for i in 0..=d1 {
                terms.push(op(&t1[i], &t2[i + j])?);
            }
        } else {
            let j = d1 - d2;
            terms.extend(t1[..j].iter().cloned());
            for i in 0..=d2 {
                terms.push(op(&t1[i + j], &t2[i])?);
            }
        }
        Ok(Self::assemble(self.weight(), terms))
    }

    /// Tensor power `self ⊗ ... ⊗ self` (`n` factors), split in halves.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidExponent`] if `n < 1`.
    pub fn pow(&self, n: i64) -> Result<Self> {
        match n {
            1 => Ok(self.clone()),
            n if n > 1 => {
                let half = n / 2;
                trace!(n, half, "splitting tensor power");
                let low = self.pow(half)?;
                let high = if n - half == half {
                    low.clone()
                } else {
                    self.pow(n - half)?
                };
                low.try_mul(&high)
            }
            n => Err(FormError::InvalidExponent(n)),
        }
    }

    /// The Maass raising operator: a quasimodular form of weight `k + 2`
    /// and depth (generically) `r + 1`.
    ///
    /// With `t = [f_r, ..., f_0]` and `D = q d/dq` the new terms are
    ///
    /// ```text
    /// t'[0]     = (r - k) t[0]
    /// t'[j]     = (r - k - j) t[j] + D t[j-1]     1 <= j <= r
    /// t'[r + 1] = D t[r]
    /// ```
    ///
    /// # Errors
    ///
    /// Fails only if the term list has inconsistent weights, which the
    /// constructors rule out.
    pub fn derivative(&self) -> Result<Self> {
        let t = self.terms();
        let r = self.depth();
        let k = self.weight();
        let rk = integer(r as i64) - to_scalar(&k);
        let mut terms = Vec::with_capacity(r + 2);
        terms.push(t[0].scale(&rk));
        for j in 1..=r {
            let scaled = t[j].scale(&(&rk - integer(j as i64)));
            terms.push(scaled.try_add(&t[j - 1].q_derivative())?);
        }
        terms.push(t[r].q_derivative());
        let raised = Self::assemble(k + 2, terms);
        debug!(weight = %raised.weight(), depth = raised.depth(), "derivative");
        Ok(raised)
    }

    /// The shift operator: drops `f_0` and weights the remaining terms by
    /// falling factorials, lowering the depth by one and the weight by 2.
    ///
    /// The coefficient array is `c[r] = 1`, `c[r - j] = j · c[r - j + 1]`,
    /// so the term `f_m` is multiplied by `m!`. A form of depth 0 shifts to
    /// the zero form of weight `k - 2`.
    #[must_use]
    pub fn shift(&self) -> Self {
        let r = self.depth();
        let weight = self.weight() - 2;
        if r == 0 {
            return QuasiForm::Plain(self.weilrep().zero(weight, self.precision()));
        }
        let mut c = vec![BigInt::from(1); r + 1];
        for j in 1..=r {
            c[r - j] = BigInt::from(j) * &c[r - j + 1];
        }
        let terms = self.terms()[..r]
            .iter()
            .zip(c)
            .map(|(y, c)| y.scale(&Scalar::from_integer(c)))
            .collect();
        let shifted = Self::assemble(weight, terms);
        debug!(weight = %weight, depth = shifted.depth(), "shift");
        shifted
    }

    /// The almost-holomorphic completion `[f, shift(f) / 1!, shift²(f) / (1!·2!), ...]`.
    ///
    /// Step `i` divides by `i!`, which cancels the factorials `shift` puts on
    /// the terms, so the holomorphic part of the `i`-th entry is `f_i`.
    ///
    /// # Example
    ///
    /// ```
    /// use weilrep::eisenstein::eisenstein_e2;
    ///
    /// let c = eisenstein_e2(5).unwrap().completion();
    /// assert_eq!(c.depth(), 1);
    /// assert_eq!(c[1].to_string(), "[(), -12 + O(q^5)]");
    /// ```
    #[must_use]
    pub fn completion(&self) -> AlmostHolomorphicForm {
        let mut list = vec![self.clone()];
        let mut divisor = BigInt::from(1);
        for i in 1..=self.depth() {
            divisor *= i;
            let next = list[i - 1].shift().scale(&Scalar::new(1.into(), divisor.clone()));
            list.push(next);
        }
        AlmostHolomorphicForm::new(list)
    }
}

fn first_nonzero(terms: &[WeilRepModularForm]) -> usize {
    terms.iter().position(|t| !t.is_zero()).unwrap_or(terms.len())
}

impl FormAlgebra for QuasiForm {
    fn negated(&self) -> Self {
        Self::assemble(self.weight(), self.terms().iter().map(FormAlgebra::negated).collect())
    }

    fn scale(&self, c: &Scalar) -> Self {
        Self::assemble(self.weight(), self.terms().iter().map(|t| t.scale(c)).collect())
    }
}

impl Additive for QuasiForm {
    fn try_add(&self, rhs: &Self) -> Result<Self> {
        self.combine(rhs, |a, b| a.try_add(b), Clone::clone)
    }

    fn try_sub(&self, rhs: &Self) -> Result<Self> {
        self.combine(rhs, |a, b| a.try_sub(b), FormAlgebra::negated)
    }
}

impl Additive<WeilRepModularForm> for QuasiForm {
    fn try_add(&self, rhs: &WeilRepModularForm) -> Result<Self> {
        self.try_add(&QuasiForm::from(rhs.clone()))
    }

    fn try_sub(&self, rhs: &WeilRepModularForm) -> Result<Self> {
        self.try_sub(&QuasiForm::from(rhs.clone()))
    }
}

impl Multiplicative for QuasiForm {
    type Output = Self;

    /// Tensor product. Weights add, lattices combine by direct sum, and
    /// depths add: the term `t1[i] ⊗ t2[j]` lands in slot `i + j`.
    fn try_mul(&self, rhs: &Self) -> Result<Self> {
        let weilrep = Arc::new(self.weilrep().direct_sum(rhs.weilrep()));
        let k = self.weight() + rhs.weight();
        let (r, s) = (self.depth(), rhs.depth());
        let rs = r + s;
        let lowest = k - Weight::from(2 * rs as i64);
        let p = self.precision();
        debug!(left_depth = r, right_depth = s, weight = %k, "tensor product of quasimodular forms");
        let mut acc: Vec<WeilRepModularForm> = (0..=rs)
            .map(|i| weilrep.zero(lowest + Weight::from(2 * i as i64), p))
            .collect();
        for (i, x) in self.terms().iter().enumerate() {
            for (j, y) in rhs.terms().iter().enumerate() {
                let product = x.tensor_on(y, Arc::clone(&weilrep));
                acc[i + j] = acc[i + j].try_add(&product)?;
            }
        }
        Ok(Self::assemble(k, acc))
    }
}

impl Multiplicative<WeilRepModularForm> for QuasiForm {
    type Output = Self;

    fn try_mul(&self, rhs: &WeilRepModularForm) -> Result<Self> {
        self.try_mul(&QuasiForm::from(rhs.clone()))
    }
}

impl core::ops::Neg for &QuasiForm {
    type Output = QuasiForm;

    fn neg(self) -> QuasiForm {
        self.negated()
    }
}

/// Displays `f_0`.
impl fmt::Display for QuasiForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_form(), f)
    }
}
