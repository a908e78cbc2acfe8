//! Vector-valued modular forms for a Weil representation.
//!
//! [`WeilRepModularForm`] is the base collaborator every other form type is
//! built from. It knows its weight, its lattice, and its Fourier expansion:
//! one q-series per discriminant-group cell. Nothing here checks
//! modularity; the type only does the bookkeeping arithmetic needed to
//! compose forms.

use core::fmt;
use std::sync::Arc;

use crate::core::gram::GramMatrix;
use crate::core::scalar::{floor, Offset, Scalar, Weight};
use crate::core::traits::{Additive, FormAlgebra, Multiplicative};
use crate::error::{FormError, Result};
use crate::lattice::WeilRep;
use crate::series::QSeries;

/// One component `(γ, offset, f)` of a Fourier expansion. The component
/// stands for `q^offset · f(q)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    vector: Vec<Offset>,
    offset: Offset,
    series: QSeries,
}

impl Component {
    /// Discriminant-group vector `γ`.
    #[inline]
    #[must_use]
    pub fn vector(&self) -> &[Offset] {
        &self.vector
    }

    /// Exponent offset.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// The q-series, without the `q^offset` factor.
    #[inline]
    #[must_use]
    pub fn series(&self) -> &QSeries {
        &self.series
    }

    fn with_series(&self, series: QSeries) -> Self {
        Self {
            vector: self.vector.clone(),
            offset: self.offset,
            series,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[(")?;
        for (i, x) in self.vector.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{x}")?;
        }
        if self.vector.len() == 1 {
            write!(f, ",")?;
        }
        write!(f, "), {}]", self.series.display_with_offset(self.offset))
    }
}

/// A vector-valued modular form.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use weilrep::{QSeries, WeilRep, WeilRepModularForm, Weight};
///
/// let w = Arc::new(WeilRep::trivial());
/// let e4 = WeilRepModularForm::new(
///     Weight::from(4),
///     w,
///     vec![QSeries::from_integers(&[1, 240, 2160], 3)],
/// )
/// .unwrap();
/// assert_eq!(e4.to_string(), "[(), 1 + 240*q + 2160*q^2 + O(q^3)]");
/// ```
#[derive(Clone, Debug)]
pub struct WeilRepModularForm {
    weight: Weight,
    weilrep: Arc<WeilRep>,
    expansion: Vec<Component>,
}

impl WeilRepModularForm {
    /// A form with one series per cell of `weilrep`, in cell order.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::ComponentMismatch`] if the number of series
    /// differs from the number of cells.
    pub fn new(weight: Weight, weilrep: Arc<WeilRep>, series: Vec<QSeries>) -> Result<Self> {
        if series.len() != weilrep.len() {
            return Err(FormError::ComponentMismatch {
                expected: weilrep.len(),
                found: series.len(),
            });
        }
        Ok(Self::from_parts(weight, weilrep, series))
    }

    pub(crate) fn from_parts(weight: Weight, weilrep: Arc<WeilRep>, series: Vec<QSeries>) -> Self {
        let expansion = weilrep
            .cells()
            .iter()
            .zip(series)
            .map(|(cell, series)| Component {
                vector: cell.vector().to_vec(),
                offset: cell.offset(),
                series,
            })
            .collect();
        Self {
            weight,
            weilrep,
            expansion,
        }
    }

    fn map_series(&self, weight: Weight, f: impl Fn(&Component) -> QSeries) -> Self {
        Self {
            weight,
            weilrep: Arc::clone(&self.weilrep),
            expansion: self
                .expansion
                .iter()
                .map(|c| c.with_series(f(c)))
                .collect(),
        }
    }

    /// Weight.
    #[inline]
    #[must_use]
    pub fn weight(&self) -> Weight {
        self.weight
    }

    /// Gram matrix of the underlying lattice.
    #[inline]
    #[must_use]
    pub fn gram_matrix(&self) -> &GramMatrix {
        self.weilrep.gram_matrix()
    }

    /// The lattice handle.
    #[inline]
    #[must_use]
    pub fn weilrep(&self) -> &Arc<WeilRep> {
        &self.weilrep
    }

    /// Components `(γ, offset, series)` in cell order.
    #[inline]
    #[must_use]
    pub fn fourier_expansion(&self) -> &[Component] {
        &self.expansion
    }

    /// Smallest precision among the components.
    #[must_use]
    pub fn precision(&self) -> i64 {
        self.expansion
            .iter()
            .map(|c| c.series.precision())
            .min()
            .unwrap_or(i64::MAX)
    }

    /// Returns true if every component is `O(q^prec)`.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.expansion.iter().all(|c| c.series.is_zero())
    }

    /// The same expansion, relabelled with another weight.
    #[must_use]
    pub fn with_weight(&self, weight: Weight) -> Self {
        Self {
            weight,
            ..self.clone()
        }
    }

    /// Coefficientwise derivative `D = q d/dq` of every component.
    ///
    /// The coefficient of `q^(n + offset)` is multiplied by `n + offset` and
    /// the weight rises by 2. Each component loses `floor(offset)` of
    /// precision.
    #[must_use]
    pub fn q_derivative(&self) -> Self {
        self.map_series(self.weight + 2, |c| c.series.derivative(c.offset))
    }

    pub(crate) fn check_compatible(&self, other: &Self) -> Result<()> {
        if self.gram_matrix() != other.gram_matrix() {
            return Err(FormError::IncompatibleGramMatrices {
                left: self.gram_matrix().clone(),
                right: other.gram_matrix().clone(),
            });
        }
        if self.weight != other.weight {
            return Err(FormError::IncompatibleWeights {
                left: self.weight,
                right: other.weight,
            });
        }
        if self.expansion.len() != other.expansion.len() {
            return Err(FormError::ComponentMismatch {
                expected: self.expansion.len(),
                found: other.expansion.len(),
            });
        }
        Ok(())
    }

    fn zip_with(&self, other: &Self, op: impl Fn(&QSeries, &QSeries) -> QSeries) -> Result<Self> {
        self.check_compatible(other)?;
        Ok(Self {
            weight: self.weight,
            weilrep: Arc::clone(&self.weilrep),
            expansion: self
                .expansion
                .iter()
                .zip(&other.expansion)
                .map(|(a, b)| a.with_series(op(&a.series, &b.series)))
                .collect(),
        })
    }

    /// Tensor product on an already-built direct sum handle. Component
    /// order must follow [`WeilRep::direct_sum`].
    pub(crate) fn tensor_on(&self, other: &Self, weilrep: Arc<WeilRep>) -> Self {
        let mut series = Vec::with_capacity(self.expansion.len() * other.expansion.len());
        for right in &other.expansion {
            for left in &self.expansion {
                let total = left.offset + right.offset;
                let carry = floor(&total);
                series.push((&left.series * &right.series).shift_exponent(carry));
            }
        }
        Self::from_parts(self.weight + other.weight, weilrep, series)
    }
}

impl PartialEq for WeilRepModularForm {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight
            && self.gram_matrix() == other.gram_matrix()
            && self.expansion == other.expansion
    }
}

impl FormAlgebra for WeilRepModularForm {
    fn negated(&self) -> Self {
        self.map_series(self.weight, |c| -&c.series)
    }

    fn scale(&self, c: &Scalar) -> Self {
        self.map_series(self.weight, |x| x.series.scale(c))
    }
}

impl Additive for WeilRepModularForm {
    fn try_add(&self, rhs: &Self) -> Result<Self> {
        self.zip_with(rhs, |a, b| a + b)
    }

    fn try_sub(&self, rhs: &Self) -> Result<Self> {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl Multiplicative for WeilRepModularForm {
    type Output = Self;

    /// Tensor product: weights add, lattices combine by direct sum, and each
    /// pair of components multiplies with offsets carried mod 1.
    fn try_mul(&self, rhs: &Self) -> Result<Self> {
        let weilrep = Arc::new(self.weilrep.direct_sum(&rhs.weilrep));
        Ok(self.tensor_on(rhs, weilrep))
    }
}

impl fmt::Display for WeilRepModularForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.expansion.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
