//! Lattice handles.
//!
//! A [`WeilRep`] stands for the Weil representation attached to an even
//! lattice. Forms only need two things from it: the Gram matrix, and the
//! ordered list of discriminant-group [`Cell`]s that index the components of
//! a vector-valued form. Each cell carries its vector `γ ∈ S^-1 Z^n / Z^n`
//! and the fractional exponent offset `-Q(γ) mod 1` at which that
//! component's q-expansion lives.

use std::sync::Arc;

use crate::core::gram::GramMatrix;
use crate::core::scalar::{fract, Offset, Weight};
use crate::error::{FormError, Result};
use crate::form::WeilRepModularForm;
use crate::series::QSeries;

/// Upper bound on candidate vectors tried by [`WeilRep::new`].
pub const MAX_ENUMERATION: u64 = 1 << 20;

/// One element of the discriminant group.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    vector: Vec<Offset>,
    offset: Offset,
}

impl Cell {
    /// A cell with the given vector and exponent offset.
    #[must_use]
    pub fn new(vector: Vec<Offset>, offset: Offset) -> Self {
        Self { vector, offset }
    }

    /// Coordinates of `γ`, each in `[0, 1)`.
    #[inline]
    #[must_use]
    pub fn vector(&self) -> &[Offset] {
        &self.vector
    }

    /// Exponent offset of the component indexed by this cell.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> Offset {
        self.offset
    }
}

/// Opaque lattice handle shared by every form on that lattice.
///
/// # Example
///
/// ```
/// use weilrep::{GramMatrix, Offset, WeilRep};
///
/// let w = WeilRep::new(GramMatrix::diagonal(&[-2, -2])).unwrap();
/// assert_eq!(w.len(), 4);
/// assert_eq!(w.cells()[1].vector(), &[Offset::new(1, 2), Offset::from(0)]);
/// assert_eq!(w.cells()[1].offset(), Offset::new(1, 4));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeilRep {
    gram: GramMatrix,
    cells: Vec<Cell>,
}

impl WeilRep {
    /// Enumerates the discriminant group of a nondegenerate Gram matrix.
    ///
    /// Cells are listed with the first coordinate varying fastest. This is
    /// a brute-force search over `(|det S|^-1 Z / Z)^n` and is meant for
    /// small lattices.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidGramMatrix`] if `gram` is degenerate or
    /// the search space exceeds [`MAX_ENUMERATION`] vectors.
    pub fn new(gram: GramMatrix) -> Result<Self> {
        let n = gram.dim();
        if n == 0 {
            return Ok(Self::trivial());
        }
        let det = gram.determinant().unsigned_abs();
        if det == 0 {
            return Err(FormError::InvalidGramMatrix("degenerate Gram matrix".into()));
        }
        let d = i64::try_from(det)
            .map_err(|_| FormError::InvalidGramMatrix("determinant too large".into()))?;
        let total = u32::try_from(n)
            .ok()
            .zip(u64::try_from(d).ok())
            .and_then(|(n, d)| d.checked_pow(n))
            .filter(|&t| t <= MAX_ENUMERATION)
            .ok_or_else(|| {
                FormError::InvalidGramMatrix("discriminant group too large to enumerate".into())
            })?;

        let mut cells = Vec::new();
        let mut digits = vec![0_i64; n];
        for _ in 0..total {
            let integral = (0..n).all(|i| {
                let row: i128 = (0..n)
                    .map(|j| i128::from(gram.entry(i, j)) * i128::from(digits[j]))
                    .sum();
                row % i128::from(d) == 0
            });
            if integral {
                let vector: Vec<Offset> = digits.iter().map(|&a| Offset::new(a, d)).collect();
                let offset = fract(&-norm(&gram, &vector));
                cells.push(Cell { vector, offset });
            }
            // odometer, first coordinate fastest
            for digit in digits.iter_mut() {
                *digit += 1;
                if *digit < d {
                    break;
                }
                *digit = 0;
            }
        }
        Ok(Self { gram, cells })
    }

    /// The trivial lattice: one cell, scalar-valued forms.
    #[must_use]
    pub fn trivial() -> Self {
        Self {
            gram: GramMatrix::empty(),
            cells: vec![Cell::new(Vec::new(), Offset::from(0))],
        }
    }

    /// A handle with an explicitly supplied cell list.
    #[must_use]
    pub fn from_cells(gram: GramMatrix, cells: Vec<Cell>) -> Self {
        Self { gram, cells }
    }

    /// The Gram matrix.
    #[inline]
    #[must_use]
    pub fn gram_matrix(&self) -> &GramMatrix {
        &self.gram
    }

    /// Discriminant-group cells, in component order.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of components of a form on this lattice.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True only for a handle built by [`WeilRep::from_cells`] with no cells;
    /// [`WeilRep::new`] and [`WeilRep::trivial`] always produce at least one.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Handle of the direct sum lattice.
    ///
    /// Cells are `(γ, δ)` with `γ` from `self` varying fastest, which matches
    /// the order [`WeilRep::new`] produces for the block-diagonal Gram
    /// matrix. Offsets add mod 1.
    #[must_use]
    pub fn direct_sum(&self, other: &Self) -> Self {
        let mut cells = Vec::with_capacity(self.len() * other.len());
        for right in &other.cells {
            for left in &self.cells {
                let mut vector = left.vector.clone();
                vector.extend_from_slice(&right.vector);
                cells.push(Cell {
                    vector,
                    offset: fract(&(left.offset + right.offset)),
                });
            }
        }
        Self {
            gram: self.gram.direct_sum(&other.gram),
            cells,
        }
    }

    /// The zero form of the given weight, every component `O(q^precision)`.
    #[must_use]
    pub fn zero(self: &Arc<Self>, weight: Weight, precision: i64) -> WeilRepModularForm {
        let series = vec![QSeries::zero(precision); self.len()];
        WeilRepModularForm::from_parts(weight, Arc::clone(self), series)
    }
}

// Q(x) = x^T S x / 2
fn norm(gram: &GramMatrix, x: &[Offset]) -> Offset {
    let mut total = Offset::from(0);
    for (i, xi) in x.iter().enumerate() {
        for (j, xj) in x.iter().enumerate() {
            total += xi * xj * gram.entry(i, j);
        }
    }
    total / 2
}
