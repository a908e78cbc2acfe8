//! Gram matrices of integral lattices.
//!
//! A [`GramMatrix`] identifies the lattice underlying a vector-valued form.
//! Equality of Gram matrices is the compatibility condition for adding
//! forms; tensor products combine them by block direct sum.

use core::fmt;

use crate::error::{FormError, Result};

/// A square symmetric integer matrix, stored row-major.
///
/// The empty (0 × 0) matrix is the Gram matrix of the trivial lattice, which
/// carries scalar-valued forms.
///
/// # Example
///
/// ```
/// use weilrep::GramMatrix;
///
/// let s = GramMatrix::new(vec![vec![2, 1], vec![1, 2]]).unwrap();
/// assert_eq!(s.dim(), 2);
/// assert_eq!(s.determinant(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GramMatrix {
    dim: usize,
    entries: Vec<i64>,
}

impl GramMatrix {
    /// Builds a Gram matrix from its rows.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidGramMatrix`] if the rows do not form a
    /// square symmetric matrix.
    pub fn new(rows: Vec<Vec<i64>>) -> Result<Self> {
        let dim = rows.len();
        if let Some(row) = rows.iter().find(|row| row.len() != dim) {
            return Err(FormError::InvalidGramMatrix(format!(
                "expected {dim} columns, found a row with {}",
                row.len()
            )));
        }
        let entries: Vec<i64> = rows.into_iter().flatten().collect();
        let matrix = Self { dim, entries };
        for i in 0..dim {
            for j in (i + 1)..dim {
                if matrix.entry(i, j) != matrix.entry(j, i) {
                    return Err(FormError::InvalidGramMatrix(format!(
                        "entry ({i}, {j}) differs from entry ({j}, {i})"
                    )));
                }
            }
        }
        Ok(matrix)
    }

    /// The 0 × 0 Gram matrix of the trivial lattice.
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Diagonal Gram matrix with the given diagonal.
    #[must_use]
    pub fn diagonal(diagonal: &[i64]) -> Self {
        let dim = diagonal.len();
        let mut entries = vec![0; dim * dim];
        for (i, d) in diagonal.iter().enumerate() {
            entries[i * dim + i] = *d;
        }
        Self { dim, entries }
    }

    /// Rank of the lattice.
    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry in row `i`, column `j`.
    #[inline]
    #[must_use]
    pub fn entry(&self, i: usize, j: usize) -> i64 {
        self.entries[i * self.dim + j]
    }

    /// Iterates the rows.
    pub fn rows(&self) -> impl Iterator<Item = &[i64]> + '_ {
        // chunks(0) is not allowed, and the empty matrix has no rows anyway
        self.entries.chunks(self.dim.max(1))
    }

    /// Block direct sum `self ⊕ other`.
    ///
    /// # Example
    ///
    /// ```
    /// use weilrep::GramMatrix;
    ///
    /// let s = GramMatrix::diagonal(&[-2]).direct_sum(&GramMatrix::diagonal(&[-4]));
    /// assert_eq!(s, GramMatrix::diagonal(&[-2, -4]));
    /// ```
    #[must_use]
    pub fn direct_sum(&self, other: &Self) -> Self {
        let dim = self.dim + other.dim;
        let mut entries = vec![0; dim * dim];
        for i in 0..self.dim {
            for j in 0..self.dim {
                entries[i * dim + j] = self.entry(i, j);
            }
        }
        for i in 0..other.dim {
            for j in 0..other.dim {
                entries[(self.dim + i) * dim + self.dim + j] = other.entry(i, j);
            }
        }
        Self { dim, entries }
    }

    /// Determinant, computed by fraction-free Bareiss elimination.
    ///
    /// The empty matrix has determinant 1.
    #[must_use]
    pub fn determinant(&self) -> i128 {
        let n = self.dim;
        let mut m: Vec<i128> = self.entries.iter().map(|&x| i128::from(x)).collect();
        let mut sign = 1;
        let mut prev = 1;
        for k in 0..n {
            if m[k * n + k] == 0 {
                let Some(pivot) = ((k + 1)..n).find(|&r| m[r * n + k] != 0) else {
                    return 0;
                };
                for c in 0..n {
                    m.swap(k * n + c, pivot * n + c);
                }
                sign = -sign;
            }
            for i in (k + 1)..n {
                for j in (k + 1)..n {
                    m[i * n + j] = (m[i * n + j] * m[k * n + k] - m[i * n + k] * m[k * n + j]) / prev;
                }
            }
            prev = m[k * n + k];
        }
        if n == 0 {
            1
        } else {
            sign * m[(n - 1) * n + (n - 1)]
        }
    }
}

/// Compact single-line rendering, e.g. `[[-2, 0], [0, -2]]`.
impl fmt::Display for GramMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dim == 0 {
            return write!(f, "[]");
        }
        write!(f, "[")?;
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for (j, x) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{x}")?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_square() {
        let err = GramMatrix::new(vec![vec![2, 1]]).unwrap_err();
        assert!(matches!(err, FormError::InvalidGramMatrix(_)));
    }

    #[test]
    fn rejects_asymmetric() {
        let err = GramMatrix::new(vec![vec![2, 1], vec![0, 2]]).unwrap_err();
        assert!(matches!(err, FormError::InvalidGramMatrix(_)));
    }

    #[test]
    fn determinants() {
        assert_eq!(GramMatrix::empty().determinant(), 1);
        assert_eq!(GramMatrix::diagonal(&[-2, -2]).determinant(), 4);
        assert_eq!(GramMatrix::diagonal(&[-2, -2, -2]).determinant(), -8);
        // A2 root lattice
        let a2 = GramMatrix::new(vec![vec![2, -1], vec![-1, 2]]).unwrap();
        assert_eq!(a2.determinant(), 3);
        // needs a row swap
        let h = GramMatrix::new(vec![vec![0, 1], vec![1, 0]]).unwrap();
        assert_eq!(h.determinant(), -1);
        let degenerate = GramMatrix::new(vec![vec![2, 2], vec![2, 2]]).unwrap();
        assert_eq!(degenerate.determinant(), 0);
    }

    #[test]
    fn direct_sum_is_block_diagonal() {
        let a2 = GramMatrix::new(vec![vec![2, -1], vec![-1, 2]]).unwrap();
        let s = a2.direct_sum(&GramMatrix::diagonal(&[4]));
        assert_eq!(s.dim(), 3);
        assert_eq!(s.entry(0, 1), -1);
        assert_eq!(s.entry(2, 2), 4);
        assert_eq!(s.entry(0, 2), 0);
        assert_eq!(GramMatrix::empty().direct_sum(&a2), a2);
    }

    #[test]
    fn display() {
        assert_eq!(GramMatrix::empty().to_string(), "[]");
        assert_eq!(GramMatrix::diagonal(&[-2, -2]).to_string(), "[[-2, 0], [0, -2]]");
    }
}
