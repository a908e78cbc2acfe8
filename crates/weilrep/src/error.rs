//! Error type shared by every form operation.

use thiserror::Error;

use crate::core::gram::GramMatrix;
use crate::core::scalar::Weight;

/// Errors raised by form constructors and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// Additive operations need identical lattices.
    #[error("incompatible Gram matrices: {left} and {right}")]
    IncompatibleGramMatrices {
        /// Gram matrix of the left operand.
        left: GramMatrix,
        /// Gram matrix of the right operand.
        right: GramMatrix,
    },

    /// Additive operations need identical weights.
    #[error("incompatible weights: {left} and {right}")]
    IncompatibleWeights {
        /// Weight of the left operand (or the expected weight).
        left: Weight,
        /// Weight of the right operand (or the weight found).
        right: Weight,
    },

    /// Tensor powers are defined for exponents `N >= 1` only.
    #[error("invalid exponent {0}: tensor powers need an exponent of at least 1")]
    InvalidExponent(i64),

    /// The operation is not defined for these operands. Callers may try
    /// the reflected operation instead.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// A quasimodular form needs at least its degree-0 term.
    #[error("a quasimodular form needs at least one term")]
    EmptyTerms,

    /// Scalar division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The matrix is not a usable Gram matrix.
    #[error("invalid Gram matrix: {0}")]
    InvalidGramMatrix(String),

    /// A form was given a series list that does not match its lattice.
    #[error("expected {expected} components, found {found}")]
    ComponentMismatch {
        /// Number of discriminant-group cells of the lattice.
        expected: usize,
        /// Number of series supplied.
        found: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T, E = FormError> = core::result::Result<T, E>;
