//! Core scalar types, Gram matrices and the algebra traits.
//!
//! - [`scalar`]: exact rationals for coefficients, weights and offsets
//! - [`gram`]: [`gram::GramMatrix`] and its direct sum
//! - [`traits`]: [`traits::FormAlgebra`], [`traits::Additive`], [`traits::Multiplicative`]

pub mod gram;
pub mod scalar;
pub mod traits;
