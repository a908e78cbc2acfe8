//! Vector-valued quasimodular and mock modular forms for Weil representations.
//!
//! A quasimodular form of weight `k` and depth `r` is the holomorphic part
//! of an almost-holomorphic modular form
//!
//! ```text
//! F(τ) = f_0(τ) + f_1(τ) (4πy)^-1 + ... + f_r(τ) (4πy)^-r
//! ```
//!
//! The crate implements the algebra of such forms on top of a small
//! vector-valued modular form type:
//!
//! | Type | Role |
//! |------|------|
//! | [`WeilRepModularForm`] | base form: weight, lattice, one q-series per cell |
//! | [`QuasiForm`] | term list `[f_r, ..., f_0]`; +, −, ⊗, powers, `derivative`, `shift` |
//! | [`AlmostHolomorphicForm`] | completion `[f, shift(f), shift²(f)/2!, shift³(f)/(2!·3!), ...]` |
//! | [`MockForm`] | expansion tagged with its shadow |
//!
//! Every operation returns a new value. Fallible operations return
//! [`Result`] with a [`FormError`]; operations a type does not support
//! return [`FormError::Unsupported`] so callers can try the reflected
//! operation.
//!
//! # Example: Ramanujan's identity
//!
//! ```
//! use weilrep::eisenstein::{eisenstein_e2, eisenstein_series};
//! use weilrep::{Additive, FormAlgebra, Multiplicative, Scalar};
//!
//! let e2 = eisenstein_e2(8).unwrap();
//! let e4 = eisenstein_series(4, 8).unwrap();
//!
//! // D(E2) = (E2² - E4) / 12
//! let de2 = e2.derivative().unwrap();
//! let square = e2.as_form().try_mul(e2.as_form()).unwrap();
//! let rhs = square.try_sub(&e4).unwrap().try_div(&Scalar::from_integer(12.into())).unwrap();
//! assert_eq!(de2.as_form(), &rhs);
//! ```
//!
//! # Logging
//!
//! The library emits `tracing` events (`debug` for structural results such
//! as collapsed expansions and tensor products, `trace` for tensor-power
//! splits) and never installs a subscriber.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

// Scalars, Gram matrices, and the algebra traits
pub mod core;

// Error type
pub mod error;

// Truncated q-series
pub mod series;

// Lattice handles and discriminant groups
pub mod lattice;

// Base vector-valued forms
pub mod form;

// Quasimodular forms
pub mod quasi;

// Almost-holomorphic completions
pub mod completion;

// Mock modular forms
pub mod mock;

// Eisenstein series on the trivial lattice
pub mod eisenstein;

pub use core::gram::GramMatrix;
pub use core::scalar::{factorial, fract, to_scalar, Offset, Scalar, Weight};
pub use core::traits::{Additive, FormAlgebra, Multiplicative};

pub use completion::{AlmostHolomorphicForm, Completable};
pub use error::{FormError, Result};
pub use form::{Component, WeilRepModularForm};
pub use lattice::{Cell, WeilRep};
pub use mock::MockForm;
pub use quasi::{Expansion, QuasiForm};
pub use series::QSeries;
