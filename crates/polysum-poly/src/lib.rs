//! # polysum-poly
//!
//! Sparse multivariate polynomials for polysum.
//!
//! This crate provides:
//! - Bit-packed monomials with a caller-chosen exponent width
//! - Lex, graded lex and graded reverse lex orderings over packed words
//! - Sparse polynomials kept in strictly decreasing monomial order
//!
//! ## Packing
//!
//! Exponents are packed most-significant-first into `u64` words, so
//! monomial multiplication is word-wise addition and lex comparison is
//! a plain comparison of the word slices.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod monomial;
pub mod ordering;
pub mod sparse;

#[cfg(test)]
mod proptests;

pub use monomial::{Monomial, MonomialLayout};
pub use ordering::MonomialOrder;
pub use sparse::SparsePoly;
