//! # polysum-integers
//!
//! Arbitrary precision integer coefficients for polysum.
//!
//! This crate wraps `dashu` to provide `Integer`, the coefficient type
//! carried through sparse products and their sums.
//!
//! ## Performance Notes
//!
//! - Small integers (fitting in a machine word) use inline storage
//! - In-place `+=` and by-reference `*` avoid reallocating large values,
//!   which matters when the same accumulator absorbs many products

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod integer;

#[cfg(test)]
mod proptests;

pub use integer::Integer;
