//! # polysum-rings
//!
//! Coefficient rings for polysum.
//!
//! This crate provides:
//! - The `Ring` trait every coefficient type implements
//! - `Z`, the ring of arbitrary precision integers
//!
//! The sparse product engine only ever adds, multiplies, negates and
//! tests coefficients for zero, so `Ring` is deliberately small. The
//! in-place and by-reference hooks let big-integer rings avoid the
//! clone-heavy defaults.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod integers;
pub mod traits;

pub use integers::Z;
pub use traits::Ring;
