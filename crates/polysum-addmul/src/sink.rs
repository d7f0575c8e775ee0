//! Destinations for merged output terms.
//!
//! The merge driver hands every finished `(monomial, coefficient)` pair to
//! a [`TermSink`] in strictly decreasing monomial order, and calls
//! [`TermSink::finish`] once after the last term.

use polysum_poly::{Monomial, SparsePoly};
use polysum_rings::Ring;

/// Receives the output of a sum of products.
pub trait TermSink<R> {
    /// Takes ownership of one non-zero output term.
    fn accept(&mut self, monomial: Monomial, coeff: R);

    /// Marks the end of the stream.
    ///
    /// The returned status is only logged.
    fn finish(&mut self) -> Option<String> {
        None
    }
}

/// Appending to a polynomial materializes the whole result.
impl<R: Ring> TermSink<R> for SparsePoly<R> {
    fn accept(&mut self, monomial: Monomial, coeff: R) {
        self.push_term(monomial, coeff);
    }

    fn finish(&mut self) -> Option<String> {
        Some(format!("{} terms collected", self.len()))
    }
}

/// Forwards each output term to a closure.
///
/// Lets a caller filter or reduce the result on the fly without
/// materializing it.
pub struct FnSink<F> {
    f: F,
    forwarded: usize,
}

impl<F> FnSink<F> {
    /// Wraps a closure.
    pub fn new(f: F) -> Self {
        Self { f, forwarded: 0 }
    }

    /// Number of terms forwarded so far.
    #[must_use]
    pub fn forwarded(&self) -> usize {
        self.forwarded
    }
}

impl<R, F: FnMut(Monomial, R)> TermSink<R> for FnSink<F> {
    fn accept(&mut self, monomial: Monomial, coeff: R) {
        self.forwarded += 1;
        (self.f)(monomial, coeff);
    }

    fn finish(&mut self) -> Option<String> {
        Some(format!("{} terms forwarded", self.forwarded))
    }
}
