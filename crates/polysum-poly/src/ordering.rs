//! Comparators over packed exponent words.
//!
//! Every ordering here is a monomial order: it is total and compatible
//! with multiplication (a > b implies a·c > b·c). Heap-based products
//! rely on that compatibility to emit terms in decreasing order.

use std::cmp::Ordering;

use crate::monomial::{cmp_grevlex, cmp_grlex, cmp_lex, Monomial, MonomialLayout};

/// A monomial ordering.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum MonomialOrder {
    /// Lexicographic order with variable 0 most significant.
    ///
    /// With most-significant-first packing this is a plain comparison of
    /// the word slices.
    #[default]
    Lex,

    /// Total degree first, ties broken by lex.
    Grlex,

    /// Total degree first; on a tie the monomial with the smaller exponent
    /// in the last differing variable is larger.
    Grevlex,
}

impl MonomialOrder {
    /// Compares two packed monomials according to this ordering.
    #[inline]
    #[must_use]
    pub fn compare(&self, a: &[u64], b: &[u64], layout: &MonomialLayout) -> Ordering {
        match self {
            MonomialOrder::Lex => cmp_lex(a, b),
            MonomialOrder::Grlex => cmp_grlex(a, b, layout),
            MonomialOrder::Grevlex => cmp_grevlex(a, b, layout),
        }
    }

    /// Compares two monomials according to this ordering.
    #[inline]
    #[must_use]
    pub fn compare_monomials(&self, a: &Monomial, b: &Monomial, layout: &MonomialLayout) -> Ordering {
        self.compare(a.words(), b.words(), layout)
    }

    /// Returns true if `a` is strictly greater than `b`.
    #[inline]
    #[must_use]
    pub fn greater(&self, a: &[u64], b: &[u64], layout: &MonomialLayout) -> bool {
        self.compare(a, b, layout) == Ordering::Greater
    }

    /// Returns true if `a` and `b` are the same monomial.
    ///
    /// Equality does not depend on the ordering.
    #[inline]
    #[must_use]
    pub fn equal(a: &[u64], b: &[u64]) -> bool {
        a == b
    }

    /// Returns a short name for the ordering.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            MonomialOrder::Lex => "lex",
            MonomialOrder::Grlex => "grlex",
            MonomialOrder::Grevlex => "grevlex",
        }
    }
}

impl std::fmt::Display for MonomialOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
