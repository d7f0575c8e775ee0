//! Sorted sparse polynomials over packed monomials.
//!
//! `SparsePoly` is both the input format of the sum-of-products engine
//! and its default output. The schoolbook `mul` here is the sequential
//! reference the engine is tested against.

use std::cmp::Ordering;

use polysum_rings::traits::Ring;

use crate::monomial::{Monomial, MonomialLayout};
use crate::ordering::MonomialOrder;

/// A sparse multivariate polynomial.
///
/// Terms are stored as (monomial, coefficient) pairs in strictly
/// decreasing monomial order, with no zero coefficients. The empty
/// term list is the zero polynomial.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SparsePoly<R: Ring> {
    /// Terms in strictly decreasing order.
    terms: Vec<(Monomial, R)>,
    /// Exponent packing.
    layout: MonomialLayout,
    /// Comparator the terms are sorted by.
    order: MonomialOrder,
}

impl<R: Ring> SparsePoly<R> {
    /// Creates a new polynomial from terms.
    ///
    /// Terms are automatically sorted and combined.
    #[must_use]
    pub fn new(terms: Vec<(Monomial, R)>, layout: MonomialLayout, order: MonomialOrder) -> Self {
        let mut poly = Self {
            terms,
            layout,
            order,
        };
        poly.normalize();
        poly
    }

    /// Creates a polynomial from `(exponents, coefficient)` pairs.
    #[must_use]
    pub fn from_exponent_terms<'e, I>(terms: I, layout: MonomialLayout, order: MonomialOrder) -> Self
    where
        I: IntoIterator<Item = (&'e [u32], R)>,
    {
        let terms = terms
            .into_iter()
            .map(|(exps, c)| (Monomial::from_exponents(exps, &layout), c))
            .collect();
        Self::new(terms, layout, order)
    }

    /// Creates the zero polynomial.
    #[must_use]
    pub fn zero(layout: MonomialLayout, order: MonomialOrder) -> Self {
        Self {
            terms: Vec::new(),
            layout,
            order,
        }
    }

    /// Creates the constant polynomial 1.
    #[must_use]
    pub fn one(layout: MonomialLayout, order: MonomialOrder) -> Self {
        Self::constant(R::one(), layout, order)
    }

    /// Creates a constant polynomial.
    #[must_use]
    pub fn constant(c: R, layout: MonomialLayout, order: MonomialOrder) -> Self {
        if c.is_zero() {
            Self::zero(layout, order)
        } else {
            Self {
                terms: vec![(Monomial::one(&layout), c)],
                layout,
                order,
            }
        }
    }

    /// Creates a single variable x_i.
    #[must_use]
    pub fn var(i: usize, layout: MonomialLayout, order: MonomialOrder) -> Self {
        Self {
            terms: vec![(Monomial::var(i, &layout), R::one())],
            layout,
            order,
        }
    }

    /// Returns true if this is the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if there are no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the exponent packing.
    #[must_use]
    pub fn layout(&self) -> &MonomialLayout {
        &self.layout
    }

    /// Returns the monomial ordering.
    #[must_use]
    pub fn order(&self) -> MonomialOrder {
        self.order
    }

    /// Returns the terms.
    #[must_use]
    pub fn terms(&self) -> &[(Monomial, R)] {
        &self.terms
    }

    /// Consumes the polynomial, returning its terms.
    #[must_use]
    pub fn into_terms(self) -> Vec<(Monomial, R)> {
        self.terms
    }

    /// Returns the leading monomial.
    #[must_use]
    pub fn leading_monomial(&self) -> Option<&Monomial> {
        self.terms.first().map(|(m, _)| m)
    }

    /// Returns the leading coefficient.
    #[must_use]
    pub fn leading_coeff(&self) -> Option<&R> {
        self.terms.first().map(|(_, c)| c)
    }

    /// Returns the leading term (monomial, coefficient).
    #[must_use]
    pub fn leading_term(&self) -> Option<&(Monomial, R)> {
        self.terms.first()
    }

    /// Returns the largest exponent of variable `var` over all terms.
    #[must_use]
    pub fn max_exponent(&self, var: usize) -> u32 {
        self.terms
            .iter()
            .map(|(m, _)| m.exponent(var, &self.layout))
            .max()
            .unwrap_or(0)
    }

    /// Removes all terms, keeping the allocation.
    pub fn clear(&mut self) {
        self.terms.clear();
    }

    /// Appends a term below every existing term.
    ///
    /// The monomial must be strictly smaller than the current trailing
    /// monomial and the coefficient must be non-zero.
    pub fn push_term(&mut self, monomial: Monomial, coeff: R) {
        debug_assert!(!coeff.is_zero());
        debug_assert!(self.terms.last().map_or(true, |(last, _)| {
            self.order.compare_monomials(last, &monomial, &self.layout) == Ordering::Greater
        }));
        self.terms.push((monomial, coeff));
    }

    /// Sorts terms and combines like terms.
    fn normalize(&mut self) {
        let (order, layout) = (self.order, self.layout);

        // Descending, so the leading term comes first
        self.terms
            .sort_by(|a, b| order.compare_monomials(&b.0, &a.0, &layout));

        let mut combined: Vec<(Monomial, R)> = Vec::with_capacity(self.terms.len());
        for (m, c) in self.terms.drain(..) {
            match combined.last_mut() {
                Some((last, acc)) if *last == m => acc.add_assign(&c),
                _ => {
                    if combined.last().is_some_and(|(_, acc)| acc.is_zero()) {
                        combined.pop();
                    }
                    combined.push((m, c));
                }
            }
        }
        if combined.last().is_some_and(|(_, acc)| acc.is_zero()) {
            combined.pop();
        }

        self.terms = combined;
    }

    /// Adds two polynomials.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        assert_eq!(self.layout, other.layout);
        assert!(self.order == other.order);

        let mut terms = Vec::with_capacity(self.len() + other.len());
        let (mut i, mut j) = (0, 0);

        while i < self.len() && j < other.len() {
            let (ma, ca) = &self.terms[i];
            let (mb, cb) = &other.terms[j];
            match self.order.compare_monomials(ma, mb, &self.layout) {
                Ordering::Greater => {
                    terms.push((ma.clone(), ca.clone()));
                    i += 1;
                }
                Ordering::Less => {
                    terms.push((mb.clone(), cb.clone()));
                    j += 1;
                }
                Ordering::Equal => {
                    let mut sum = ca.clone();
                    sum.add_assign(cb);
                    if !sum.is_zero() {
                        terms.push((ma.clone(), sum));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }
        terms.extend_from_slice(&self.terms[i..]);
        terms.extend_from_slice(&other.terms[j..]);

        Self {
            terms,
            layout: self.layout,
            order: self.order,
        }
    }

    /// Negates a polynomial.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self {
            terms: self.terms.iter().map(|(m, c)| (m.clone(), -c.clone())).collect(),
            layout: self.layout,
            order: self.order,
        }
    }

    /// Subtracts two polynomials.
    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Multiplies two polynomials (schoolbook algorithm).
    ///
    /// Forms every pairwise product and then sorts and combines them.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        assert_eq!(self.layout, other.layout);
        assert!(self.order == other.order);

        if self.is_zero() || other.is_zero() {
            return Self::zero(self.layout, self.order);
        }

        let mut terms = Vec::with_capacity(self.len() * other.len());

        for (m1, c1) in &self.terms {
            for (m2, c2) in &other.terms {
                terms.push((m1.mul(m2), c1.mul_ref(c2)));
            }
        }

        Self::new(terms, self.layout, self.order)
    }

    /// Multiplies by a scalar.
    #[must_use]
    pub fn scale(&self, c: &R) -> Self {
        if c.is_zero() {
            return Self::zero(self.layout, self.order);
        }

        Self {
            terms: self.terms.iter().map(|(m, x)| (m.clone(), x.mul_ref(c))).collect(),
            layout: self.layout,
            order: self.order,
        }
    }

    /// Computes the total degree.
    #[must_use]
    pub fn total_degree(&self) -> u64 {
        self.terms
            .iter()
            .map(|(m, _)| m.total_degree(&self.layout))
            .max()
            .unwrap_or(0)
    }
}

impl<R: Ring + std::fmt::Display> std::fmt::Display for SparsePoly<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let terms: Vec<_> = self
            .terms
            .iter()
            .map(|(m, c)| {
                let mon = m.to_string(&self.layout);
                if mon == "1" {
                    format!("{c}")
                } else {
                    format!("{c}*{mon}")
                }
            })
            .collect();

        write!(f, "{}", terms.join(" + "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polysum_rings::Z;

    fn layout() -> MonomialLayout {
        MonomialLayout::new(2, 16)
    }

    #[test]
    fn test_sparse_basic() {
        let order = MonomialOrder::Grevlex;
        let x = SparsePoly::<Z>::var(0, layout(), order);
        let y = SparsePoly::<Z>::var(1, layout(), order);

        // x + y
        let sum = x.add(&y);
        assert_eq!(sum.len(), 2);

        // x - x
        assert!(x.sub(&x).is_zero());
    }

    #[test]
    fn test_sparse_mul() {
        let order = MonomialOrder::Lex;
        let x = SparsePoly::<Z>::var(0, layout(), order);
        let one = SparsePoly::constant(Z::new(1), layout(), order);

        // (x + 1)^2 = x^2 + 2x + 1
        let xp1 = x.add(&one);
        let sq = xp1.mul(&xp1);
        assert_eq!(sq.len(), 3);
        assert_eq!(sq.terms()[1].1, Z::new(2));
        assert_eq!(sq.to_string(), "1*x^2 + 2*x + 1");
    }

    #[test]
    fn test_normalize_cancels() {
        let order = MonomialOrder::Lex;
        let p = SparsePoly::from_exponent_terms(
            [
                (&[0u32, 1][..], Z::new(3)),
                (&[1, 0][..], Z::new(5)),
                (&[0, 1][..], Z::new(-3)),
                (&[0, 0][..], Z::new(2)),
            ],
            layout(),
            order,
        );

        assert_eq!(p.len(), 2);
        assert_eq!(p.leading_coeff(), Some(&Z::new(5)));
        assert_eq!(p.max_exponent(1), 0);
    }

    #[test]
    fn test_difference_of_squares() {
        let order = MonomialOrder::Grlex;
        let x = SparsePoly::<Z>::var(0, layout(), order);
        let y = SparsePoly::<Z>::var(1, layout(), order);

        let product = x.add(&y).mul(&x.sub(&y));
        let expected = x.mul(&x).sub(&y.mul(&y));
        assert_eq!(product, expected);
        assert_eq!(product.total_degree(), 2);
    }

    #[test]
    fn test_leading_term_and_scale() {
        let order = MonomialOrder::Grevlex;
        let x = SparsePoly::<Z>::var(0, layout(), order);
        let y = SparsePoly::<Z>::var(1, layout(), order);
        let p = x.mul(&y).add(&x).add(&SparsePoly::constant(Z::new(4), layout(), order));

        let xy = Monomial::from_exponents(&[1, 1], &layout());
        assert_eq!(p.leading_monomial(), Some(&xy));
        assert_eq!(p.leading_term(), Some(&(xy.clone(), Z::new(1))));

        let tripled = p.scale(&Z::new(3));
        assert_eq!(tripled.len(), 3);
        assert_eq!(tripled.leading_term(), Some(&(xy, Z::new(3))));
        assert_eq!(tripled.terms()[2].1, Z::new(12));
        assert!(p.scale(&Z::new(0)).is_zero());

        let zero = SparsePoly::<Z>::zero(layout(), order);
        assert_eq!(zero.leading_monomial(), None);
        assert_eq!(zero.leading_term(), None);
    }

    #[test]
    fn test_push_term_keeps_order() {
        let order = MonomialOrder::Lex;
        let mut p = SparsePoly::zero(layout(), order);
        p.push_term(Monomial::from_exponents(&[2, 0], &layout()), Z::new(1));
        p.push_term(Monomial::from_exponents(&[0, 7], &layout()), Z::new(-4));
        assert_eq!(p.len(), 2);

        p.clear();
        assert!(p.is_zero());
    }
}
