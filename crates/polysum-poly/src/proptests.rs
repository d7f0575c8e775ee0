//! Property-based tests for sparse polynomial arithmetic.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{MonomialLayout, MonomialOrder, SparsePoly};
    use polysum_rings::{Ring, Z};

    fn layout() -> MonomialLayout {
        MonomialLayout::new(3, 12)
    }

    fn any_order() -> impl Strategy<Value = MonomialOrder> {
        prop_oneof![
            Just(MonomialOrder::Lex),
            Just(MonomialOrder::Grlex),
            Just(MonomialOrder::Grevlex),
        ]
    }

    // Strategy for small sparse polynomials in three variables
    fn small_poly(order: MonomialOrder) -> impl Strategy<Value = SparsePoly<Z>> {
        proptest::collection::vec(((0u32..4, 0u32..4, 0u32..4), -20i64..20), 0..=6).prop_map(
            move |terms| {
                let terms: Vec<_> = terms
                    .into_iter()
                    .map(|((a, b, c), k)| ([a, b, c], Z::new(k)))
                    .collect();
                SparsePoly::from_exponent_terms(
                    terms.iter().map(|(e, k)| (&e[..], k.clone())),
                    layout(),
                    order,
                )
            },
        )
    }

    fn poly_triple() -> impl Strategy<Value = (SparsePoly<Z>, SparsePoly<Z>, SparsePoly<Z>)> {
        any_order().prop_flat_map(|order| (small_poly(order), small_poly(order), small_poly(order)))
    }

    proptest! {
        #[test]
        fn terms_strictly_decreasing((a, _, _) in poly_triple()) {
            let layout = *a.layout();
            for pair in a.terms().windows(2) {
                prop_assert!(a.order().greater(pair[0].0.words(), pair[1].0.words(), &layout));
            }
            prop_assert!(a.terms().iter().all(|(_, c)| !c.is_zero()));
        }

        #[test]
        fn poly_add_commutative((a, b, _) in poly_triple()) {
            prop_assert_eq!(a.add(&b), b.add(&a));
        }

        #[test]
        fn poly_mul_commutative((a, b, _) in poly_triple()) {
            prop_assert_eq!(a.mul(&b), b.mul(&a));
        }

        #[test]
        fn poly_mul_associative((a, b, c) in poly_triple()) {
            prop_assert_eq!(a.mul(&b).mul(&c), a.mul(&b.mul(&c)));
        }

        #[test]
        fn poly_distributive((a, b, c) in poly_triple()) {
            let left = a.mul(&b.add(&c));
            let right = a.mul(&b).add(&a.mul(&c));
            prop_assert_eq!(left, right);
        }

        #[test]
        fn poly_additive_inverse((a, _, _) in poly_triple()) {
            prop_assert!(a.add(&a.neg()).is_zero());
        }

        #[test]
        fn poly_mul_identity((a, _, _) in poly_triple()) {
            let one = SparsePoly::one(*a.layout(), a.order());
            prop_assert_eq!(a.mul(&one), a);
        }
    }
}
