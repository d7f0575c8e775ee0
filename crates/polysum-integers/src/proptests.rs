//! Property-based tests for arbitrary precision arithmetic.

#[cfg(test)]
mod tests {
    use num_traits::Zero;
    use proptest::prelude::*;

    use crate::Integer;

    // Strategy for generating integers well past the machine word
    fn wide_int() -> impl Strategy<Value = Integer> {
        (any::<i64>(), any::<i64>(), 0u32..4)
            .prop_map(|(hi, lo, shift)| Integer::new(hi) * Integer::new(lo).pow(shift) + Integer::new(lo))
    }

    proptest! {
        #[test]
        fn integer_add_assign_matches_add(a in wide_int(), b in wide_int()) {
            let mut acc = a.clone();
            acc += &b;
            prop_assert_eq!(acc, a + b);
        }

        #[test]
        fn integer_mul_assign_matches_mul(a in wide_int(), b in wide_int()) {
            let mut acc = a.clone();
            acc *= &b;
            prop_assert_eq!(acc, &a * &b);
        }

        #[test]
        fn integer_distributive(a in wide_int(), b in wide_int(), c in wide_int()) {
            prop_assert_eq!(&a * &(&b + &c), &(&a * &b) + &(&a * &c));
        }

        #[test]
        fn integer_additive_inverse(a in wide_int()) {
            let mut acc = a.clone();
            acc += &(-&a);
            prop_assert!(acc.is_zero());
        }

        #[test]
        fn integer_negate_twice(a in wide_int()) {
            let mut b = a.clone();
            b.negate();
            prop_assert_eq!(b.signum(), -a.signum());
            b.negate();
            prop_assert_eq!(b, a);
        }
    }
}
