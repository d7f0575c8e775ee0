//! Property-based tests comparing the scheduler against schoolbook products.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rayon::ThreadPoolBuilder;

    use crate::{AddmulConfig, SumOfProducts};
    use polysum_poly::{MonomialLayout, MonomialOrder, SparsePoly};
    use polysum_rings::Z;

    fn layout() -> MonomialLayout {
        MonomialLayout::new(3, 16)
    }

    fn any_order() -> impl Strategy<Value = MonomialOrder> {
        prop_oneof![
            Just(MonomialOrder::Lex),
            Just(MonomialOrder::Grlex),
            Just(MonomialOrder::Grevlex),
        ]
    }

    fn factor(order: MonomialOrder) -> impl Strategy<Value = SparsePoly<Z>> {
        proptest::collection::vec(((0u32..5, 0u32..5, 0u32..5), -9i64..10), 0..=5).prop_map(
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

    /// A random sum: the factors, the term lengths and the ordering.
    fn sum_input() -> impl Strategy<Value = (Vec<SparsePoly<Z>>, Vec<usize>, MonomialOrder)> {
        (any_order(), proptest::collection::vec(1usize..=3, 1..=4)).prop_flat_map(
            |(order, lengths)| {
                let total: usize = lengths.iter().sum();
                (
                    proptest::collection::vec(factor(order), total),
                    Just(lengths),
                    Just(order),
                )
            },
        )
    }

    fn schoolbook(factors: &[SparsePoly<Z>], lengths: &[usize], order: MonomialOrder) -> SparsePoly<Z> {
        let mut sum = SparsePoly::zero(layout(), order);
        let mut start = 0;
        for &len in lengths {
            let product = factors[start..start + len]
                .iter()
                .fold(SparsePoly::one(layout(), order), |acc, f| acc.mul(f));
            sum = sum.add(&product);
            start += len;
        }
        sum
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn matches_schoolbook(
            (factors, lengths, order) in sum_input(),
            threads in 0usize..=3,
            block_size in 1usize..=6,
            num_blocks in 1usize..=3,
        ) {
            let config = AddmulConfig::default()
                .with_block_size(block_size)
                .with_num_blocks(num_blocks);
            let job = SumOfProducts::new(&factors, &lengths, layout(), order).config(config);

            let result = if threads == 0 {
                job.compute()
            } else {
                let pool = ThreadPoolBuilder::new().num_threads(threads).build().unwrap();
                job.pool(&pool).compute()
            }
            .unwrap();

            prop_assert_eq!(result, schoolbook(&factors, &lengths, order));
        }

        #[test]
        fn report_counts_every_term(
            (factors, lengths, order) in sum_input(),
            block_size in 1usize..=4,
        ) {
            let config = AddmulConfig::default().with_block_size(block_size);
            let mut output = SparsePoly::zero(layout(), order);
            let report = SumOfProducts::new(&factors, &lengths, layout(), order)
                .config(config)
                .run_into(&mut output)
                .unwrap();

            prop_assert_eq!(report.terms_emitted, output.len());
            for stats in &report.terms {
                prop_assert_eq!(stats.transferred, stats.generated);
                prop_assert_eq!(stats.output, stats.generated);
            }
            let consumed: usize = report.terms.iter().map(|s| s.output).sum();
            prop_assert!(report.terms_emitted <= consumed);
        }
    }
}
