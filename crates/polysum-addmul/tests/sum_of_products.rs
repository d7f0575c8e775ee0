//! End-to-end tests for sums of products across worker pools.

use polysum_addmul::{sum_of_products, AddmulConfig, AddmulError, FnSink, SumOfProducts};
use polysum_poly::{Monomial, MonomialLayout, MonomialOrder, SparsePoly};
use polysum_rings::{Ring, Z};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::{ThreadPool, ThreadPoolBuilder};

const ORDERS: [MonomialOrder; 3] = [MonomialOrder::Lex, MonomialOrder::Grlex, MonomialOrder::Grevlex];

fn layout() -> MonomialLayout {
    MonomialLayout::new(4, 16)
}

fn pool(threads: usize) -> ThreadPool {
    ThreadPoolBuilder::new().num_threads(threads).build().unwrap()
}

fn random_factor(rng: &mut ChaCha8Rng, len: usize, max_exp: u32, order: MonomialOrder) -> SparsePoly<Z> {
    let terms: Vec<([u32; 4], Z)> = (0..len)
        .map(|_| {
            let exps = [(); 4].map(|()| rng.gen_range(0..=max_exp));
            (exps, Z::new(rng.gen_range(-1000..=1000)))
        })
        .collect();
    SparsePoly::from_exponent_terms(terms.iter().map(|(e, c)| (&e[..], c.clone())), layout(), order)
}

/// Random factors grouped into terms of one to three factors each.
fn random_sum(seed: u64, num_terms: usize, order: MonomialOrder) -> (Vec<SparsePoly<Z>>, Vec<usize>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut factors = Vec::new();
    let mut lengths = Vec::new();
    for _ in 0..num_terms {
        let k = rng.gen_range(1..=3);
        for _ in 0..k {
            let len = rng.gen_range(1..=25);
            factors.push(random_factor(&mut rng, len, 6, order));
        }
        lengths.push(k);
    }
    (factors, lengths)
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

fn assert_canonical(poly: &SparsePoly<Z>) {
    let layout = *poly.layout();
    for pair in poly.terms().windows(2) {
        assert!(
            poly.order().greater(pair[0].0.words(), pair[1].0.words(), &layout),
            "terms out of order: {} then {}",
            pair[0].0.to_string(&layout),
            pair[1].0.to_string(&layout)
        );
    }
    assert!(poly.terms().iter().all(|(_, c)| !c.is_zero()));
}

#[test]
fn test_matches_schoolbook_for_every_pool_size() {
    for (seed, order) in ORDERS.into_iter().enumerate() {
        let (factors, lengths) = random_sum(seed as u64, 6, order);
        let expected = schoolbook(&factors, &lengths, order);
        let config = AddmulConfig::default().with_block_size(16);

        for threads in 1..=4 {
            let pool = pool(threads);
            let mut output = SparsePoly::zero(layout(), order);
            let count = sum_of_products(&mut output, &factors, &lengths, &config, Some(&pool)).unwrap();
            assert_eq!(count, expected.len());
            assert_eq!(output, expected, "{order} with {threads} pool threads");
        }
    }
}

#[test]
fn test_output_is_strictly_decreasing() {
    for (seed, order) in ORDERS.into_iter().enumerate() {
        let (factors, lengths) = random_sum(100 + seed as u64, 8, order);
        let pool = pool(3);
        let result = SumOfProducts::new(&factors, &lengths, layout(), order)
            .config(AddmulConfig::default().with_block_size(8).with_num_blocks(2))
            .pool(&pool)
            .compute()
            .unwrap();
        assert_canonical(&result);
    }
}

#[test]
fn test_opposite_terms_cancel() {
    let order = MonomialOrder::Grevlex;
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let b1 = random_factor(&mut rng, 30, 5, order);
    let b2 = random_factor(&mut rng, 30, 5, order);
    let c = random_factor(&mut rng, 10, 5, order);

    // b1·b2 + (-b1)·b2 + c
    let factors = [b1.clone(), b2.clone(), b1.neg(), b2, c.clone()];
    let pool = pool(4);
    let result = SumOfProducts::new(&factors, &[2, 2, 1], layout(), order)
        .config(AddmulConfig::default().with_block_size(4))
        .pool(&pool)
        .compute()
        .unwrap();
    assert_eq!(result, c);

    let result = SumOfProducts::new(&factors[..4], &[2, 2], layout(), order)
        .pool(&pool)
        .compute()
        .unwrap();
    assert!(result.is_zero());
}

#[test]
fn test_single_factor_is_returned_unchanged() {
    let order = MonomialOrder::Lex;
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let f = random_factor(&mut rng, 40, 9, order);
    let factors = [f.clone()];

    for threads in [None, Some(pool(2))] {
        let mut output = SparsePoly::zero(layout(), order);
        let count =
            sum_of_products(&mut output, &factors, &[1], &AddmulConfig::default(), threads.as_ref()).unwrap();
        assert_eq!(count, f.len());
        assert_eq!(output, f);
    }
}

#[test]
fn test_zero_factor_contributes_nothing() {
    let order = MonomialOrder::Grlex;
    let mut rng = ChaCha8Rng::seed_from_u64(13);
    let a = random_factor(&mut rng, 12, 4, order);
    let b = random_factor(&mut rng, 12, 4, order);
    let zero = SparsePoly::zero(layout(), order);

    let factors = [a.clone(), zero, b.clone(), a.clone(), b.clone()];
    let pool = pool(2);
    let result = SumOfProducts::new(&factors, &[3, 2], layout(), order)
        .pool(&pool)
        .compute()
        .unwrap();
    assert_eq!(result, a.mul(&b));
}

#[test]
fn test_deterministic_across_thread_counts() {
    let order = MonomialOrder::Grevlex;
    let (factors, lengths) = random_sum(2024, 10, order);
    let config = AddmulConfig::default().with_block_size(5).with_num_blocks(2);

    let reference = SumOfProducts::new(&factors, &lengths, layout(), order)
        .config(config.clone())
        .compute()
        .unwrap();

    for threads in 1..=6 {
        let pool = pool(threads);
        for _ in 0..3 {
            let mut seen = Vec::new();
            let mut sink = FnSink::new(|m: Monomial, c: Z| seen.push((m, c)));
            SumOfProducts::new(&factors, &lengths, layout(), order)
                .config(config.clone())
                .pool(&pool)
                .run_into(&mut sink)
                .unwrap();
            assert_eq!(sink.forwarded(), reference.len());
            drop(sink);
            assert_eq!(seen.as_slice(), reference.terms(), "{threads} pool threads");
        }
    }
}

#[test]
fn test_tiny_blocks_terminate() {
    let order = MonomialOrder::Lex;
    let (factors, lengths) = random_sum(77, 5, order);
    let expected = schoolbook(&factors, &lengths, order);
    let config = AddmulConfig::default().with_block_size(1).with_num_blocks(1);

    for threads in [0, 1, 2, 8] {
        let mut output = SparsePoly::zero(layout(), order);
        let count = if threads == 0 {
            sum_of_products(&mut output, &factors, &lengths, &config, None)
        } else {
            let pool = pool(threads);
            sum_of_products(&mut output, &factors, &lengths, &config, Some(&pool))
        }
        .unwrap();
        assert_eq!(count, expected.len());
        assert_eq!(output, expected);
    }
}

#[test]
fn test_report_tracks_terms() {
    let order = MonomialOrder::Lex;
    let x = SparsePoly::<Z>::var(0, layout(), order);
    let y = SparsePoly::<Z>::var(1, layout(), order);
    let one = SparsePoly::<Z>::one(layout(), order);
    let x_plus_1 = x.add(&one);
    let y_plus_1 = y.add(&one);

    // (x+1)(y+1) + x·y
    let factors = [x_plus_1, y_plus_1, x, y];
    let mut output = SparsePoly::zero(layout(), order);
    let report = SumOfProducts::new(&factors, &[2, 2], layout(), order)
        .config(AddmulConfig::default().with_block_size(2))
        .run_into(&mut output)
        .unwrap();

    // 2xy + x + y + 1
    assert_eq!(report.terms_emitted, 4);
    assert_eq!(report.terms.len(), 2);
    assert_eq!(report.terms[0].generated, 4);
    assert_eq!(report.terms[1].generated, 1);
    assert_eq!(output.leading_coeff(), Some(&Z::new(2)));
}

#[test]
fn test_invalid_config_is_rejected() {
    let order = MonomialOrder::Lex;
    let factors = [SparsePoly::<Z>::var(0, layout(), order)];
    let mut output = SparsePoly::zero(layout(), order);

    let zero_block = AddmulConfig::default().with_block_size(0);
    assert_eq!(
        sum_of_products(&mut output, &factors, &[1], &zero_block, None),
        Err(AddmulError::ZeroBlockSize)
    );

    let zero_ring = AddmulConfig::default().with_num_blocks(0);
    assert_eq!(
        sum_of_products(&mut output, &factors, &[1], &zero_ring, None),
        Err(AddmulError::ZeroBlocks)
    );
}
