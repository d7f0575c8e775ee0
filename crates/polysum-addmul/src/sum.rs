//! Entry points for computing `Σ_i B_{i,1} · … · B_{i,k_i}`.

use polysum_poly::{MonomialLayout, MonomialOrder, SparsePoly};
use polysum_rings::Ring;
use rayon::ThreadPool;

use crate::config::AddmulConfig;
use crate::control::TermStats;
use crate::error::AddmulError;
use crate::generator::MAX_COMBINATIONS;
use crate::scheduler::Coordinator;
use crate::sink::TermSink;

/// Outcome of one sum of products.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SumReport {
    /// Non-zero terms handed to the sink.
    pub terms_emitted: usize,
    /// Final counters of every scheduled term, in input order.
    ///
    /// Terms dropped for containing a zero factor are not listed.
    pub terms: Vec<TermStats>,
}

/// A sum of products over factors grouped into terms.
///
/// `factors` holds every factor of every term back to back;
/// `term_lengths[i]` says how many of them belong to term `i`.
pub struct SumOfProducts<'a, R: Ring> {
    factors: &'a [SparsePoly<R>],
    term_lengths: &'a [usize],
    layout: MonomialLayout,
    order: MonomialOrder,
    config: AddmulConfig,
    pool: Option<&'a ThreadPool>,
}

impl<'a, R> SumOfProducts<'a, R>
where
    R: Ring + Send + Sync,
{
    /// Describes a sum of products with the default configuration,
    /// running on the calling thread only.
    #[must_use]
    pub fn new(
        factors: &'a [SparsePoly<R>],
        term_lengths: &'a [usize],
        layout: MonomialLayout,
        order: MonomialOrder,
    ) -> Self {
        Self {
            factors,
            term_lengths,
            layout,
            order,
            config: AddmulConfig::default(),
            pool: None,
        }
    }

    /// Replaces the block configuration.
    #[must_use]
    pub fn config(mut self, config: AddmulConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds every thread of `pool` as a worker next to the calling thread.
    #[must_use]
    pub fn pool(mut self, pool: &'a ThreadPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Streams the sum into `sink` in strictly decreasing monomial order.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or the input grouping is
    /// invalid. Nothing is sent to the sink in that case.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(factors = self.factors.len(), terms = self.term_lengths.len())
    )]
    pub fn run_into<S>(&self, sink: &mut S) -> Result<SumReport, AddmulError>
    where
        S: TermSink<R> + Send,
    {
        self.config.validate()?;
        let inputs = self.partition()?;

        let report = if inputs.is_empty() {
            SumReport::default()
        } else {
            let coordinator = Coordinator::new(inputs, self.layout, self.order, &self.config, sink);
            coordinator.run(self.pool);
            let (terms_emitted, terms) = coordinator.into_report();
            SumReport {
                terms_emitted,
                terms,
            }
        };

        if let Some(status) = sink.finish() {
            tracing::debug!(%status, emitted = report.terms_emitted, "sum of products complete");
        }
        Ok(report)
    }

    /// Collects the sum into a new polynomial.
    ///
    /// # Errors
    ///
    /// See [`SumOfProducts::run_into`].
    pub fn compute(&self) -> Result<SparsePoly<R>, AddmulError> {
        let mut output = SparsePoly::zero(self.layout, self.order);
        self.run_into(&mut output)?;
        Ok(output)
    }

    /// Splits the factors into terms, dropping terms with a zero factor.
    fn partition(&self) -> Result<Vec<&'a [SparsePoly<R>]>, AddmulError> {
        let expected: usize = self.term_lengths.iter().sum();
        if expected != self.factors.len() {
            return Err(AddmulError::TermLengthMismatch {
                expected,
                actual: self.factors.len(),
            });
        }

        for (index, factor) in self.factors.iter().enumerate() {
            if *factor.layout() != self.layout {
                return Err(AddmulError::LayoutMismatch { index });
            }
            if factor.order() != self.order {
                return Err(AddmulError::OrderMismatch {
                    index,
                    expected: self.order,
                    found: factor.order(),
                });
            }
        }

        let mut inputs = Vec::with_capacity(self.term_lengths.len());
        let mut start = 0;
        for (term, &len) in self.term_lengths.iter().enumerate() {
            if len == 0 {
                return Err(AddmulError::EmptyTerm { term });
            }
            let group = &self.factors[start..start + len];
            start += len;

            if group.iter().any(SparsePoly::is_zero) {
                tracing::debug!(term, "dropping term with a zero factor");
                continue;
            }
            self.check_term(term, group)?;
            inputs.push(group);
        }

        Ok(inputs)
    }

    /// Rejects terms whose product exponents or multi-index space overflow.
    fn check_term(&self, term: usize, group: &[SparsePoly<R>]) -> Result<(), AddmulError> {
        for var in 0..self.layout.num_vars() {
            let degree: u64 = group.iter().map(|f| u64::from(f.max_exponent(var))).sum();
            if degree > u64::from(self.layout.max_exponent()) {
                return Err(AddmulError::ExponentOverflow {
                    term,
                    var,
                    degree,
                    bits: self.layout.bits(),
                });
            }
        }

        let combinations = group
            .iter()
            .try_fold(1u64, |acc, f| acc.checked_mul(f.len() as u64));
        match combinations {
            Some(n) if n <= MAX_COMBINATIONS => Ok(()),
            _ => Err(AddmulError::TermTooLarge { term }),
        }
    }
}

/// Computes `Σ_i B_{i,1} · … · B_{i,k_i}` into `output`.
///
/// The monomial width and ordering are taken from `output`, whose previous
/// terms are discarded. Returns the number of terms in the result.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, `term_lengths` does
/// not partition `factors`, or the factors disagree with `output` on
/// layout or ordering.
pub fn sum_of_products<R>(
    output: &mut SparsePoly<R>,
    factors: &[SparsePoly<R>],
    term_lengths: &[usize],
    config: &AddmulConfig,
    pool: Option<&ThreadPool>,
) -> Result<usize, AddmulError>
where
    R: Ring + Send + Sync,
{
    let mut job = SumOfProducts::new(factors, term_lengths, *output.layout(), output.order())
        .config(config.clone());
    if let Some(pool) = pool {
        job = job.pool(pool);
    }

    output.clear();
    let report = job.run_into(output)?;
    Ok(report.terms_emitted)
}
