//! Errors reported before a sum of products is scheduled.

use polysum_poly::MonomialOrder;
use thiserror::Error;

/// Invalid arguments to a sum of products.
///
/// Once validation passes the computation itself cannot fail.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AddmulError {
    /// `block_size` was zero.
    #[error("block size must be at least one term")]
    ZeroBlockSize,

    /// `num_blocks` was zero.
    #[error("each term ring must hold at least one block")]
    ZeroBlocks,

    /// `term_lengths` does not sum to the number of factors.
    #[error("term lengths cover {expected} factors but {actual} were supplied")]
    TermLengthMismatch { expected: usize, actual: usize },

    /// A term was declared with zero factors.
    #[error("term {term} has no factors")]
    EmptyTerm { term: usize },

    /// A factor packs its monomials differently from the output.
    #[error("factor {index} uses a different monomial layout")]
    LayoutMismatch { index: usize },

    /// A factor is sorted by a different monomial ordering.
    #[error("factor {index} is ordered by {found}, expected {expected}")]
    OrderMismatch {
        index: usize,
        expected: MonomialOrder,
        found: MonomialOrder,
    },

    /// A product could exceed the exponent field width.
    #[error("term {term}: exponent of variable {var} reaches {degree}, which overflows {bits} bits")]
    ExponentOverflow {
        term: usize,
        var: usize,
        degree: u64,
        bits: u32,
    },

    /// The product of a term's factor lengths exceeds the expansion limit.
    #[error("term {term} has too many factor combinations to expand")]
    TermTooLarge { term: usize },
}
