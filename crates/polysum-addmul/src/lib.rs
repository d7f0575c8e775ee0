//! # polysum-addmul
//!
//! Parallel sums of products of sparse multivariate polynomials:
//! `Σ_i B_{i,1} · B_{i,2} · … · B_{i,k_i}`.
//!
//! Each product term is expanded lazily by a heap-based generator that
//! emits its monomials in strictly decreasing order, one fixed-size block
//! at a time. A tournament merge combines the term streams into a single
//! ordered, coefficient-summed output. Workers share one lock and one
//! condition variable and choose their own work: drive the merge, top up
//! the most starved term, or sleep until a ring slot frees up.
//!
//! The result never depends on the number of workers; threading only
//! changes timing.
//!
//! ```rust,ignore
//! use polysum_addmul::{sum_of_products, AddmulConfig};
//!
//! // a·b + c·d·e
//! let factors = [a, b, c, d, e];
//! let mut output = SparsePoly::zero(layout, order);
//! let pool = rayon::ThreadPoolBuilder::new().num_threads(3).build()?;
//! sum_of_products(&mut output, &factors, &[2, 3], &AddmulConfig::default(), Some(&pool))?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod arena;
pub mod config;
mod control;
pub mod error;
mod generator;
mod merge;
mod scheduler;
pub mod sink;
pub mod sum;

#[cfg(test)]
mod proptests;

pub use config::AddmulConfig;
pub use control::TermStats;
pub use error::AddmulError;
pub use sink::{FnSink, TermSink};
pub use sum::{sum_of_products, SumOfProducts, SumReport};
