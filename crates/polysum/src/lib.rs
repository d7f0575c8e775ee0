//! # polysum
//!
//! Sparse multivariate polynomials over arbitrary-precision integers, with
//! a parallel engine for sums of products.
//!
//! ## Crates
//!
//! - **`polysum-integers`**: big integers backed by `dashu`
//! - **`polysum-rings`**: the [`Ring`](rings::Ring) trait and the integer ring
//! - **`polysum-poly`**: packed monomials, orderings and sorted sparse polynomials
//! - **`polysum-addmul`**: `Σ_i B_{i,1} · … · B_{i,k_i}` on a worker pool
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use polysum::prelude::*;
//!
//! let layout = MonomialLayout::new(2, 16);
//! let x = SparsePoly::<Z>::var(0, layout, MonomialOrder::Grevlex);
//! let y = SparsePoly::<Z>::var(1, layout, MonomialOrder::Grevlex);
//!
//! // x·y + y·x
//! let factors = [x.clone(), y.clone(), y, x];
//! let sum = SumOfProducts::new(&factors, &[2, 2], layout, MonomialOrder::Grevlex).compute()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use polysum_addmul as addmul;
pub use polysum_integers as integers;
pub use polysum_poly as poly;
pub use polysum_rings as rings;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use polysum_addmul::{
        sum_of_products, AddmulConfig, AddmulError, FnSink, SumOfProducts, SumReport, TermSink,
    };
    pub use polysum_integers::Integer;
    pub use polysum_poly::{Monomial, MonomialLayout, MonomialOrder, SparsePoly};
    pub use polysum_rings::{Ring, Z};
}
