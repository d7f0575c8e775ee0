//! Algebraic structure traits.

use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

/// A commutative ring with identity.
///
/// # Laws
///
/// - Addition is associative and commutative with identity `zero()`
/// - Multiplication is associative and commutative with identity `one()`
/// - Multiplication distributes over addition
/// - Every element has an additive inverse (`neg`)
pub trait Ring:
    Clone + Eq + Debug + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> + Neg<Output = Self>
{
    /// The additive identity.
    fn zero() -> Self;

    /// The multiplicative identity.
    fn one() -> Self;

    /// Returns true if this is the additive identity.
    fn is_zero(&self) -> bool;

    /// Returns true if this is the multiplicative identity.
    fn is_one(&self) -> bool;

    /// Adds `rhs` into `self`.
    ///
    /// Accumulators call this once per contributing term, so rings
    /// backed by heap storage should override it to reuse `self`.
    fn add_assign(&mut self, rhs: &Self) {
        let lhs = std::mem::replace(self, Self::zero());
        *self = lhs + rhs.clone();
    }

    /// Multiplies two elements without consuming either.
    #[must_use]
    fn mul_ref(&self, rhs: &Self) -> Self {
        self.clone() * rhs.clone()
    }

    /// Computes self^n for non-negative n.
    #[must_use]
    fn pow(&self, n: u32) -> Self {
        let mut result = Self::one();
        let mut base = self.clone();
        let mut exp = n;

        while exp > 0 {
            if exp & 1 == 1 {
                result = result.mul_ref(&base);
            }
            base = base.mul_ref(&base);
            exp >>= 1;
        }

        result
    }
}
