//! The ring of integers Z.

use num_traits::{One, Zero};
use polysum_integers::Integer;

use crate::traits::Ring;

/// The ring of integers.
///
/// Accumulation goes through `Integer`'s in-place operators, so summing
/// many products into one coefficient reuses its limb buffer.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Z(pub Integer);

impl Z {
    /// Creates a new integer.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(Integer::new(value))
    }
}

impl Ring for Z {
    fn zero() -> Self {
        Self(Integer::zero())
    }

    fn one() -> Self {
        Self(Integer::one())
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    fn is_one(&self) -> bool {
        self.0.is_one()
    }

    fn add_assign(&mut self, rhs: &Self) {
        self.0 += &rhs.0;
    }

    fn mul_ref(&self, rhs: &Self) -> Self {
        Self(&self.0 * &rhs.0)
    }
}

impl std::ops::Add for Z {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Z {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl std::ops::Mul for Z {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl std::ops::Neg for Z {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl From<i64> for Z {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<Integer> for Z {
    fn from(value: Integer) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Z {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
