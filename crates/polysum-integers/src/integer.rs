//! Arbitrary precision integers.
//!
//! This module provides a wrapper around `dashu::IBig` with the
//! operations needed by sparse polynomial multiplication.

use dashu::base::Signed as DashuSigned;
use dashu::integer::IBig;
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub};

/// An arbitrary precision integer.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Integer(IBig);

impl Integer {
    /// Creates a new integer from an i64.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(IBig::from(value))
    }

    /// Creates an integer from a string in the given base.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid integer.
    pub fn from_str_radix(s: &str, radix: u32) -> Result<Self, dashu::base::error::ParseError> {
        IBig::from_str_radix(s, radix).map(Self)
    }

    /// Returns the sign: -1, 0, or 1.
    #[must_use]
    pub fn signum(&self) -> i8 {
        if self.0.is_zero() {
            0
        } else if DashuSigned::is_positive(&self.0) {
            1
        } else {
            -1
        }
    }

    /// Negates in place without reallocating.
    pub fn negate(&mut self) {
        let value = std::mem::replace(&mut self.0, IBig::ZERO);
        self.0 = -value;
    }

    /// Returns the inner `dashu::IBig`.
    #[must_use]
    pub fn into_inner(self) -> IBig {
        self.0
    }

    /// Returns a reference to the inner `dashu::IBig`.
    #[must_use]
    pub fn as_inner(&self) -> &IBig {
        &self.0
    }

    /// Attempts to convert to an i64.
    ///
    /// Returns `None` if the value doesn't fit in an i64.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.0.clone().try_into().ok()
    }

    /// Computes self^exp for non-negative exp.
    #[must_use]
    pub fn pow(&self, exp: u32) -> Self {
        Self(self.0.pow(exp as usize))
    }
}

impl Zero for Integer {
    fn zero() -> Self {
        Self(IBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Integer {
    fn one() -> Self {
        Self(IBig::ONE)
    }

    fn is_one(&self) -> bool {
        self.0 == IBig::ONE
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Integer({})", self.0)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// Owned operands reuse the left allocation; borrowed ones allocate a result.

impl Add for Integer {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self.0 += rhs.0;
        self
    }
}

impl<'a> Add<&'a Integer> for &'a Integer {
    type Output = Integer;

    fn add(self, rhs: &'a Integer) -> Integer {
        Integer(&self.0 + &rhs.0)
    }
}

impl AddAssign<&Integer> for Integer {
    fn add_assign(&mut self, rhs: &Integer) {
        self.0 += &rhs.0;
    }
}

impl Sub for Integer {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self.0 -= rhs.0;
        self
    }
}

impl Mul for Integer {
    type Output = Self;

    fn mul(mut self, rhs: Self) -> Self {
        self.0 *= rhs.0;
        self
    }
}

impl<'a> Mul<&'a Integer> for &'a Integer {
    type Output = Integer;

    fn mul(self, rhs: &'a Integer) -> Integer {
        Integer(&self.0 * &rhs.0)
    }
}

impl MulAssign<&Integer> for Integer {
    fn mul_assign(&mut self, rhs: &Integer) {
        self.0 *= &rhs.0;
    }
}

impl Neg for Integer {
    type Output = Self;

    fn neg(mut self) -> Self {
        self.negate();
        self
    }
}

impl Neg for &Integer {
    type Output = Integer;

    fn neg(self) -> Integer {
        Integer(-&self.0)
    }
}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<IBig> for Integer {
    fn from(value: IBig) -> Self {
        Self(value)
    }
}
