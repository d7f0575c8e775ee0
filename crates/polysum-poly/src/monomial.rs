//! Bit-packed monomials for efficient multivariate polynomial arithmetic.
//!
//! A monomial is a fixed number of `u64` words determined by its
//! [`MonomialLayout`]. Each exponent occupies `bits` bits; variable 0 sits
//! in the most significant field of word 0 and unused low bits stay zero.

use std::cmp::Ordering;

use smallvec::SmallVec;

/// Inline word capacity before a monomial spills to the heap.
const INLINE_WORDS: usize = 2;

/// The packing of exponent vectors into words.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MonomialLayout {
    num_vars: usize,
    bits: u32,
}

impl MonomialLayout {
    /// Creates a layout for `num_vars` variables with `bits` bits per exponent.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is not in `1..=32`.
    #[must_use]
    pub fn new(num_vars: usize, bits: u32) -> Self {
        assert!((1..=32).contains(&bits), "exponent width must be 1..=32 bits");
        Self { num_vars, bits }
    }

    /// Returns the number of variables.
    #[must_use]
    pub const fn num_vars(&self) -> usize {
        self.num_vars
    }

    /// Returns the exponent width in bits.
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Returns the largest exponent a single field can hold.
    #[must_use]
    pub const fn max_exponent(&self) -> u32 {
        ((1u64 << self.bits) - 1) as u32
    }

    /// Returns how many exponent fields share one word.
    #[must_use]
    pub const fn fields_per_word(&self) -> usize {
        (64 / self.bits) as usize
    }

    /// Returns the number of words per monomial (at least one).
    #[must_use]
    pub const fn words(&self) -> usize {
        let per = self.fields_per_word();
        let words = self.num_vars.div_ceil(per);
        if words == 0 {
            1
        } else {
            words
        }
    }

    /// Returns `(word, shift)` locating variable `i`.
    #[inline]
    const fn locate(&self, i: usize) -> (usize, u32) {
        let per = self.fields_per_word();
        let slot = (i % per) as u32;
        (i / per, 64 - self.bits * (slot + 1))
    }

    #[inline]
    const fn mask(&self) -> u64 {
        (1u64 << self.bits) - 1
    }

    /// Reads the exponent of variable `i` out of packed words.
    #[inline]
    #[must_use]
    pub fn read(&self, words: &[u64], i: usize) -> u32 {
        let (w, shift) = self.locate(i);
        ((words[w] >> shift) & self.mask()) as u32
    }

    /// Sums all exponents of packed words.
    #[must_use]
    pub fn total_degree(&self, words: &[u64]) -> u64 {
        (0..self.num_vars).map(|i| u64::from(self.read(words, i))).sum()
    }
}

/// A bit-packed monomial.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Monomial(SmallVec<[u64; INLINE_WORDS]>);

impl Monomial {
    /// Creates the monomial 1 (all exponents zero).
    #[must_use]
    pub fn one(layout: &MonomialLayout) -> Self {
        Self(SmallVec::from_elem(0, layout.words()))
    }

    /// Creates the monomial x_i.
    #[must_use]
    pub fn var(i: usize, layout: &MonomialLayout) -> Self {
        assert!(i < layout.num_vars());
        let mut m = Self::one(layout);
        let (w, shift) = layout.locate(i);
        m.0[w] = 1 << shift;
        m
    }

    /// Creates a monomial from exponents.
    ///
    /// # Panics
    ///
    /// Panics if the exponent count differs from the layout or an
    /// exponent does not fit its field.
    #[must_use]
    pub fn from_exponents(exps: &[u32], layout: &MonomialLayout) -> Self {
        assert_eq!(exps.len(), layout.num_vars());

        let mut m = Self::one(layout);
        for (i, &e) in exps.iter().enumerate() {
            assert!(e <= layout.max_exponent(), "exponent {e} overflows {} bits", layout.bits());
            let (w, shift) = layout.locate(i);
            m.0[w] |= u64::from(e) << shift;
        }
        m
    }

    /// Wraps already packed words.
    #[must_use]
    pub fn from_words(words: &[u64]) -> Self {
        Self(SmallVec::from_slice(words))
    }

    /// Returns the packed words.
    #[must_use]
    pub fn words(&self) -> &[u64] {
        &self.0
    }

    /// Returns the exponent of variable i.
    #[must_use]
    pub fn exponent(&self, i: usize, layout: &MonomialLayout) -> u32 {
        layout.read(&self.0, i)
    }

    /// Returns all exponents.
    #[must_use]
    pub fn exponents(&self, layout: &MonomialLayout) -> Vec<u32> {
        (0..layout.num_vars()).map(|i| self.exponent(i, layout)).collect()
    }

    /// Multiplies two monomials (adds exponents).
    ///
    /// Callers must ensure no exponent field overflows.
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        let mut out = self.clone();
        add_words(&mut out.0, &other.0);
        out
    }

    /// Computes the total degree.
    #[must_use]
    pub fn total_degree(&self, layout: &MonomialLayout) -> u64 {
        layout.total_degree(&self.0)
    }

    /// Converts to a human-readable string.
    #[must_use]
    pub fn to_string(&self, layout: &MonomialLayout) -> String {
        let vars = ['x', 'y', 'z', 'w', 'u', 'v'];
        let mut parts = Vec::new();

        for i in 0..layout.num_vars() {
            let e = self.exponent(i, layout);
            if e > 0 {
                let var_name = if i < vars.len() {
                    vars[i].to_string()
                } else {
                    format!("x{i}")
                };

                if e == 1 {
                    parts.push(var_name);
                } else {
                    parts.push(format!("{var_name}^{e}"));
                }
            }
        }

        if parts.is_empty() {
            "1".to_string()
        } else {
            parts.join("*")
        }
    }
}

/// Adds packed exponents of `src` into `dst` word by word.
#[inline]
pub fn add_words(dst: &mut [u64], src: &[u64]) {
    debug_assert_eq!(dst.len(), src.len());
    for (d, s) in dst.iter_mut().zip(src) {
        *d = d.wrapping_add(*s);
    }
}

/// Compares two packed monomials lexicographically.
#[must_use]
pub fn cmp_lex(a: &[u64], b: &[u64]) -> Ordering {
    // Most-significant-first packing makes lex a plain slice comparison
    a.cmp(b)
}

/// Compares two packed monomials by graded lexicographic order.
#[must_use]
pub fn cmp_grlex(a: &[u64], b: &[u64], layout: &MonomialLayout) -> Ordering {
    match layout.total_degree(a).cmp(&layout.total_degree(b)) {
        Ordering::Equal => cmp_lex(a, b),
        ord => ord,
    }
}

/// Compares two packed monomials by graded reverse lexicographic order.
#[must_use]
pub fn cmp_grevlex(a: &[u64], b: &[u64], layout: &MonomialLayout) -> Ordering {
    match layout.total_degree(a).cmp(&layout.total_degree(b)) {
        Ordering::Equal => {}
        ord => return ord,
    }

    for i in (0..layout.num_vars()).rev() {
        match layout.read(b, i).cmp(&layout.read(a, i)) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    Ordering::Equal
}
