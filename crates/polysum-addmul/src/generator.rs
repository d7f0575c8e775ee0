//! Lazy heap multiplication of one product term.
//!
//! A term `B_1 · B_2 · … · B_k` is expanded with Johnson's heap algorithm
//! generalized to `k` factors. Every choice of one position per factor is
//! a *multi-index*, encoded as a single `u64` in mixed radix (factor 0 is
//! the least significant digit). The heap holds the frontier of
//! multi-indices whose monomial may be the next largest; equal monomials
//! share one heap node through a chain of links.
//!
//! A multi-index is pushed only once every predecessor obtained by
//! stepping one factor back has been queued. Predecessors never have a
//! smaller monomial, so the heap top is always the largest monomial not
//! yet emitted, and the `queued` bitmap keeps each multi-index from
//! entering the heap twice.

use std::cmp::Ordering;

use polysum_poly::monomial::add_words;
use polysum_poly::{Monomial, MonomialLayout, MonomialOrder, SparsePoly};
use polysum_rings::Ring;
use smallvec::SmallVec;

use crate::arena::{ChunkedPool, ExponentPool, NIL};

/// Largest multi-index space a single term may span.
///
/// The `queued` bitmap holds one bit per multi-index, so this caps it at
/// 2 GiB.
pub(crate) const MAX_COMBINATIONS: u64 = 1 << 34;

/// Digits of a multi-index, one per factor.
type Digits = SmallVec<[usize; 8]>;

/// A heap entry: one monomial and the chain of multi-indices producing it.
#[derive(Clone, Copy)]
struct HeapNode {
    exps: u32,
    chain: u32,
}

#[derive(Clone, Copy)]
struct ChainLink {
    index: u64,
    next: u32,
}

/// Generates the terms of one product in strictly decreasing order.
pub(crate) struct TermGenerator<'a, R: Ring> {
    factors: &'a [SparsePoly<R>],
    layout: MonomialLayout,
    order: MonomialOrder,
    /// Weight of each factor's digit in the multi-index.
    strides: Vec<u64>,
    heap: Vec<u32>,
    nodes: ChunkedPool<HeapNode>,
    links: ChunkedPool<ChainLink>,
    exps: ExponentPool,
    /// One bit per multi-index that has ever entered the heap.
    queued: Vec<u64>,
    /// Multi-indices popped for the current monomial.
    drained: Vec<u64>,
}

impl<'a, R: Ring> TermGenerator<'a, R> {
    /// Prepares a generator seeded with the product of the leading terms.
    ///
    /// Every factor must be non-zero and the product of the factor lengths
    /// at most [`MAX_COMBINATIONS`]; both are checked before scheduling.
    /// The generator allocates one bit per multi-index up front.
    pub(crate) fn new(factors: &'a [SparsePoly<R>], layout: MonomialLayout, order: MonomialOrder) -> Self {
        debug_assert!(!factors.is_empty());
        debug_assert!(factors.iter().all(|f| !f.is_zero()));

        let mut strides = Vec::with_capacity(factors.len());
        let mut total = 1u64;
        for f in factors {
            strides.push(total);
            total *= f.len() as u64;
        }

        // The frontier never exceeds the sum of the factor lengths by much
        let frontier: usize = factors.iter().map(SparsePoly::len).sum();

        let mut generator = Self {
            factors,
            layout,
            order,
            strides,
            heap: Vec::with_capacity(frontier),
            nodes: ChunkedPool::with_capacity(frontier),
            links: ChunkedPool::with_capacity(frontier),
            exps: ExponentPool::with_capacity(layout.words(), frontier),
            queued: vec![0; total.div_ceil(64) as usize],
            drained: Vec::new(),
        };

        generator.mark_queued(0);
        generator.insert(0);
        generator
    }

    /// Appends up to `max_items` terms to `out`, largest first.
    ///
    /// Returns the number of terms appended. Monomials whose coefficients
    /// cancel to zero are skipped, so a short count means the product is
    /// exhausted and zero means nothing was left at all.
    pub(crate) fn produce_block(&mut self, out: &mut Vec<(Monomial, R)>, max_items: usize) -> usize {
        let mut emitted = 0;

        while emitted < max_items {
            let Some(top) = self.pop_max() else {
                break;
            };

            let monomial = Monomial::from_words(self.exps.slot(self.nodes.get(top).exps));
            self.drained.clear();
            self.drain_node(top);

            // Equal monomials may also sit in other branches of the heap
            while let Some(&next) = self.heap.first() {
                if self.exps.slot(self.nodes.get(next).exps) != monomial.words() {
                    break;
                }
                self.pop_max();
                self.drain_node(next);
            }

            let drained = std::mem::take(&mut self.drained);
            let mut sum: Option<R> = None;
            for &index in &drained {
                let c = self.coefficient(index);
                match &mut sum {
                    Some(acc) => acc.add_assign(&c),
                    None => sum = Some(c),
                }
            }
            for &index in &drained {
                self.push_successors(index);
            }
            self.drained = drained;

            if let Some(c) = sum.filter(|c| !c.is_zero()) {
                debug_assert!(out.last().map_or(true, |(prev, _)| {
                    self.order.greater(prev.words(), monomial.words(), &self.layout)
                }));
                out.push((monomial, c));
                emitted += 1;
            }
        }

        if self.heap.is_empty() {
            debug_assert_eq!(self.nodes.live(), 0);
            debug_assert_eq!(self.links.live(), 0);
            debug_assert_eq!(self.exps.live(), 0);
        }

        emitted
    }

    /// Returns true once every product has been emitted.
    pub(crate) fn is_exhausted(&self) -> bool {
        self.heap.is_empty()
    }

    fn digits(&self, mut index: u64) -> Digits {
        self.factors
            .iter()
            .map(|f| {
                let len = f.len() as u64;
                let d = index % len;
                index /= len;
                d as usize
            })
            .collect()
    }

    fn coefficient(&self, index: u64) -> R {
        let digits = self.digits(index);
        let mut terms = self.factors.iter().zip(&digits).map(|(f, &d)| &f.terms()[d].1);

        let first = terms.next().map_or_else(R::one, Clone::clone);
        terms.fold(first, |acc, c| acc.mul_ref(c))
    }

    fn write_monomial(&mut self, index: u64, slot: u32) {
        let digits = self.digits(index);
        let dst = self.exps.slot_mut(slot);
        dst.fill(0);
        for (f, &d) in self.factors.iter().zip(&digits) {
            add_words(dst, f.terms()[d].0.words());
        }
    }

    #[inline]
    fn is_queued(&self, index: u64) -> bool {
        (self.queued[(index >> 6) as usize] >> (index & 63)) & 1 == 1
    }

    #[inline]
    fn mark_queued(&mut self, index: u64) {
        self.queued[(index >> 6) as usize] |= 1 << (index & 63);
    }

    #[inline]
    fn compare_nodes(&self, a: u32, b: u32) -> Ordering {
        let a = self.exps.slot(self.nodes.get(a).exps);
        let b = self.exps.slot(self.nodes.get(b).exps);
        self.order.compare(a, b, &self.layout)
    }

    /// Queues every successor of `index` whose predecessors are all queued.
    fn push_successors(&mut self, index: u64) {
        let digits = self.digits(index);

        for j in 0..digits.len() {
            if digits[j] + 1 >= self.factors[j].len() {
                continue;
            }
            let next = index + self.strides[j];
            if self.is_queued(next) {
                continue;
            }

            let admissible = (0..digits.len())
                .filter(|&l| l != j && digits[l] > 0)
                .all(|l| self.is_queued(next - self.strides[l]));

            if admissible {
                self.mark_queued(next);
                self.insert(next);
            }
        }
    }

    /// Inserts a multi-index, chaining it onto an equal node on its path.
    fn insert(&mut self, index: u64) {
        let slot = self.exps.alloc();
        self.write_monomial(index, slot);

        let mut pos = self.heap.len();
        while pos > 0 {
            let parent = self.heap[(pos - 1) / 2];
            let parent_exps = self.exps.slot(self.nodes.get(parent).exps);
            match self.order.compare(self.exps.slot(slot), parent_exps, &self.layout) {
                Ordering::Greater => pos = (pos - 1) / 2,
                Ordering::Equal => {
                    let head = self.nodes.get(parent).chain;
                    let link = self.links.alloc(ChainLink { index, next: head });
                    self.nodes.get_mut(parent).chain = link;
                    self.exps.release(slot);
                    return;
                }
                Ordering::Less => break,
            }
        }

        let link = self.links.alloc(ChainLink { index, next: NIL });
        let node = self.nodes.alloc(HeapNode {
            exps: slot,
            chain: link,
        });

        // Shift the ancestors passed over down one level
        let mut hole = self.heap.len();
        self.heap.push(node);
        while hole > pos {
            let parent = (hole - 1) / 2;
            self.heap[hole] = self.heap[parent];
            hole = parent;
        }
        self.heap[hole] = node;
    }

    fn pop_max(&mut self) -> Option<u32> {
        let top = *self.heap.first()?;
        let last = self.heap.pop()?;
        let len = self.heap.len();
        if len == 0 {
            return Some(top);
        }

        let mut hole = 0;
        loop {
            let left = 2 * hole + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.compare_nodes(self.heap[right], self.heap[left]) == Ordering::Greater {
                right
            } else {
                left
            };
            if self.compare_nodes(self.heap[child], last) == Ordering::Greater {
                self.heap[hole] = self.heap[child];
                hole = child;
            } else {
                break;
            }
        }
        self.heap[hole] = last;
        Some(top)
    }

    /// Moves a popped node's multi-indices into `drained` and frees its storage.
    fn drain_node(&mut self, node: u32) {
        let HeapNode { exps, chain } = *self.nodes.get(node);
        let mut link = chain;
        while link != NIL {
            let ChainLink { index, next } = *self.links.get(link);
            self.drained.push(index);
            self.links.release(link);
            link = next;
        }
        self.exps.release(exps);
        self.nodes.release(node);
    }
}
