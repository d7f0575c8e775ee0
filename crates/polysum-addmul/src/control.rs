//! Per-term bookkeeping shared under the scheduler lock.
//!
//! Control blocks and rings live apart from the term generators, which
//! are handed to whichever worker currently owns the term.

use std::collections::VecDeque;

use polysum_poly::Monomial;

/// Identifies one scheduler loop; the calling thread is worker 0.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct WorkerId(pub(crate) usize);

/// Who may generate the next block of a term.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Ownership {
    /// Nobody is generating and more terms may follow.
    Idle,
    /// A worker is running `produce_block` outside the lock.
    Owned(WorkerId),
    /// Everything has been generated.
    Exhausted,
}

/// Counters of one term, kept after its generator is dropped.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TermStats {
    /// Terms produced by the generator.
    pub generated: usize,
    /// Terms handed from the ring to the merge engine.
    pub transferred: usize,
    /// Terms consumed by the merge engine.
    pub output: usize,
}

/// Scheduling state of one term.
#[derive(Debug)]
pub(crate) struct TermControl {
    pub(crate) generated: usize,
    pub(crate) transferred: usize,
    pub(crate) output: usize,
    pub(crate) ownership: Ownership,
}

impl TermControl {
    pub(crate) fn new() -> Self {
        Self {
            generated: 0,
            transferred: 0,
            output: 0,
            ownership: Ownership::Idle,
        }
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.ownership == Ownership::Idle
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.ownership == Ownership::Exhausted
    }

    /// Generated terms the merge engine has not yet consumed.
    pub(crate) fn backlog(&self) -> usize {
        self.generated - self.output
    }

    pub(crate) fn debug_check(&self) {
        debug_assert!(self.output <= self.transferred, "{self:?}");
        debug_assert!(self.transferred <= self.generated, "{self:?}");
    }

    pub(crate) fn stats(&self) -> TermStats {
        TermStats {
            generated: self.generated,
            transferred: self.transferred,
            output: self.output,
        }
    }
}

/// A block of generated terms, largest monomial first.
pub(crate) type Block<R> = Vec<(Monomial, R)>;

/// The bounded queue of full blocks between a generator and the merge engine.
///
/// At most `capacity` full blocks wait here; the merge engine holds one
/// more while it reads it. Drained blocks come back as spares so their
/// allocations are reused.
pub(crate) struct TermRing<R> {
    full: VecDeque<Block<R>>,
    spare: Vec<Block<R>>,
    capacity: usize,
    block_size: usize,
}

impl<R> TermRing<R> {
    pub(crate) fn new(capacity: usize, block_size: usize) -> Self {
        Self {
            full: VecDeque::with_capacity(capacity),
            spare: Vec::new(),
            capacity,
            block_size,
        }
    }

    pub(crate) fn has_free_slot(&self) -> bool {
        self.full.len() < self.capacity
    }

    pub(crate) fn has_data(&self) -> bool {
        !self.full.is_empty()
    }

    /// Returns an empty block to fill.
    pub(crate) fn take_spare(&mut self) -> Block<R> {
        self.spare
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(self.block_size))
    }

    pub(crate) fn push_full(&mut self, block: Block<R>) {
        debug_assert!(!block.is_empty());
        debug_assert!(self.has_free_slot());
        self.full.push_back(block);
    }

    pub(crate) fn pop_full(&mut self) -> Option<Block<R>> {
        self.full.pop_front()
    }

    pub(crate) fn recycle(&mut self, mut block: Block<R>) {
        block.clear();
        if self.spare.len() <= self.capacity {
            self.spare.push(block);
        }
    }

    /// Drops every buffered block.
    pub(crate) fn release(&mut self) {
        self.full = VecDeque::new();
        self.spare = Vec::new();
    }
}
