//! Tournament merge of the term streams.
//!
//! One leaf per term holds the block currently being read. Internal nodes
//! record the winning leaf of their subtree. A leaf is either at a valid
//! position, ended, or stalled waiting for its next block; a stalled leaf
//! beats everything, so a stalled root means the maximum cannot be decided
//! yet and the merge yields.

use polysum_poly::{Monomial, MonomialLayout, MonomialOrder};
use polysum_rings::Ring;

use crate::control::{Block, TermControl, TermRing};
use crate::sink::TermSink;

/// Read position of one merge leaf.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Cursor {
    At(usize),
    Ended,
    Stalled,
}

/// Why a merge burst returned.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum MergeOutcome {
    /// Every term has been merged and the sink has seen every output term.
    Finished,
    /// A leaf the maximum depends on is waiting for data.
    NeedData,
}

/// Source of blocks for stalled leaves.
pub(crate) trait BlockFeed<R> {
    /// Hands available blocks to stalled leaves.
    ///
    /// Returns true if any leaf changed state.
    fn feed(&self, engine: &mut MergeEngine<R>) -> bool;
}

pub(crate) struct MergeEngine<R> {
    terms: usize,
    width: usize,
    cursors: Vec<Cursor>,
    blocks: Vec<Block<R>>,
    /// `tree[p]` is the winning leaf below internal node `p`; `tree[0]` is unused.
    tree: Vec<u32>,
    consumed: Vec<usize>,
    /// Monomial being summed and its partial coefficient.
    pending: Option<(Monomial, R)>,
    emitted: usize,
    layout: MonomialLayout,
    order: MonomialOrder,
}

impl<R: Ring> MergeEngine<R> {
    /// Creates an engine for `terms` streams, every real leaf stalled.
    pub(crate) fn new(terms: usize, layout: MonomialLayout, order: MonomialOrder) -> Self {
        let width = terms.max(1).next_power_of_two();
        let cursors = (0..width)
            .map(|t| if t < terms { Cursor::Stalled } else { Cursor::Ended })
            .collect();

        let mut engine = Self {
            terms,
            width,
            cursors,
            blocks: (0..terms).map(|_| Vec::new()).collect(),
            tree: vec![0; width],
            consumed: vec![0; terms],
            pending: None,
            emitted: 0,
            layout,
            order,
        };
        engine.rebuild();
        engine
    }

    /// Number of output terms handed to the sink so far.
    pub(crate) fn emitted(&self) -> usize {
        self.emitted
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.cursors[self.root()] == Cursor::Ended
    }

    /// Terms whose leaf is waiting for a block.
    pub(crate) fn stalled_terms(&self) -> impl Iterator<Item = usize> + '_ {
        self.cursors[..self.terms]
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cursor::Stalled)
            .map(|(t, _)| t)
    }

    /// Moves queued blocks into stalled leaves and syncs output counters.
    ///
    /// Returns the number of blocks taken and whether any leaf changed.
    pub(crate) fn refill(&mut self, rings: &mut [TermRing<R>], controls: &mut [TermControl]) -> (usize, bool) {
        let mut taken = 0;
        let mut changed = false;

        for t in 0..self.terms {
            let control = &mut controls[t];
            control.output = self.consumed[t];

            if self.cursors[t] == Cursor::Stalled {
                if let Some(block) = rings[t].pop_full() {
                    control.transferred += block.len();
                    let drained = std::mem::replace(&mut self.blocks[t], block);
                    rings[t].recycle(drained);
                    self.cursors[t] = Cursor::At(0);
                    taken += 1;
                    changed = true;
                } else if control.is_exhausted() {
                    debug_assert_eq!(control.output, control.generated);
                    self.blocks[t] = Vec::new();
                    self.cursors[t] = Cursor::Ended;
                    changed = true;
                }
            }
            control.debug_check();
        }

        if changed {
            self.rebuild();
        }
        (taken, changed)
    }

    /// Runs the merge until it finishes or needs a block nobody has produced.
    pub(crate) fn merge_step<S, F>(&mut self, sink: &mut S, feed: &F) -> MergeOutcome
    where
        S: TermSink<R> + ?Sized,
        F: BlockFeed<R> + ?Sized,
    {
        loop {
            let leaf = self.root();
            match self.cursors[leaf] {
                Cursor::Ended => {
                    self.flush(sink);
                    return MergeOutcome::Finished;
                }
                Cursor::Stalled => {
                    if !feed.feed(self) {
                        return MergeOutcome::NeedData;
                    }
                }
                Cursor::At(pos) => {
                    self.consume(leaf, pos, sink);
                    self.replay(leaf);
                }
            }
        }
    }

    /// Folds the head of `leaf` into the pending sum and advances the leaf.
    fn consume<S: TermSink<R> + ?Sized>(&mut self, leaf: usize, pos: usize, sink: &mut S) {
        let entry = &mut self.blocks[leaf][pos];

        match &mut self.pending {
            Some((monomial, acc)) if *monomial == entry.0 => acc.add_assign(&entry.1),
            pending => {
                let monomial = std::mem::take(&mut entry.0);
                let coeff = std::mem::replace(&mut entry.1, R::zero());
                if let Some((prev, sum)) = pending.replace((monomial, coeff)) {
                    debug_assert!(pending.as_ref().map_or(true, |(m, _)| {
                        self.order.greater(prev.words(), m.words(), &self.layout)
                    }));
                    if !sum.is_zero() {
                        sink.accept(prev, sum);
                        self.emitted += 1;
                    }
                }
            }
        }

        self.consumed[leaf] += 1;
        self.cursors[leaf] = if pos + 1 < self.blocks[leaf].len() {
            Cursor::At(pos + 1)
        } else {
            Cursor::Stalled
        };
    }

    fn flush<S: TermSink<R> + ?Sized>(&mut self, sink: &mut S) {
        if let Some((monomial, sum)) = self.pending.take() {
            if !sum.is_zero() {
                sink.accept(monomial, sum);
                self.emitted += 1;
            }
        }
    }

    fn root(&self) -> usize {
        self.winner_at(1)
    }

    #[inline]
    fn winner_at(&self, pos: usize) -> usize {
        if pos >= self.width {
            pos - self.width
        } else {
            self.tree[pos] as usize
        }
    }

    /// Picks the leaf that must be looked at first.
    fn better(&self, a: usize, b: usize) -> usize {
        match (self.cursors[a], self.cursors[b]) {
            (Cursor::Stalled, _) | (_, Cursor::Ended) => a,
            (_, Cursor::Stalled) | (Cursor::Ended, _) => b,
            (Cursor::At(i), Cursor::At(j)) => {
                let ma = self.blocks[a][i].0.words();
                let mb = self.blocks[b][j].0.words();
                if self.order.greater(mb, ma, &self.layout) {
                    b
                } else {
                    a
                }
            }
        }
    }

    fn rebuild(&mut self) {
        for pos in (1..self.width).rev() {
            self.tree[pos] = self.better(self.winner_at(2 * pos), self.winner_at(2 * pos + 1)) as u32;
        }
    }

    fn replay(&mut self, leaf: usize) {
        let mut pos = (self.width + leaf) / 2;
        while pos >= 1 {
            self.tree[pos] = self.better(self.winner_at(2 * pos), self.winner_at(2 * pos + 1)) as u32;
            pos /= 2;
        }
    }
}
