//! The shared coordinator every worker runs.
//!
//! All cross-thread state lives behind one mutex: the term control blocks,
//! the rings, the parked generators and the merge engine. A worker picks
//! its next job while holding the lock, then releases it to either drive
//! the merge or generate one block. The merge engine and a term's
//! generator are moved out of the shared state while in use, so there is
//! at most one merge driver and one generator per term.

use parking_lot::{Condvar, Mutex, MutexGuard};
use polysum_poly::{MonomialLayout, MonomialOrder, SparsePoly};
use polysum_rings::Ring;
use rayon::ThreadPool;

use crate::config::AddmulConfig;
use crate::control::{Block, Ownership, TermControl, TermRing, TermStats, WorkerId};
use crate::generator::TermGenerator;
use crate::merge::{BlockFeed, MergeEngine};
use crate::sink::TermSink;

/// The merge engine together with the sink it writes to.
struct Merger<'a, R, S> {
    engine: MergeEngine<R>,
    sink: &'a mut S,
}

struct Schedule<'a, R: Ring, S> {
    inputs: Vec<&'a [SparsePoly<R>]>,
    controls: Vec<TermControl>,
    rings: Vec<TermRing<R>>,
    generators: Vec<Option<Box<TermGenerator<'a, R>>>>,
    merger: Option<Merger<'a, R, S>>,
    driver: Option<WorkerId>,
}

impl<'a, R: Ring, S> Schedule<'a, R, S> {
    fn all_done(&self) -> bool {
        self.merger
            .as_ref()
            .is_some_and(|m| m.engine.is_finished())
    }

    /// True if the merge engine is at rest and every stalled leaf can be resolved.
    fn able_to_merge(&self) -> bool {
        let Some(merger) = &self.merger else {
            return false;
        };
        !merger.engine.is_finished()
            && merger
                .engine
                .stalled_terms()
                .all(|t| self.rings[t].has_data() || self.controls[t].is_exhausted())
    }

    /// The idle term with the least unconsumed output that still has ring space.
    fn most_starved(&self) -> Option<usize> {
        self.controls
            .iter()
            .enumerate()
            .filter(|(t, c)| c.is_idle() && self.rings[*t].has_free_slot())
            .min_by_key(|(_, c)| c.backlog())
            .map(|(t, _)| t)
    }

    fn anyone_busy(&self) -> bool {
        self.driver.is_some()
            || self
                .controls
                .iter()
                .any(|c| matches!(c.ownership, Ownership::Owned(_)))
    }

    /// Records a generated block and releases the term.
    fn finish_block(
        &mut self,
        term: usize,
        generator: Box<TermGenerator<'a, R>>,
        block: Block<R>,
        produced: usize,
        block_size: usize,
    ) {
        let control = &mut self.controls[term];
        control.generated += produced;

        if produced > 0 {
            self.rings[term].push_full(block);
        } else {
            self.rings[term].recycle(block);
        }

        if produced < block_size {
            debug_assert!(generator.is_exhausted());
            control.ownership = Ownership::Exhausted;
            tracing::debug!(term, generated = control.generated, "term exhausted");
        } else {
            control.ownership = Ownership::Idle;
            self.generators[term] = Some(generator);
        }
    }
}

/// Coordinates the worker pool for one sum of products.
pub(crate) struct Coordinator<'a, R: Ring, S> {
    state: Mutex<Schedule<'a, R, S>>,
    wake: Condvar,
    layout: MonomialLayout,
    order: MonomialOrder,
    block_size: usize,
}

impl<'a, R, S> Coordinator<'a, R, S>
where
    R: Ring + Send + Sync,
    S: TermSink<R> + Send,
{
    pub(crate) fn new(
        inputs: Vec<&'a [SparsePoly<R>]>,
        layout: MonomialLayout,
        order: MonomialOrder,
        config: &AddmulConfig,
        sink: &'a mut S,
    ) -> Self {
        let terms = inputs.len();
        let schedule = Schedule {
            controls: (0..terms).map(|_| TermControl::new()).collect(),
            rings: (0..terms)
                .map(|_| TermRing::new(config.num_blocks, config.block_size))
                .collect(),
            generators: (0..terms).map(|_| None).collect(),
            merger: Some(Merger {
                engine: MergeEngine::new(terms, layout, order),
                sink,
            }),
            driver: None,
            inputs,
        };

        Self {
            state: Mutex::new(schedule),
            wake: Condvar::new(),
            layout,
            order,
            block_size: config.block_size,
        }
    }

    /// Runs the scheduler loop on the calling thread and every pool thread.
    pub(crate) fn run(&self, pool: Option<&ThreadPool>) {
        match pool {
            Some(pool) => pool.in_place_scope(|scope| {
                for worker in 1..=pool.current_num_threads() {
                    scope.spawn(move |_| self.run_worker(WorkerId(worker)));
                }
                self.run_worker(WorkerId(0));
            }),
            None => self.run_worker(WorkerId(0)),
        }
    }

    /// Returns the emitted term count and the final per-term counters.
    pub(crate) fn into_report(self) -> (usize, Vec<TermStats>) {
        let state = self.state.into_inner();
        debug_assert!(state.all_done());
        let emitted = state.merger.as_ref().map_or(0, |m| m.engine.emitted());
        let stats = state.controls.iter().map(TermControl::stats).collect();
        (emitted, stats)
    }

    fn run_worker(&self, id: WorkerId) {
        let mut state = self.state.lock();

        loop {
            if state.all_done() {
                break;
            }

            if state.driver.is_none() && state.able_to_merge() {
                if let Some(mut merger) = state.merger.take() {
                    state.driver = Some(id);
                    let outcome = MutexGuard::unlocked(&mut state, || {
                        let Merger { engine, sink } = &mut merger;
                        engine.merge_step(&mut **sink, self)
                    });
                    tracing::trace!(worker = id.0, ?outcome, emitted = merger.engine.emitted(), "merge burst");

                    state.merger = Some(merger);
                    state.driver = None;
                    self.wake.notify_all();
                    continue;
                }
            }

            if let Some(term) = state.most_starved() {
                self.generate(&mut state, term, id);
                self.wake.notify_all();
                continue;
            }

            // Nothing runnable: someone else must be busy or the sum is done
            let busy = state.anyone_busy();
            debug_assert!(busy, "scheduler has no runnable work but is not done");
            if !busy {
                tracing::error!(worker = id.0, "scheduler stalled with no busy worker");
                break;
            }
            self.wake.wait(&mut state);
        }
    }

    /// Generates one block of `term` with the lock released.
    fn generate(&self, state: &mut MutexGuard<'_, Schedule<'a, R, S>>, term: usize, id: WorkerId) {
        state.controls[term].ownership = Ownership::Owned(id);
        let parked = state.generators[term].take();
        let mut block = state.rings[term].take_spare();
        let factors = state.inputs[term];
        let (layout, order, block_size) = (self.layout, self.order, self.block_size);

        let (generator, produced) = MutexGuard::unlocked(state, || {
            let mut generator =
                parked.unwrap_or_else(|| Box::new(TermGenerator::new(factors, layout, order)));
            let produced = generator.produce_block(&mut block, block_size);
            (generator, produced)
        });
        tracing::trace!(worker = id.0, term, produced, "generated block");

        state.finish_block(term, generator, block, produced, block_size);
    }
}

impl<'a, R, S> BlockFeed<R> for Coordinator<'a, R, S>
where
    R: Ring + Send + Sync,
    S: TermSink<R> + Send,
{
    fn feed(&self, engine: &mut MergeEngine<R>) -> bool {
        let mut state = self.state.lock();
        let Schedule { rings, controls, .. } = &mut *state;
        let (taken, changed) = engine.refill(rings, controls);

        for t in 0..controls.len() {
            if controls[t].is_exhausted() && controls[t].output == controls[t].generated {
                rings[t].release();
            }
        }
        drop(state);

        // Freed ring slots let sleeping generators resume
        if taken > 0 {
            self.wake.notify_all();
        }
        changed
    }
}
