//! Best-first search engine (C8, §4.8): a lazy, possibly infinite stream of
//! complete traces ordered by discovery (strictly by log-weight only when
//! `K = 0`, §8).

use std::hash::Hash;

use rand::rngs::SmallRng;

use crate::heuristic;
use crate::openlist::OpenList;
use crate::program::{Checkpoint, Frame, ProgramState, Sample};

/// Iterator over terminal frames, expanding the open list one node at a
/// time. Fused: once the open list is exhausted `next()` returns `None`
/// forever (§4.8, "never reached because open list exhausted").
pub struct SearchStream<V, S> {
    open: OpenList<V, S>,
    pending: Option<Checkpoint<V, S>>,
    k: i64,
    rng: SmallRng,
}

impl<V, S> SearchStream<V, S>
where
    V: Clone + Eq + Hash,
    S: ProgramState,
{
    /// Begins a search from `start`, using `k` (`number_of_h_draws`, §4.7)
    /// to weight node costs and `rng` to drive the heuristic's sampling.
    pub fn new(start: Checkpoint<V, S>, k: i64, rng: SmallRng) -> Self {
        Self {
            open: OpenList::new(),
            pending: Some(start),
            k,
            rng,
        }
    }

    /// **expand(sample checkpoint, open-list)** of §4.8: for every
    /// currently-known arm at this site, computes `f` and enqueues a thunk
    /// that resumes the continuation with that arm's value. A site with no
    /// bandit yet (never visited during learning) is a dead end: no
    /// children, the branch simply does not expand further.
    fn expand(&mut self, sample: Sample<V, S>) {
        let Sample {
            distribution,
            static_id,
            frame,
            continuation,
        } = sample;

        let site = frame.site_id(static_id);
        let Some(bandit) = frame.bandits.get(&site) else {
            log::trace!("site {site} has no bandit yet, dead end for this branch");
            return;
        };

        let past_reward = frame.log_weight();
        for (value, belief) in bandit.arms() {
            let mut new_frame = frame.clone();
            new_frame.add_log_weight(distribution.log_density(value));
            new_frame.trace.push(site.clone(), value.clone(), past_reward);

            let h = heuristic::estimate(belief, self.k, &mut self.rng);
            let f = -past_reward + h;

            let value = value.clone();
            let continuation = continuation.clone();
            self.open
                .insert(f, Box::new(move || continuation(value, new_frame)));
        }
    }
}

impl<V, S> Iterator for SearchStream<V, S>
where
    V: Clone + Eq + Hash,
    S: ProgramState,
{
    type Item = Frame<V, S>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut checkpoint = match self.pending.take() {
            Some(checkpoint) => checkpoint,
            None => {
                let (_, thunk) = self.open.pop()?;
                thunk()
            }
        };
        loop {
            match checkpoint {
                Checkpoint::Result(frame) => return Some(frame),
                Checkpoint::Sample(sample) => {
                    self.expand(sample);
                    let (_, thunk) = self.open.pop()?;
                    checkpoint = thunk();
                }
            }
        }
    }
}
