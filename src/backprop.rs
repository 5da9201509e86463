//! Backpropagation (C6, §4.5): distributes a run's terminal log-weight back
//! to the bandits along the visited trace.

use std::hash::Hash;

use crate::program::{Frame, ProgramState};

/// Walks `frame`'s trace in order, updating `bandits[site]` with the future
/// reward `R - past_reward` for every entry. Returns a fresh frame holding
/// only the updated bandit table: trace is emptied and the program state is
/// reset to `S::default()` (§3, §4.5).
///
/// Callers must never invoke this with a `NaN` terminal log-weight — §4.5
/// requires the run be discarded instead, which is an orchestration-level
/// decision (`orchestrate::infer_map`), not this function's.
pub fn backpropagate<V, S>(frame: Frame<V, S>) -> Frame<V, S>
where
    V: Clone + Eq + Hash,
    S: ProgramState,
{
    let reward = frame.log_weight();
    debug_assert!(
        !reward.is_nan(),
        "backpropagate must never be called on a NaN terminal log-weight"
    );

    let Frame {
        mut bandits, trace, ..
    } = frame;

    for entry in trace.iter() {
        bandits.record(entry.site.clone(), entry.value.clone(), reward - entry.past_reward);
    }

    let mut fresh = Frame::new();
    fresh.bandits = bandits;
    fresh
}
