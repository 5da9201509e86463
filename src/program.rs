//! Consumer-facing interfaces: `Distribution`, `ProgramState`, `Frame`, and
//! the `Checkpoint` CPS boundary a program is expressed through (§6, §9).
//!
//! A `program` is never a concrete type in this crate — it is a closure
//! `Fn(Frame<V, S>) -> Checkpoint<V, S>` that the caller builds, typically by
//! hand-transforming a small probabilistic model into continuation-passing
//! style. The driver (`driver.rs`) and the search engine (`search.rs`) are
//! the only two things that ever call into it.

use std::hash::Hash;
use std::rc::Rc;

use rand::rngs::SmallRng;

use crate::bandit::BanditTable;
use crate::belief::Reward;
use crate::site::{SiteId, StaticId};
use crate::trace::Trace;

/// A distribution over values of type `V`: the thing a `Sample` checkpoint
/// pauses on. `log_density` must return `NaN` rather than panic on values
/// outside the distribution's support — the driver and search engine both
/// treat a `NaN` density as an ordinary (if terminal-for-that-branch)
/// outcome, not a programmer error (§7, `InvalidHeuristic`/`InvalidTrace`).
pub trait Distribution<V> {
    /// Draw a fresh value from the prior.
    fn sample(&self, rng: &mut SmallRng) -> V;
    /// Log-density of `value` under this distribution.
    fn log_density(&self, value: &V) -> Reward;
}

/// The program-specific payload threaded through a run. The engine owns
/// everything else (bandits, trace) via `Frame`; a caller's `ProgramState`
/// only needs to track the running log-weight.
///
/// `Default` doubles as "the empty state" of §3: a fresh pass and the state
/// `backpropagate` returns both start from `S::default()`.
pub trait ProgramState: Clone + Default {
    /// The program's accumulated log-joint-density so far.
    fn log_weight(&self) -> Reward;
    /// Add `delta` to the accumulated log-weight.
    fn add_log_weight(&mut self, delta: Reward);
}

/// The opaque container the execution driver threads through a run: the
/// caller's own `ProgramState`, plus the two fields the core manages on its
/// behalf (§3).
#[derive(Debug, Clone)]
pub struct Frame<V, S> {
    state: S,
    pub bandits: BanditTable<V>,
    pub trace: Trace<V>,
}

impl<V, S> Frame<V, S>
where
    V: Clone + Eq + Hash,
    S: ProgramState,
{
    /// The empty frame: no bandits, no trace, a fresh program state.
    /// Used to seed `begin_state` at the start of each pass (§4.9).
    pub fn new() -> Self {
        Self {
            state: S::default(),
            bandits: BanditTable::new(),
            trace: Trace::new(),
        }
    }

    pub fn log_weight(&self) -> Reward {
        self.state.log_weight()
    }

    pub fn add_log_weight(&mut self, delta: Reward) {
        self.state.add_log_weight(delta);
    }

    /// The site id for `static_id` given the occurrences already recorded
    /// in this frame's trace (§4.3).
    pub fn site_id(&self, static_id: StaticId) -> SiteId {
        SiteId::next(static_id, &self.trace)
    }
}

impl<V, S> Default for Frame<V, S>
where
    V: Clone + Eq + Hash,
    S: ProgramState,
{
    fn default() -> Self {
        Self::new()
    }
}

/// A paused random choice: the distribution it was drawn from, the lexical
/// id of the choice site, the frame as of the pause, and a continuation to
/// resume with a chosen `(value, frame)`.
///
/// The continuation is `Rc`, not `Box<dyn FnOnce>`: the search engine must
/// invoke the *same* continuation once per arm with a different
/// `(value, frame)` pair (§4.8), and an `FnOnce` fan-out cannot do that.
/// Learning mode only ever calls it once, but pays the same (cheap) `Rc`
/// clone-and-call cost for uniformity.
pub struct Sample<V, S> {
    pub distribution: Box<dyn Distribution<V>>,
    pub static_id: StaticId,
    pub frame: Frame<V, S>,
    pub continuation: Rc<dyn Fn(V, Frame<V, S>) -> Checkpoint<V, S>>,
}

/// The two checkpoint kinds a program can pause on (§9): a `Sample` point
/// awaiting a value, or a `Result` terminal carrying the finished frame.
pub enum Checkpoint<V, S> {
    Sample(Sample<V, S>),
    Result(Frame<V, S>),
}

impl<V, S> Checkpoint<V, S> {
    /// Convenience constructor for a `Sample` checkpoint, so program
    /// authors don't need to name the `Sample` struct at call sites.
    pub fn sample(
        distribution: impl Distribution<V> + 'static,
        static_id: impl Into<StaticId>,
        frame: Frame<V, S>,
        continuation: impl Fn(V, Frame<V, S>) -> Checkpoint<V, S> + 'static,
    ) -> Self {
        Checkpoint::Sample(Sample {
            distribution: Box::new(distribution),
            static_id: static_id.into(),
            frame,
            continuation: Rc::new(continuation),
        })
    }

    /// Convenience constructor for a `Result` checkpoint.
    pub fn result(frame: Frame<V, S>) -> Self {
        Checkpoint::Result(frame)
    }
}
