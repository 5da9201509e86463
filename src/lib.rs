//! MAP-trace inference for probabilistic programs via bandit-guided
//! best-first search.
//!
//! The core loop (§2 of the design): a [`driver`] runs a program
//! expressed in continuation-passing style, consulting and updating a
//! [`bandit`] table at each [`program::Checkpoint::Sample`]; [`backprop`]
//! distributes the terminal log-weight back along the visited
//! [`trace`]; and [`search`] replays the same machinery in best-first
//! mode, using the learned [`belief`]s as an [`heuristic`] to order its
//! [`openlist`]. [`orchestrate::infer_map`] ties the two phases together.
//!
//! A program is never a concrete type here — it is any
//! `Fn(program::Frame<V, S>) -> program::Checkpoint<V, S>` the caller
//! builds by hand-transforming a probabilistic model into CPS. See the
//! `#[cfg(test)]` fixtures in [`orchestrate`], [`search`] and [`driver`]
//! for worked examples.

pub mod backprop;
pub mod bandit;
pub mod belief;
pub mod config;
pub mod driver;
pub mod error;
pub mod heuristic;
pub mod openlist;
pub mod orchestrate;
pub mod program;
pub mod search;
pub mod site;
pub mod trace;

pub use belief::{Belief, EmpiricalNormal, Reward};
pub use config::{InferOptions, OutputFormat, ResultKinds};
pub use error::{Error, Result};
pub use orchestrate::{ResultSink, StdoutSink, infer_map};
pub use program::{Checkpoint, Distribution, Frame, ProgramState, Sample};
pub use site::{SiteId, StaticId};
