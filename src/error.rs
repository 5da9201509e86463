//! Crate-wide error type.
//!
//! Grounded on the small `thiserror`-derived enums used throughout the
//! retrieval pack for library-boundary errors (e.g. `pt-common::Error`,
//! `abathur`'s config errors): one variant per failure kind, no blanket
//! "miscellaneous" catch-all.

use thiserror::Error;

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that can surface from the public API.
///
/// Most of the failure kinds enumerated in the design (invalid trace,
/// invalid heuristic, exhausted search, numerical underflow) are handled
/// internally and never reach the caller — they are absorbed by the
/// orchestration loop or silently clamped. Only configuration mistakes and
/// belief-contract violations are returned as `Error`.
#[derive(Debug, Error)]
pub enum Error {
    /// `InferOptions::validate()` rejected a combination of options.
    #[error("invalid inference options: {reason}")]
    InvalidConfig {
        /// Human-readable description of what was wrong.
        reason: String,
    },

    /// A belief was sampled while its observation count was zero.
    ///
    /// This is a programmer error: only a bandit's `new_arm_belief` may be
    /// compared against while empty (and that comparison always loses, see
    /// `bandit::select_arm`), never sampled and used directly. Kept as a
    /// variant so a future `Belief` implementor that violates the contract
    /// fails loudly instead of producing garbage.
    #[error("sampled a belief with zero observations")]
    EmptyBelief,
}
