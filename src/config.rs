//! Inference options (§6) and their validation.
//!
//! Modeled after `BanditConfig`-style option structs in the retrieval pack
//! (serde-derived, a `Default` impl, validated before use rather than
//! silently coerced).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which parts of a terminal trace the result sink should emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultKinds {
    /// Emit per-site named predicts.
    pub predicts: bool,
    /// Emit the synthetic `$trace` predict (the full sequence of values).
    pub trace: bool,
}

impl Default for ResultKinds {
    fn default() -> Self {
        Self {
            predicts: true,
            trace: true,
        }
    }
}

/// Output format forwarded opaquely to the `ResultSink`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// Human-readable single-line JSON per predict.
    #[default]
    Json,
    /// Plain-text `name = value (weight)` lines.
    Text,
}

/// Options recognised by [`crate::orchestrate::infer_map`] (§6).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InferOptions {
    /// Outer iterations (full re-learns). Default `1`.
    pub number_of_passes: usize,
    /// Learning runs per pass before searching. Default `100`.
    pub number_of_samples: usize,
    /// Terminal states to emit per pass. Default `1`.
    pub number_of_maps: usize,
    /// `K` for the distance heuristic (§4.7). Default `1`.
    pub number_of_h_draws: i64,
    /// Passed opaquely to the result sink.
    pub output_format: OutputFormat,
    /// Subset of `{predicts, trace}` to emit.
    pub results: ResultKinds,
}

impl Default for InferOptions {
    fn default() -> Self {
        Self {
            number_of_passes: 1,
            number_of_samples: 100,
            number_of_maps: 1,
            number_of_h_draws: 1,
            output_format: OutputFormat::default(),
            results: ResultKinds::default(),
        }
    }
}

impl InferOptions {
    /// Rejects option combinations that can never produce a sensible run.
    ///
    /// `number_of_h_draws` has no invalid range (every `i64` selects one of
    /// the three heuristic regimes in §4.7), so it is not checked here.
    pub fn validate(&self) -> Result<()> {
        if self.number_of_passes == 0 {
            return Err(Error::InvalidConfig {
                reason: "number_of_passes must be at least 1".into(),
            });
        }
        if self.number_of_maps == 0 {
            return Err(Error::InvalidConfig {
                reason: "number_of_maps must be at least 1".into(),
            });
        }
        Ok(())
    }
}
