//! Distance heuristic family used to order the open list (C8 helper, §4.7).

use std::sync::atomic::{AtomicI64, Ordering};

use rand::rngs::SmallRng;

use crate::belief::{Belief, Reward};

/// Process-wide fallback for `number_of_h_draws`, kept for API parity with
/// the source design's process-global `K`. `infer_map` does not read this —
/// it threads `K` explicitly through `InferOptions` instead, which is the
/// cleaner design the source spec itself allows (§5, §9). A caller that
/// wants the process-global behaviour can still set and read it directly.
pub static GLOBAL_H_DRAWS: AtomicI64 = AtomicI64::new(1);

/// Estimate the remaining cost contributed by `belief`, given draw count `K`.
///
/// - `K > 0`: draw `K` samples, take their maximum `m`, `h = -m`; `NaN`
///   collapses to `0`; result is clamped to `>= 0` (a larger positive `K`
///   makes this more conservative, i.e. closer to admissible).
/// - `K == 0`: always `0` — degenerates the search to Dijkstra (§8, *law*).
/// - `K < 0`: `-mode(belief)` — same sign convention as the `K > 0` branch
///   (mode is already `E[reward]`; negating turns it into a cost), fast and
///   deterministic, but not proven admissible (accepted as-is, §9).
pub fn estimate<B: Belief>(belief: &B, k: i64, rng: &mut SmallRng) -> Reward {
    if k == 0 {
        return 0.0;
    }
    if k < 0 {
        return -belief.mode();
    }
    let max = (0..k)
        .map(|_| belief.sample(rng))
        .fold(Reward::NEG_INFINITY, Reward::max);
    let h = -max;
    if h.is_nan() {
        0.0
    } else {
        h.max(0.0)
    }
}
