//! Belief over a scalar reward (C1, §4.1).
//!
//! `Belief` is the four-operation contract from the design; `EmpiricalNormal`
//! is the sole implementor, parameterised by `(sum, sum2, cnt)` exactly as
//! specified. The split mirrors the pack's habit of expressing a small
//! numeric contract as a trait even with a single implementor (e.g.
//! `mccfr::traits::Profile`), so a second family can be dropped in later
//! without touching call sites in `bandit.rs`.

use rand::rngs::SmallRng;
use rand_distr::{Distribution as _, Normal};

/// A real-valued log-reward. `NaN` is never a valid value inside a belief.
pub type Reward = f64;

/// An updatable posterior over the expected future reward of one arm.
pub trait Belief: Clone {
    /// A belief with no observations (the zero element).
    fn uninformative() -> Self;

    /// Absorb one more observation of `evidence`, returning the updated belief.
    fn update(&self, evidence: Reward) -> Self;

    /// Draw a score from this belief. Requires at least one observation.
    fn sample(&self, rng: &mut SmallRng) -> Reward;

    /// Compress an informed belief into a weak prior for a new arm.
    fn as_prior(&self) -> Self;

    /// The belief's point estimate of the reward.
    fn mode(&self) -> Reward;

    /// Number of observations absorbed so far.
    fn count(&self) -> u64;
}

/// The empirical-normal belief: `(sum, sum2, cnt)` sufficient statistics for
/// the mean and the variance of the sample mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmpiricalNormal {
    sum: Reward,
    sum2: Reward,
    cnt: u64,
}

impl EmpiricalNormal {
    /// Build a belief directly from its sufficient statistics.
    pub fn from_stats(sum: Reward, sum2: Reward, cnt: u64) -> Self {
        Self { sum, sum2, cnt }
    }

    fn mean(&self) -> Reward {
        self.sum / self.cnt as Reward
    }

    /// Standard deviation of the sample mean, clamped to zero before the
    /// square root to guard against floating-point cancellation producing a
    /// slightly negative variance (§4.1, `NumericalUnderflow`).
    fn std_of_mean(&self) -> Reward {
        let n = self.cnt as Reward;
        let mean = self.mean();
        let variance = (self.sum2 / n - mean * mean).max(0.0) / n;
        variance.sqrt()
    }
}

impl Default for EmpiricalNormal {
    fn default() -> Self {
        Self::uninformative()
    }
}

impl Belief for EmpiricalNormal {
    fn uninformative() -> Self {
        Self {
            sum: 0.0,
            sum2: 0.0,
            cnt: 0,
        }
    }

    fn update(&self, evidence: Reward) -> Self {
        Self {
            sum: self.sum + evidence,
            sum2: self.sum2 + evidence * evidence,
            cnt: self.cnt + 1,
        }
    }

    fn sample(&self, rng: &mut SmallRng) -> Reward {
        assert!(self.cnt > 0, "sample() requires at least one observation");
        let mean = self.mean();
        let std = self.std_of_mean();
        if std <= 0.0 {
            return mean;
        }
        Normal::new(mean, std)
            .expect("finite mean/std produce a valid normal")
            .sample(rng)
    }

    fn as_prior(&self) -> Self {
        if self.cnt <= 1 {
            return *self;
        }
        let n = self.cnt as Reward;
        Self {
            sum: self.sum / n,
            sum2: self.sum2 / n,
            cnt: 1,
        }
    }

    fn mode(&self) -> Reward {
        self.mean()
    }

    fn count(&self) -> u64 {
        self.cnt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn mode_equals_constant_evidence() {
        let mut belief = EmpiricalNormal::uninformative();
        for _ in 0..10 {
            belief = belief.update(3.5);
        }
        assert_eq!(belief.mode(), 3.5);
    }

    #[test]
    fn as_prior_is_identity_below_two_observations() {
        let empty = EmpiricalNormal::uninformative();
        assert_eq!(empty.as_prior(), empty);

        let one = empty.update(2.0);
        assert_eq!(one.as_prior(), one);
    }

    #[test]
    fn as_prior_resets_count_to_one_above_threshold() {
        let belief = EmpiricalNormal::uninformative().update(1.0).update(3.0);
        let prior = belief.as_prior();
        assert_eq!(prior.count(), 1);
        assert_eq!(prior.mode(), belief.mode());
    }

    #[test]
    fn sample_is_deterministic_under_fixed_seed() {
        let belief = EmpiricalNormal::uninformative().update(1.0).update(2.0);
        let mut rng_a = SmallRng::seed_from_u64(7);
        let mut rng_b = SmallRng::seed_from_u64(7);
        assert_eq!(belief.sample(&mut rng_a), belief.sample(&mut rng_b));
    }

    #[test]
    fn variance_never_goes_negative_under_cancellation() {
        // sum/sum2 chosen so that sum2/n - mean^2 is a tiny negative number
        // under naive floating point before clamping.
        let belief = EmpiricalNormal::from_stats(1.0000000001, 1.0, 1_000_000);
        assert!(!belief.std_of_mean().is_nan());
        assert!(belief.std_of_mean() >= 0.0);
    }
}
