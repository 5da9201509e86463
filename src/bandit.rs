//! Bandit (C2) and bandit table (C3), §4.2.

use std::collections::HashMap;
use std::hash::Hash;

use rand::rngs::SmallRng;

use crate::belief::{Belief, EmpiricalNormal, Reward};
use crate::site::SiteId;

/// A bandit: observed arms plus a prior for values never seen before.
///
/// Arms are kept in both a `Vec` (insertion order, for the stable tie-break
/// in `select_arm`) and a `HashMap` (O(1) lookup), rather than pulling in an
/// `indexmap` dependency the rest of the stack has no other use for.
#[derive(Debug, Clone)]
pub struct Bandit<V, B = EmpiricalNormal> {
    order: Vec<V>,
    arms: HashMap<V, B>,
    new_arm_belief: B,
}

impl<V, B> Bandit<V, B>
where
    V: Clone + Eq + Hash,
    B: Belief,
{
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            arms: HashMap::new(),
            new_arm_belief: B::uninformative(),
        }
    }

    /// Distinct arms ever created in this bandit (invariant 4, §8).
    pub fn arm_count(&self) -> usize {
        self.order.len()
    }

    pub fn belief_of(&self, value: &V) -> Option<&B> {
        self.arms.get(value)
    }

    /// Samples a score from every existing arm's belief and from
    /// `new_arm_belief`, returning the arm with the maximum score or `None`
    /// if the new-arm belief wins (§4.2).
    ///
    /// Tie-break: a real arm beats the new-arm incumbent on a tie (favoring
    /// exploitation, §8); among real arms, the earlier-inserted one keeps
    /// the incumbency on a tie.
    pub fn select_arm(&self, rng: &mut SmallRng) -> Option<V> {
        if self.new_arm_belief.count() == 0 {
            // A freshly created bandit always forces a prior draw.
            return None;
        }
        let mut best_score = self.new_arm_belief.sample(rng);
        let mut best_value: Option<V> = None;
        for value in &self.order {
            let belief = self
                .arms
                .get(value)
                .expect("order and arms are kept in sync");
            let score = belief.sample(rng);
            let beats_incumbent = match &best_value {
                None => score >= best_score,
                Some(_) => score > best_score,
            };
            if beats_incumbent {
                best_score = score;
                best_value = Some(value.clone());
            }
        }
        best_value
    }

    /// Absorbs `reward` observed at `value`, creating a fresh arm (seeded
    /// from `new_arm_belief.as_prior()`) if `value` has not been seen
    /// before (§4.2).
    pub fn update(&mut self, value: V, reward: Reward) {
        if !self.arms.contains_key(&value) {
            let prior = self.new_arm_belief.as_prior();
            self.arms.insert(value.clone(), prior);
            self.order.push(value.clone());
            self.new_arm_belief = self.new_arm_belief.update(reward);
        }
        let belief = self.arms.get_mut(&value).expect("just ensured present");
        *belief = belief.update(reward);
    }

    /// Iterates arms in insertion order, the same order `select_arm` walks.
    pub fn arms(&self) -> impl Iterator<Item = (&V, &B)> {
        self.order
            .iter()
            .map(move |v| (v, self.arms.get(v).expect("order/arms in sync")))
    }
}

impl<V, B> Default for Bandit<V, B>
where
    V: Clone + Eq + Hash,
    B: Belief,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Map from choice-site identifier to its bandit (C3).
#[derive(Debug, Clone)]
pub struct BanditTable<V, B = EmpiricalNormal> {
    bandits: HashMap<SiteId, Bandit<V, B>>,
}

impl<V, B> BanditTable<V, B>
where
    V: Clone + Eq + Hash,
    B: Belief,
{
    pub fn new() -> Self {
        Self {
            bandits: HashMap::new(),
        }
    }

    pub fn get(&self, site: &SiteId) -> Option<&Bandit<V, B>> {
        self.bandits.get(site)
    }

    /// Records `reward` for `value` at `site`, creating the bandit if this
    /// is the first visit to that site (§4.5).
    pub fn record(&mut self, site: SiteId, value: V, reward: Reward) {
        self.bandits.entry(site).or_insert_with(Bandit::new).update(value, reward);
    }

    pub fn len(&self) -> usize {
        self.bandits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bandits.is_empty()
    }
}

impl<V, B> Default for BanditTable<V, B>
where
    V: Clone + Eq + Hash,
    B: Belief,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn fresh_bandit_always_returns_none() {
        let bandit: Bandit<u32> = Bandit::new();
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(bandit.select_arm(&mut rng), None);
    }

    #[test]
    fn new_arm_belief_count_matches_distinct_arms() {
        let mut bandit: Bandit<u32> = Bandit::new();
        bandit.update(1, 0.5);
        bandit.update(2, -0.2);
        bandit.update(1, 0.7); // repeat, not a new arm
        assert_eq!(bandit.arm_count(), 2);
    }

    #[test]
    fn update_creates_arm_seeded_from_new_arm_prior() {
        let mut bandit: Bandit<u32> = Bandit::new();
        bandit.update(10, 4.0);
        let belief = bandit.belief_of(&10).unwrap();
        assert_eq!(belief.count(), 1);
        assert_eq!(belief.mode(), 4.0);
    }

    #[test]
    fn dominant_arm_is_selected_almost_always() {
        let mut bandit: Bandit<u32> = Bandit::new();
        for _ in 0..30 {
            bandit.update(1, 10.0);
        }
        bandit.update(2, -10.0);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut wins_for_one = 0;
        for _ in 0..50 {
            if bandit.select_arm(&mut rng) == Some(1) {
                wins_for_one += 1;
            }
        }
        assert!(wins_for_one > 40);
    }
}
