//! Execution driver, learning mode (C5, §4.4).
//!
//! Runs a program to completion, consulting and updating the bandit table
//! at each sample checkpoint and appending to the trace. Driven by a
//! `while let` loop rather than native recursion, so deeply-nested programs
//! never grow the call stack (§5, trampoline requirement).

use std::hash::Hash;

use rand::rngs::SmallRng;

use crate::program::{Checkpoint, Frame, ProgramState, Sample};

/// Runs `checkpoint` to its terminal `Result`, selecting one value per
/// sample checkpoint from the site's bandit (or a fresh prior draw if no
/// bandit exists yet, or the bandit's `select_arm` returns `None`).
pub fn run_learning<V, S>(mut checkpoint: Checkpoint<V, S>, rng: &mut SmallRng) -> Frame<V, S>
where
    V: Clone + Eq + Hash,
    S: ProgramState,
{
    loop {
        checkpoint = match checkpoint {
            Checkpoint::Result(frame) => return frame,
            Checkpoint::Sample(sample) => step(sample, rng),
        };
    }
}

/// One sample-checkpoint step of §4.4, items 1–7.
fn step<V, S>(sample: Sample<V, S>, rng: &mut SmallRng) -> Checkpoint<V, S>
where
    V: Clone + Eq + Hash,
    S: ProgramState,
{
    let Sample {
        distribution,
        static_id,
        mut frame,
        continuation,
    } = sample;

    let site = frame.site_id(static_id);
    let value = frame
        .bandits
        .get(&site)
        .and_then(|bandit| bandit.select_arm(rng))
        .unwrap_or_else(|| {
            log::trace!("site {site} has no usable bandit, drawing from prior");
            distribution.sample(rng)
        });

    let past_reward = frame.log_weight();
    frame.add_log_weight(distribution.log_density(&value));
    frame.trace.push(site, value.clone(), past_reward);

    continuation(value, frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::belief::Reward;
    use crate::program::Distribution;
    use rand::SeedableRng;

    #[derive(Clone, Default)]
    struct Weight(Reward);

    impl ProgramState for Weight {
        fn log_weight(&self) -> Reward {
            self.0
        }
        fn add_log_weight(&mut self, delta: Reward) {
            self.0 += delta;
        }
    }

    struct Coin;
    impl Distribution<bool> for Coin {
        fn sample(&self, rng: &mut SmallRng) -> bool {
            use rand::Rng;
            rng.random_bool(0.5)
        }
        fn log_density(&self, value: &bool) -> Reward {
            if *value { 0.7f64.ln() } else { 0.3f64.ln() }
        }
    }

    fn one_flip(frame: Frame<bool, Weight>) -> Checkpoint<bool, Weight> {
        Checkpoint::sample(Coin, "flip", frame, |_value, frame| Checkpoint::result(frame))
    }

    #[test]
    fn single_checkpoint_produces_one_trace_entry() {
        let mut rng = SmallRng::seed_from_u64(1);
        let frame = Frame::<bool, Weight>::new();
        let terminal = run_learning(one_flip(frame), &mut rng);
        assert_eq!(terminal.trace.len(), 1);
    }

    #[test]
    fn past_reward_is_weight_before_the_choice() {
        let mut rng = SmallRng::seed_from_u64(2);
        let frame = Frame::<bool, Weight>::new();
        let terminal = run_learning(one_flip(frame), &mut rng);
        let entry = terminal.trace.iter().next().unwrap();
        assert_eq!(entry.past_reward, 0.0);
    }

    /// S6 (§8): the same lexical choice sampled 3 times in sequence produces
    /// 3 distinct site ids `(sid, 0), (sid, 1), (sid, 2)`, and the bandit
    /// table holds 3 bandits for that program point after backpropagation.
    #[test]
    fn s6_repeated_site_identification() {
        struct FourWay;
        impl Distribution<u8> for FourWay {
            fn sample(&self, rng: &mut SmallRng) -> u8 {
                use rand::Rng;
                rng.random_range(0..4)
            }
            fn log_density(&self, _value: &u8) -> Reward {
                0.25f64.ln()
            }
        }
        fn repeated_choice(frame: Frame<u8, Weight>) -> Checkpoint<u8, Weight> {
            Checkpoint::sample(FourWay, "rep", frame, |_a, frame| {
                Checkpoint::sample(FourWay, "rep", frame, |_b, frame| {
                    Checkpoint::sample(FourWay, "rep", frame, |_c, frame| Checkpoint::result(frame))
                })
            })
        }

        let mut rng = SmallRng::seed_from_u64(6);
        let end = run_learning(repeated_choice(Frame::new()), &mut rng);
        assert_eq!(end.trace.len(), 3);

        let occurrences: Vec<u32> = end.trace.iter().map(|entry| entry.site.occurrence).collect();
        assert_eq!(occurrences, vec![0, 1, 2]);

        let after = crate::backprop::backpropagate(end);
        assert_eq!(after.bandits.len(), 3);
    }
}
