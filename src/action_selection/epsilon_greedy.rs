use rand::{distributions::Uniform, prelude::Distribution, rngs::StdRng, Rng, SeedableRng};
use std::{fmt::Debug, rc::Rc};

use crate::utils::{max, random_argmax};

use super::ActionSelection;

#[derive(Clone)]
pub struct EpsilonGreedy {
    exploration_decider: Uniform<f64>,
    rng: StdRng,
    pub initial_epsilon: f64,
    pub epsilon: f64,
    epsilon_decay: Rc<dyn Fn(f64) -> f64>,
    final_epsilon: f64,
}

impl Debug for EpsilonGreedy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EpsilonGreedy")
            .field("exploration_decider", &self.exploration_decider)
            .field("initial_epsilon", &self.initial_epsilon)
            .field("epsilon", &self.epsilon)
            .field("final_epsilon", &self.final_epsilon)
            .finish()
    }
}

impl EpsilonGreedy {
    pub fn new(
        epsilon: f64,
        epsilon_decay: Rc<dyn Fn(f64) -> f64>,
        final_epsilon: f64,
        seed: u64,
    ) -> Self {
        Self {
            exploration_decider: Uniform::from(0.0..1.0),
            rng: StdRng::seed_from_u64(seed),
            initial_epsilon: epsilon,
            epsilon,
            epsilon_decay,
            final_epsilon,
        }
    }

    /// Fixed exploration rate.
    pub fn constant(epsilon: f64, seed: u64) -> Self {
        Self::new(epsilon, Rc::new(|e| e), epsilon, seed)
    }

    /// Subtracts `decay` after every episode until `final_epsilon` is reached.
    pub fn linear(epsilon: f64, decay: f64, final_epsilon: f64, seed: u64) -> Self {
        Self::new(epsilon, Rc::new(move |e| e - decay), final_epsilon, seed)
    }

    fn decay_epsilon(&mut self) {
        let new_epsilon: f64 = (self.epsilon_decay)(self.epsilon);
        self.epsilon = if self.final_epsilon > new_epsilon {
            self.final_epsilon
        } else {
            new_epsilon
        };
    }

    fn should_explore(&mut self) -> bool {
        self.epsilon != 0.0 && self.exploration_decider.sample(&mut self.rng) < self.epsilon
    }
}

impl ActionSelection for EpsilonGreedy {
    fn get_action(&mut self, values: &[f64]) -> usize {
        if self.should_explore() {
            self.rng.gen_range(0..values.len())
        } else {
            random_argmax(values, &mut self.rng)
        }
    }

    fn observe(&mut self, _action: usize, _reward: f64) {}

    fn update(&mut self) {
        self.decay_epsilon();
    }

    fn get_exploration_probs(&mut self, values: &[f64]) -> Vec<f64> {
        let best = max(values);
        let ties = values.iter().filter(|v| **v == best).count() as f64;
        let explore = self.epsilon / values.len() as f64;
        values
            .iter()
            .map(|v| {
                if *v == best {
                    explore + (1.0 - self.epsilon) / ties
                } else {
                    explore
                }
            })
            .collect()
    }

    fn reset(&mut self) {
        self.epsilon = self.initial_epsilon;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_epsilon_is_greedy() {
        let mut selector = EpsilonGreedy::constant(0.0, 1);
        for _ in 0..100 {
            assert_eq!(selector.get_action(&[0.1, 0.2, 0.9]), 2);
        }
    }

    #[test]
    fn full_epsilon_reaches_every_action() {
        let mut selector = EpsilonGreedy::constant(1.0, 1);
        let mut seen = [false; 4];
        for _ in 0..400 {
            seen[selector.get_action(&[0.0, 0.0, 1.0, 0.0])] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn decay_stops_at_final_epsilon() {
        let mut selector = EpsilonGreedy::linear(1.0, 0.4, 0.1, 1);
        selector.update();
        assert_relative_eq!(selector.epsilon, 0.6);
        selector.update();
        selector.update();
        assert_relative_eq!(selector.epsilon, 0.1);
        selector.reset();
        assert_relative_eq!(selector.epsilon, 1.0);
    }

    #[test]
    fn exploration_probs_sum_to_one() {
        let mut selector = EpsilonGreedy::constant(0.3, 1);
        let probs = selector.get_exploration_probs(&[0.5, 0.9, 0.9, 0.1]);
        assert_relative_eq!(probs.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(probs[0], 0.075);
        assert_relative_eq!(probs[1], 0.075 + 0.35);
    }
}
