use rand::{rngs::StdRng, SeedableRng};

use crate::utils::{max, random_argmax};

use super::ActionSelection;

#[derive(Debug, Clone)]
pub struct Greedy {
    rng: StdRng,
}

impl Greedy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ActionSelection for Greedy {
    fn get_action(&mut self, values: &[f64]) -> usize {
        random_argmax(values, &mut self.rng)
    }

    fn observe(&mut self, _action: usize, _reward: f64) {}

    fn update(&mut self) {}

    fn get_exploration_probs(&mut self, values: &[f64]) -> Vec<f64> {
        let best = max(values);
        let ties = values.iter().filter(|v| **v == best).count() as f64;
        values
            .iter()
            .map(|v| if *v == best { 1.0 / ties } else { 0.0 })
            .collect()
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn picks_only_maximal_indices() {
        let mut greedy = Greedy::new(3);
        let values = [0.2, 0.8, 0.8, -1.0];
        for _ in 0..200 {
            let action = greedy.get_action(&values);
            assert!(action == 1 || action == 2);
        }
    }

    #[test]
    fn exploration_probs_split_ties() {
        let mut greedy = Greedy::new(3);
        let probs = greedy.get_exploration_probs(&[0.2, 0.8, 0.8, -1.0]);
        assert_relative_eq!(probs[0], 0.0);
        assert_relative_eq!(probs[1], 0.5);
        assert_relative_eq!(probs[2], 0.5);
        assert_relative_eq!(probs[3], 0.0);
    }
}
