use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::utils::{categorical_sample, softmax};

use super::ActionSelection;

/// Boltzmann exploration over the value estimates with temperature `tau`.
#[derive(Debug, Clone)]
pub struct Softmax {
    tau: f64,
    rng: StdRng,
}

impl Softmax {
    pub fn new(tau: f64, seed: u64) -> Self {
        Self {
            tau,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn set_temperature(&mut self, tau: f64) {
        self.tau = tau;
    }
}

impl ActionSelection for Softmax {
    fn get_action(&mut self, values: &[f64]) -> usize {
        let probs = softmax(values, self.tau);
        categorical_sample(&probs, self.rng.gen())
    }

    fn observe(&mut self, _action: usize, _reward: f64) {}

    fn update(&mut self) {}

    fn get_exploration_probs(&mut self, values: &[f64]) -> Vec<f64> {
        softmax(values, self.tau)
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn probabilities_form_a_simplex() {
        let mut selector = Softmax::new(0.12, 5);
        let probs = selector.get_exploration_probs(&[0.3, 0.9, 0.31, 0.0]);
        assert!(probs.iter().all(|p| *p >= 0.0));
        assert_relative_eq!(probs.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn low_temperature_concentrates_on_best() {
        let mut selector = Softmax::new(0.01, 5);
        let mut hits = 0;
        for _ in 0..200 {
            if selector.get_action(&[0.1, 0.9, 0.2]) == 1 {
                hits += 1;
            }
        }
        assert_eq!(hits, 200);
    }
}
