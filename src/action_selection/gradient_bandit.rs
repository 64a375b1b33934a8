use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    policy_update::incremental_average,
    utils::{categorical_sample, softmax},
};

use super::ActionSelection;

/// Action-preference (gradient bandit) selection.
///
/// Ignores the value estimates it is handed: it learns its own preferences
/// `H` from the rewards fed to [`ActionSelection::observe`], using the
/// running mean reward (current reward included) as the baseline.
#[derive(Debug, Clone)]
pub struct GradientBandit {
    alpha: f64,
    preferences: Vec<f64>,
    pi: Vec<f64>,
    baseline: f64,
    observations: u64,
    rng: StdRng,
}

impl GradientBandit {
    pub fn new(arms: usize, alpha: f64, seed: u64) -> Self {
        Self {
            alpha,
            preferences: vec![0.0; arms],
            pi: vec![1.0 / arms.max(1) as f64; arms],
            baseline: 0.0,
            observations: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn preferences(&self) -> &[f64] {
        &self.preferences
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.pi
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    pub fn set_step_size(&mut self, alpha: f64) {
        self.alpha = alpha;
    }
}

impl ActionSelection for GradientBandit {
    fn get_action(&mut self, _values: &[f64]) -> usize {
        categorical_sample(&self.pi, self.rng.gen())
    }

    fn observe(&mut self, action: usize, reward: f64) {
        self.observations += 1;
        self.baseline = incremental_average(self.baseline, reward, self.observations);
        let advantage: f64 = reward - self.baseline;
        for (arm, h) in self.preferences.iter_mut().enumerate() {
            if arm == action {
                *h += self.alpha * advantage * (1.0 - self.pi[arm]);
            } else {
                *h -= self.alpha * advantage * self.pi[arm];
            }
        }
        self.pi = softmax(&self.preferences, 1.0);
    }

    fn update(&mut self) {}

    fn get_exploration_probs(&mut self, _values: &[f64]) -> Vec<f64> {
        self.pi.clone()
    }

    fn reset(&mut self) {
        let arms = self.preferences.len();
        self.preferences = vec![0.0; arms];
        self.pi = vec![1.0 / arms.max(1) as f64; arms];
        self.baseline = 0.0;
        self.observations = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn starts_uniform() {
        let selector = GradientBandit::new(4, 0.9, 1);
        for p in selector.probabilities() {
            assert_relative_eq!(*p, 0.25);
        }
    }

    #[test]
    fn rewarded_arm_gains_preference() {
        let mut selector = GradientBandit::new(3, 0.5, 1);
        selector.observe(0, 0.0);
        selector.observe(1, 1.0);
        let pi = selector.probabilities();
        assert!(pi[1] > pi[0]);
        assert!(pi[1] > pi[2]);
        assert_relative_eq!(pi.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert!(pi.iter().all(|p| *p >= 0.0));
    }

    #[test]
    fn probabilities_stay_on_the_simplex() {
        let mut selector = GradientBandit::new(5, 0.9, 11);
        for step in 0..500 {
            let action = selector.get_action(&[]);
            let reward = if action == 2 { 1.0 } else { (step % 3) as f64 * 0.1 };
            selector.observe(action, reward);
            let pi = selector.probabilities();
            assert_relative_eq!(pi.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
            assert!(pi.iter().all(|p| *p >= 0.0));
        }
        assert_eq!(crate::utils::argmax(selector.probabilities()), 2);
    }

    #[test]
    fn reset_restores_uniform_preferences() {
        let mut selector = GradientBandit::new(2, 0.5, 1);
        selector.observe(1, 1.0);
        selector.reset();
        assert_eq!(selector.preferences(), &[0.0, 0.0]);
        assert_relative_eq!(selector.baseline(), 0.0);
    }
}
