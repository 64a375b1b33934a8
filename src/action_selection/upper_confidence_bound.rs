use rand::{rngs::StdRng, SeedableRng};

use crate::utils::random_argmax;

use super::ActionSelection;

/// UCB1 selection. Arms never tried score `+inf`, so each is pulled once
/// before the confidence bonus starts to matter.
#[derive(Debug, Clone)]
pub struct UpperConfidenceBound {
    action_counter: Vec<u64>,
    t: u64,
    confidence_level: f64,
    rng: StdRng,
    seed: u64,
}

impl UpperConfidenceBound {
    pub fn new(confidence_level: f64, seed: u64) -> Self {
        Self {
            action_counter: vec![],
            t: 1,
            confidence_level,
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn counts(&self) -> &[u64] {
        &self.action_counter
    }

    fn ucbs(&mut self, values: &[f64]) -> Vec<f64> {
        if self.action_counter.len() < values.len() {
            self.action_counter.resize(values.len(), 0);
        }
        let log_t: f64 = (self.t as f64).ln();
        values
            .iter()
            .zip(&self.action_counter)
            .map(|(v, n)| {
                if *n == 0 {
                    f64::INFINITY
                } else {
                    v + self.confidence_level * (log_t / *n as f64).sqrt()
                }
            })
            .collect()
    }
}

impl ActionSelection for UpperConfidenceBound {
    fn get_action(&mut self, values: &[f64]) -> usize {
        let ucbs = self.ucbs(values);
        random_argmax(&ucbs, &mut self.rng)
    }

    fn observe(&mut self, action: usize, _reward: f64) {
        if self.action_counter.len() <= action {
            self.action_counter.resize(action + 1, 0);
        }
        self.action_counter[action] += 1;
        self.t += 1;
    }

    fn update(&mut self) {}

    fn get_exploration_probs(&mut self, values: &[f64]) -> Vec<f64> {
        let ucbs = self.ucbs(values);
        let best = crate::utils::max(&ucbs);
        let ties = ucbs.iter().filter(|u| **u == best).count() as f64;
        ucbs.iter()
            .map(|u| if *u == best { 1.0 / ties } else { 0.0 })
            .collect()
    }

    fn reset(&mut self) {
        self.action_counter = vec![];
        self.t = 1;
        self.rng = StdRng::seed_from_u64(self.seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tries_every_arm_first() {
        let mut ucb = UpperConfidenceBound::new(0.38, 9);
        let values = [0.9, 0.1, 0.5, 0.2];
        let mut pulled = vec![];
        for _ in 0..values.len() {
            let action = ucb.get_action(&values);
            ucb.observe(action, values[action]);
            pulled.push(action);
        }
        pulled.sort();
        assert_eq!(pulled, vec![0, 1, 2, 3]);
    }

    #[test]
    fn bonus_favours_rarely_pulled_arms() {
        let mut ucb = UpperConfidenceBound::new(2.0, 9);
        let values = [0.5, 0.45];
        ucb.observe(0, 0.5);
        for _ in 0..50 {
            ucb.observe(0, 0.5);
        }
        ucb.observe(1, 0.45);
        assert_eq!(ucb.get_action(&values), 1);
    }

    #[test]
    fn without_bonus_picks_the_best_estimate() {
        let mut ucb = UpperConfidenceBound::new(0.0, 9);
        for a in 0..3 {
            ucb.observe(a, 0.0);
        }
        assert_eq!(ucb.get_action(&[0.1, 0.7, 0.3]), 1);
        assert_eq!(ucb.counts(), &[1, 1, 1]);
    }
}
