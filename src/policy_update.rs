//! Value-update rules shared by the bandit and Connect-X agents.

use crate::utils::max;

/// Sample-average update after the `n`-th observation (`n >= 1`).
pub fn incremental_average(estimate: f64, reward: f64, n: u64) -> f64 {
    estimate + (reward - estimate) / n.max(1) as f64
}

pub fn constant_step(estimate: f64, reward: f64, step_size: f64) -> f64 {
    estimate + step_size * (reward - estimate)
}

pub fn qlearning(next_q_values: &[f64], _next_action: usize, _policy_probs: &[f64]) -> f64 {
    max(next_q_values)
}

pub fn sarsa(next_q_values: &[f64], next_action: usize, _policy_probs: &[f64]) -> f64 {
    next_q_values[next_action]
}

pub fn expected_sarsa(next_q_values: &[f64], _next_action: usize, policy_probs: &[f64]) -> f64 {
    next_q_values
        .iter()
        .zip(policy_probs)
        .map(|(q, p)| q * p)
        .sum()
}

pub fn temporal_difference(
    curr_q_value: f64,
    reward: f64,
    discount_factor: f64,
    future_q_value: f64,
) -> f64 {
    reward + discount_factor * future_q_value - curr_q_value
}

/// Returns `G_t = r_t + gamma * G_{t+1}`, computed back to front.
pub fn discounted_returns(rewards: &[f64], discount_factor: f64) -> Vec<f64> {
    let mut returns: Vec<f64> = vec![0.0; rewards.len()];
    let mut g: f64 = 0.0;
    for (i, r) in rewards.iter().enumerate().rev() {
        g = r + discount_factor * g;
        returns[i] = g;
    }
    returns
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn incremental_average_matches_mean() {
        let rewards = [0.3, 1.0, 0.0, 0.8, 0.45, 0.61];
        let mut estimate = 0.0;
        for (i, r) in rewards.iter().enumerate() {
            estimate = incremental_average(estimate, *r, i as u64 + 1);
        }
        let mean = rewards.iter().sum::<f64>() / rewards.len() as f64;
        assert_relative_eq!(estimate, mean, epsilon = 1e-12);
    }

    #[test]
    fn first_observation_overrides_initial_estimate() {
        assert_relative_eq!(incremental_average(5.0, 0.25, 1), 0.25);
    }

    #[test]
    fn qlearning_with_zero_discount_is_a_constant_step() {
        let alpha = 0.5;
        let q = 0.2;
        let reward = 1.0;
        let future = qlearning(&[0.9, 0.4, 0.7], 1, &[]);
        let td = temporal_difference(q, reward, 0.0, future);
        assert_relative_eq!(q + alpha * td, constant_step(q, reward, alpha));
        assert_relative_eq!(q + alpha * td, 0.6);
    }

    #[test]
    fn sarsa_uses_taken_action() {
        let next = [0.9, 0.4, 0.7];
        assert_relative_eq!(sarsa(&next, 1, &[]), 0.4);
        assert_relative_eq!(qlearning(&next, 1, &[]), 0.9);
    }

    #[test]
    fn expected_sarsa_weights_by_policy() {
        assert_relative_eq!(expected_sarsa(&[1.0, 3.0], 0, &[0.25, 0.75]), 2.5);
    }

    #[test]
    fn discounted_returns_back_up_terminal_reward() {
        let returns = discounted_returns(&[0.0, 0.0, 1.0], 0.5);
        assert_relative_eq!(returns[0], 0.25);
        assert_relative_eq!(returns[1], 0.5);
        assert_relative_eq!(returns[2], 1.0);
    }
}
