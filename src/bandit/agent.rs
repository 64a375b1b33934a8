use ndarray::Array1;

use crate::action_selection::{
    ActionSelection, EnumActionSelection, EpsilonGreedy, GradientBandit, Greedy, Softmax,
    UpperConfidenceBound,
};
use crate::config::BanditConfig;
use crate::error::BanditError;
use crate::policy_update::{constant_step, incremental_average};

use super::Problem;

/// Selection algorithm driving a [`BanditAgent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Greedy,
    EpsilonGreedy,
    /// Greedy selection over optimistically initialised estimates.
    Optimistic,
    Softmax,
    Ucb,
    ActionPreferences,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Greedy,
        Mode::EpsilonGreedy,
        Mode::Optimistic,
        Mode::Softmax,
        Mode::Ucb,
        Mode::ActionPreferences,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Greedy => "GREEDY",
            Mode::EpsilonGreedy => "EPSILON_GREEDY",
            Mode::Optimistic => "OPTIMISTIC",
            Mode::Softmax => "SOFTMAX",
            Mode::Ucb => "UCB",
            Mode::ActionPreferences => "ACTION_PREFERENCES",
        }
    }

    pub fn selection(&self, arms: usize, config: &BanditConfig, seed: u64) -> EnumActionSelection {
        match self {
            Mode::Greedy | Mode::Optimistic => Greedy::new(seed).into(),
            Mode::EpsilonGreedy => EpsilonGreedy::constant(config.epsilon, seed).into(),
            Mode::Softmax => Softmax::new(config.tau, seed).into(),
            Mode::Ucb => UpperConfidenceBound::new(config.ucb_c, seed).into(),
            Mode::ActionPreferences => GradientBandit::new(arms, config.alpha, seed).into(),
        }
    }

    pub fn initial_estimate(&self, config: &BanditConfig) -> f64 {
        match self {
            Mode::Optimistic => config.optimistic_value,
            _ => 0.0,
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("invalid selection mode '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRecord {
    pub step: usize,
    pub arm: usize,
    pub reward: f64,
    pub is_best: bool,
}

/// Per-step curves of a single run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunHistory {
    /// Running mean reward after each step.
    pub average_rewards: Vec<f64>,
    /// Running fraction of steps that pulled a best arm.
    pub accuracy: Vec<f64>,
    /// Cumulative expected regret.
    pub regret: Vec<f64>,
}

pub struct BanditAgent {
    problem: Problem,
    mode: Mode,
    action_selection: EnumActionSelection,
    initial_estimate: f64,
    estimates: Array1<f64>,
    counts: Array1<u64>,
    step_size: Option<f64>,
    step: usize,
    total_reward: f64,
    best_pulls: u64,
    total_regret: f64,
    history: RunHistory,
}

impl BanditAgent {
    pub fn new(problem: Problem, mode: Mode, config: &BanditConfig) -> Result<Self, BanditError> {
        config.validate()?;
        let arms = problem.arms();
        let initial_estimate = mode.initial_estimate(config);
        Ok(Self {
            action_selection: mode.selection(arms, config, config.seed),
            mode,
            initial_estimate,
            estimates: Array1::from_elem(arms, initial_estimate),
            counts: Array1::zeros(arms),
            step_size: config.step_size,
            step: 0,
            total_reward: 0.0,
            best_pulls: 0,
            total_regret: 0.0,
            history: RunHistory::default(),
            problem,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn estimates(&self) -> &Array1<f64> {
        &self.estimates
    }

    pub fn counts(&self) -> &Array1<u64> {
        &self.counts
    }

    pub fn steps_taken(&self) -> usize {
        self.step
    }

    pub fn history(&self) -> &RunHistory {
        &self.history
    }

    /// Selection probabilities under the current policy.
    pub fn probabilities(&mut self) -> Vec<f64> {
        let values = self.estimates.to_vec();
        self.action_selection.get_exploration_probs(&values)
    }

    pub fn choose_action(&mut self) -> usize {
        let values = self.estimates.to_vec();
        self.action_selection.get_action(&values)
    }

    pub fn update_parameters(&mut self, arm: usize, reward: f64) -> Result<(), BanditError> {
        if arm >= self.counts.len() {
            return Err(BanditError::InvalidArm {
                arm,
                arms: self.counts.len(),
            });
        }
        self.counts[arm] += 1;
        self.estimates[arm] = match self.step_size {
            Some(alpha) => constant_step(self.estimates[arm], reward, alpha),
            None => incremental_average(self.estimates[arm], reward, self.counts[arm]),
        };
        self.action_selection.observe(arm, reward);
        Ok(())
    }

    pub fn step(&mut self) -> Result<StepRecord, BanditError> {
        let arm = self.choose_action();
        let pull = self.problem.pull_arm(arm)?;
        self.step += 1;
        self.total_reward += pull.reward;
        if pull.is_best {
            self.best_pulls += 1;
        }
        self.total_regret += self.problem.regret(arm)?;
        self.update_parameters(arm, pull.reward)?;

        let n = self.step as f64;
        self.history.average_rewards.push(self.total_reward / n);
        self.history.accuracy.push(self.best_pulls as f64 / n);
        self.history.regret.push(self.total_regret);

        tracing::trace!(
            step = self.step,
            arm,
            reward = pull.reward,
            average = self.total_reward / n,
            "pulled arm"
        );
        Ok(StepRecord {
            step: self.step,
            arm,
            reward: pull.reward,
            is_best: pull.is_best,
        })
    }

    pub fn run(&mut self, max_steps: usize) -> Result<&RunHistory, BanditError> {
        for _ in 0..max_steps {
            self.step()?;
        }
        tracing::debug!(
            mode = self.mode.name(),
            steps = self.step,
            average_reward = self.history.average_rewards.last().copied().unwrap_or(0.0),
            accuracy = self.history.accuracy.last().copied().unwrap_or(0.0),
            "run complete"
        );
        Ok(&self.history)
    }

    /// Forgets everything learned while keeping the same problem.
    pub fn reset(&mut self) {
        let arms = self.problem.arms();
        self.estimates = Array1::from_elem(arms, self.initial_estimate);
        self.counts = Array1::zeros(arms);
        self.action_selection.reset();
        self.step = 0;
        self.total_reward = 0.0;
        self.best_pulls = 0;
        self.total_regret = 0.0;
        self.history = RunHistory::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bandit::{ArmDistribution, Dist};
    use approx::assert_relative_eq;

    fn problem(probs: &[f64]) -> Problem {
        let arms = probs
            .iter()
            .map(|p| ArmDistribution::bernoulli(*p).unwrap())
            .collect();
        Problem::from_arms(Dist::Bernoulli, arms, 17).unwrap()
    }

    #[test]
    fn estimates_are_sample_means() {
        let config = BanditConfig::default();
        let mut agent = BanditAgent::new(problem(&[0.5, 0.5]), Mode::Greedy, &config).unwrap();
        let rewards = [1.0, 0.0, 0.0, 1.0, 1.0];
        for r in rewards {
            agent.update_parameters(0, r).unwrap();
        }
        assert_eq!(agent.counts()[0], 5);
        assert_relative_eq!(agent.estimates()[0], 0.6, epsilon = 1e-12);
        assert_relative_eq!(agent.estimates()[1], 0.0);
    }

    #[test]
    fn constant_step_size_tracks_recent_rewards() {
        let config = BanditConfig {
            step_size: Some(0.5),
            ..Default::default()
        };
        let mut agent = BanditAgent::new(problem(&[0.5]), Mode::Greedy, &config).unwrap();
        agent.update_parameters(0, 1.0).unwrap();
        agent.update_parameters(0, 1.0).unwrap();
        assert_relative_eq!(agent.estimates()[0], 0.75);
    }

    #[test]
    fn updating_a_missing_arm_fails() {
        let config = BanditConfig::default();
        let mut agent = BanditAgent::new(problem(&[0.5, 0.5]), Mode::Greedy, &config).unwrap();
        assert_eq!(
            agent.update_parameters(2, 1.0),
            Err(BanditError::InvalidArm { arm: 2, arms: 2 })
        );
        assert_eq!(agent.counts().sum(), 0);
    }

    #[test]
    fn optimistic_mode_starts_high() {
        let config = BanditConfig::default();
        let agent = BanditAgent::new(problem(&[0.1, 0.2]), Mode::Optimistic, &config).unwrap();
        assert!(agent.estimates().iter().all(|q| *q == config.optimistic_value));
    }

    #[test]
    fn run_records_one_entry_per_step() {
        let config = BanditConfig::default();
        for mode in Mode::ALL {
            let mut agent = BanditAgent::new(problem(&[0.2, 0.9, 0.4]), mode, &config).unwrap();
            let history = agent.run(50).unwrap();
            assert_eq!(history.average_rewards.len(), 50);
            assert_eq!(history.accuracy.len(), 50);
            assert_eq!(history.regret.len(), 50);
            assert!(history.accuracy.iter().all(|a| (0.0..=1.0).contains(a)));
            assert!(history.regret.windows(2).all(|w| w[1] >= w[0]));
            assert_eq!(agent.counts().sum(), 50);
        }
    }

    #[test]
    fn epsilon_greedy_finds_the_certain_arm() {
        let config = BanditConfig {
            epsilon: 0.1,
            ..Default::default()
        };
        let mut agent =
            BanditAgent::new(problem(&[0.0, 1.0, 0.0]), Mode::EpsilonGreedy, &config).unwrap();
        agent.run(500).unwrap();
        assert_eq!(crate::utils::argmax(agent.estimates().as_slice().unwrap()), 1);
        assert!(*agent.history().accuracy.last().unwrap() > 0.8);
    }

    #[test]
    fn ucb_pulls_every_arm() {
        let config = BanditConfig::default();
        let mut agent = BanditAgent::new(problem(&[0.3, 0.6, 0.1, 0.9]), Mode::Ucb, &config).unwrap();
        agent.run(4).unwrap();
        assert!(agent.counts().iter().all(|n| *n == 1));
    }

    #[test]
    fn softmax_probabilities_are_a_simplex() {
        let config = BanditConfig::default();
        let mut agent =
            BanditAgent::new(problem(&[0.3, 0.6, 0.1]), Mode::Softmax, &config).unwrap();
        agent.run(100).unwrap();
        let probs = agent.probabilities();
        assert!(probs.iter().all(|p| *p >= 0.0));
        assert_relative_eq!(probs.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn reset_clears_learning() {
        let config = BanditConfig::default();
        let mut agent =
            BanditAgent::new(problem(&[0.3, 0.6]), Mode::EpsilonGreedy, &config).unwrap();
        agent.run(20).unwrap();
        agent.reset();
        assert_eq!(agent.steps_taken(), 0);
        assert!(agent.history().average_rewards.is_empty());
        assert_eq!(agent.counts().sum(), 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = BanditConfig {
            epsilon: 2.0,
            ..Default::default()
        };
        assert!(BanditAgent::new(problem(&[0.3]), Mode::EpsilonGreedy, &config).is_err());
    }

    #[test]
    fn parses_mode_names() {
        assert_eq!("ucb".parse::<Mode>(), Ok(Mode::Ucb));
        assert_eq!("ACTION_PREFERENCES".parse::<Mode>(), Ok(Mode::ActionPreferences));
        assert!("thompson".parse::<Mode>().is_err());
    }
}
