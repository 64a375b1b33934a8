use kdam::tqdm;
use ndarray::Array1;

use crate::bandit::{BanditAgent, Dist, Mode, Problem};
use crate::config::BanditConfig;
use crate::error::BanditError;

/// Curves averaged element-wise over every run of one experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentResult {
    pub dist: Dist,
    pub mode: Mode,
    pub average_rewards: Array1<f64>,
    pub accuracy: Array1<f64>,
    pub regret: Array1<f64>,
}

impl ExperimentResult {
    pub fn final_average_reward(&self) -> f64 {
        self.average_rewards.iter().last().copied().unwrap_or(0.0)
    }

    pub fn final_accuracy(&self) -> f64 {
        self.accuracy.iter().last().copied().unwrap_or(0.0)
    }

    pub fn final_regret(&self) -> f64 {
        self.regret.iter().last().copied().unwrap_or(0.0)
    }
}

/// Runs `config.runs` fresh problem/agent pairs for `config.steps` steps
/// each. Run `i` draws its problem from `seed + 2i` and seeds its agent
/// with `seed + 2i + 1`.
pub fn average_runs(
    dist: Dist,
    mode: Mode,
    config: &BanditConfig,
) -> Result<ExperimentResult, BanditError> {
    config.validate()?;
    let mut average_rewards: Array1<f64> = Array1::zeros(config.steps);
    let mut accuracy: Array1<f64> = Array1::zeros(config.steps);
    let mut regret: Array1<f64> = Array1::zeros(config.steps);

    for run in tqdm!(0..config.runs) {
        let problem_seed: u64 = config.seed.wrapping_add(2 * run as u64);
        let problem = Problem::new(config.arms, dist, problem_seed)?;
        let agent_config = BanditConfig {
            seed: problem_seed.wrapping_add(1),
            ..config.clone()
        };
        let mut agent = BanditAgent::new(problem, mode, &agent_config)?;
        let history = agent.run(config.steps)?;
        average_rewards += &Array1::from_vec(history.average_rewards.clone());
        accuracy += &Array1::from_vec(history.accuracy.clone());
        regret += &Array1::from_vec(history.regret.clone());
    }

    let runs: f64 = config.runs.max(1) as f64;
    average_rewards /= runs;
    accuracy /= runs;
    regret /= runs;

    let result = ExperimentResult {
        dist,
        mode,
        average_rewards,
        accuracy,
        regret,
    };
    tracing::info!(
        dist = dist.name(),
        mode = mode.name(),
        runs = config.runs,
        steps = config.steps,
        average_reward = result.final_average_reward(),
        accuracy = result.final_accuracy(),
        "experiment finished"
    );
    Ok(result)
}

/// [`average_runs`] for every selection mode, in [`Mode::ALL`] order.
pub fn compare_modes(dist: Dist, config: &BanditConfig) -> Result<Vec<ExperimentResult>, BanditError> {
    Mode::ALL
        .iter()
        .map(|mode| average_runs(dist, *mode, config))
        .collect()
}
