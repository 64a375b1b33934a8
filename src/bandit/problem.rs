use ndarray_rand::rand_distr::{Bernoulli, Distribution, Normal, Uniform};
use rand::{rngs::StdRng, SeedableRng};

use crate::error::{BanditError, ConfigError};

/// Reward distribution family of a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dist {
    Gauss,
    Bernoulli,
}

impl Dist {
    pub const ALL: [Dist; 2] = [Dist::Gauss, Dist::Bernoulli];

    pub fn name(&self) -> &'static str {
        match self {
            Dist::Gauss => "GAUSS",
            Dist::Bernoulli => "BERNOULLI",
        }
    }
}

impl std::str::FromStr for Dist {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dist::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("invalid distribution '{}'", s))
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ArmDistribution {
    /// Normal rewards, clamped to `[0, 1]` when pulled.
    Gauss { mean: f64, dist: Normal<f64> },
    Bernoulli { p: f64, dist: Bernoulli },
}

impl ArmDistribution {
    pub fn gauss(mean: f64, stdev: f64) -> Result<Self, ConfigError> {
        if !mean.is_finite() {
            return Err(ConfigError::InvalidHyperparameter {
                name: "mean",
                value: mean,
                reason: "must be a finite number",
            });
        }
        if !stdev.is_finite() {
            return Err(ConfigError::InvalidHyperparameter {
                name: "stdev",
                value: stdev,
                reason: "must be a non-negative finite number",
            });
        }
        Normal::new(mean, stdev)
            .map(|dist| ArmDistribution::Gauss { mean, dist })
            .map_err(|_| ConfigError::InvalidHyperparameter {
                name: "stdev",
                value: stdev,
                reason: "must be a non-negative finite number",
            })
    }

    pub fn bernoulli(p: f64) -> Result<Self, ConfigError> {
        Bernoulli::new(p)
            .map(|dist| ArmDistribution::Bernoulli { p, dist })
            .map_err(|_| ConfigError::InvalidHyperparameter {
                name: "p",
                value: p,
                reason: "must be in [0, 1]",
            })
    }

    /// Mean of the arm before clamping; used to rank arms.
    pub fn mean(&self) -> f64 {
        match self {
            ArmDistribution::Gauss { mean, .. } => *mean,
            ArmDistribution::Bernoulli { p, .. } => *p,
        }
    }

    fn sample(&self, rng: &mut StdRng) -> f64 {
        match self {
            ArmDistribution::Gauss { dist, .. } => dist.sample(rng).clamp(0.0, 1.0),
            ArmDistribution::Bernoulli { dist, .. } => {
                if dist.sample(rng) {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

/// Outcome of a single pull.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pull {
    pub reward: f64,
    pub is_best: bool,
}

/// A stationary k-armed bandit.
#[derive(Debug, Clone)]
pub struct Problem {
    dist: Dist,
    arms: Vec<ArmDistribution>,
    best_actions: Vec<usize>,
    rng: StdRng,
}

impl Problem {
    pub const GAUSS_STDEV: f64 = 0.2;

    /// Draws a fresh problem: Gaussian arms get a mean in `[0.3, 1)`,
    /// Bernoulli arms a success probability in `[0, 1)`.
    pub fn new(arms: usize, dist: Dist, seed: u64) -> Result<Self, ConfigError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let arm_dists: Vec<ArmDistribution> = match dist {
            Dist::Gauss => {
                let means = Uniform::new(0.3, 1.0);
                (0..arms)
                    .map(|_| ArmDistribution::gauss(means.sample(&mut rng), Self::GAUSS_STDEV))
                    .collect::<Result<_, _>>()?
            }
            Dist::Bernoulli => {
                let probs = Uniform::new(0.0, 1.0);
                (0..arms)
                    .map(|_| ArmDistribution::bernoulli(probs.sample(&mut rng)))
                    .collect::<Result<_, _>>()?
            }
        };
        Self::build(dist, arm_dists, rng)
    }

    pub fn from_arms(
        dist: Dist,
        arms: Vec<ArmDistribution>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::build(dist, arms, StdRng::seed_from_u64(seed))
    }

    fn build(dist: Dist, arms: Vec<ArmDistribution>, rng: StdRng) -> Result<Self, ConfigError> {
        if arms.is_empty() {
            return Err(ConfigError::NoArms);
        }
        let best_mean: f64 = arms
            .iter()
            .map(ArmDistribution::mean)
            .fold(f64::NEG_INFINITY, f64::max);
        let best_actions: Vec<usize> = arms
            .iter()
            .enumerate()
            .filter(|(_, arm)| arm.mean() == best_mean)
            .map(|(i, _)| i)
            .collect();
        if best_actions.is_empty() {
            return Err(ConfigError::UnrankableArms);
        }
        let problem = Self {
            dist,
            arms,
            best_actions,
            rng,
        };
        tracing::trace!(arms = ?problem.means(), "created {} bandit", dist.name());
        Ok(problem)
    }

    pub fn arms(&self) -> usize {
        self.arms.len()
    }

    pub fn dist(&self) -> Dist {
        self.dist
    }

    pub fn arm(&self, arm: usize) -> Option<&ArmDistribution> {
        self.arms.get(arm)
    }

    pub fn means(&self) -> Vec<f64> {
        self.arms.iter().map(ArmDistribution::mean).collect()
    }

    /// Every arm sharing the highest expected reward.
    pub fn best_actions(&self) -> &[usize] {
        &self.best_actions
    }

    pub fn best_action(&self) -> usize {
        self.best_actions[0]
    }

    pub fn best_mean(&self) -> f64 {
        self.arms[self.best_action()].mean()
    }

    pub fn is_best(&self, arm: usize) -> bool {
        self.best_actions.contains(&arm)
    }

    /// Expected reward lost by pulling `arm` instead of a best arm.
    pub fn regret(&self, arm: usize) -> Result<f64, BanditError> {
        let chosen = self.arm_or_err(arm)?;
        Ok(self.best_mean() - chosen.mean())
    }

    pub fn pull_arm(&mut self, arm: usize) -> Result<Pull, BanditError> {
        let chosen = *self.arm_or_err(arm)?;
        let reward = chosen.sample(&mut self.rng);
        Ok(Pull {
            reward,
            is_best: self.is_best(arm),
        })
    }

    fn arm_or_err(&self, arm: usize) -> Result<&ArmDistribution, BanditError> {
        self.arms.get(arm).ok_or(BanditError::InvalidArm {
            arm,
            arms: self.arms.len(),
        })
    }
}
