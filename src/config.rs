use crate::error::ConfigError;

fn check_unit(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidHyperparameter {
            name,
            value,
            reason: "must be in [0, 1]",
        })
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidHyperparameter {
            name,
            value,
            reason: "must be a positive finite number",
        })
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidHyperparameter {
            name,
            value,
            reason: "must be a non-negative finite number",
        })
    }
}

/// Settings shared by every bandit agent and experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct BanditConfig {
    pub arms: usize,
    pub steps: usize,
    pub runs: usize,
    pub epsilon: f64,
    pub ucb_c: f64,
    /// Step size of the action-preference update.
    pub alpha: f64,
    /// Softmax temperature.
    pub tau: f64,
    /// Initial estimate used by the optimistic mode.
    pub optimistic_value: f64,
    /// `None` averages samples, `Some(a)` uses a constant step size.
    pub step_size: Option<f64>,
    pub seed: u64,
}

impl Default for BanditConfig {
    fn default() -> Self {
        Self {
            arms: 7,
            steps: 1000,
            runs: 1000,
            epsilon: 0.38,
            ucb_c: 0.38,
            alpha: 0.9,
            tau: 0.12,
            optimistic_value: 1.0,
            step_size: None,
            seed: 42,
        }
    }
}

impl BanditConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arms == 0 {
            return Err(ConfigError::NoArms);
        }
        check_unit("epsilon", self.epsilon)?;
        check_non_negative("ucb_c", self.ucb_c)?;
        check_positive("alpha", self.alpha)?;
        check_positive("tau", self.tau)?;
        if let Some(step_size) = self.step_size {
            check_positive("step_size", step_size)?;
            check_unit("step_size", step_size)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub columns: usize,
    pub rows: usize,
    pub goal: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            columns: 7,
            rows: 6,
            goal: 4,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns == 0
            || self.rows == 0
            || self.goal == 0
            || self.goal > self.columns.max(self.rows)
        {
            return Err(ConfigError::InvalidBoard {
                columns: self.columns,
                rows: self.rows,
                goal: self.goal,
            });
        }
        Ok(())
    }
}

/// Hyperparameters of a Connect-X agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub learning_rate: f64,
    pub discount_factor: f64,
    /// Discount used for Monte-Carlo returns.
    pub mc_discount_factor: f64,
    pub epsilon: f64,
    pub epsilon_decay: f64,
    pub final_epsilon: f64,
    pub tau: f64,
    pub default_value: f64,
    pub seed: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            discount_factor: 0.9,
            mc_discount_factor: 0.99,
            epsilon: 0.1,
            epsilon_decay: 0.0,
            final_epsilon: 0.0,
            tau: 0.12,
            default_value: 0.0,
            seed: 42,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("alpha", self.learning_rate)?;
        check_unit("gamma", self.discount_factor)?;
        check_unit("gamma_mc", self.mc_discount_factor)?;
        check_unit("epsilon", self.epsilon)?;
        check_unit("final_epsilon", self.final_epsilon)?;
        check_non_negative("epsilon_decay", self.epsilon_decay)?;
        check_positive("tau", self.tau)?;
        Ok(())
    }
}
