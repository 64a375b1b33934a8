use fxhash::FxHashMap;

use crate::action_selection::{
    ActionSelection, EnumActionSelection, EpsilonGreedy, Greedy, Softmax,
};
use crate::config::AgentConfig;
use crate::env::{ConnectX, EMPTY};
use crate::error::{ConfigError, MoveError, TrainingError};
use crate::policy::{Policy, TabularPolicy};
use crate::policy_update::{
    discounted_returns, expected_sarsa, qlearning, sarsa, temporal_difference,
};

use super::GetNextQValue;

/// How a [`ConnectAgent`] picks a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    Random,
    /// Round-robin over the columns, skipping full ones.
    Brick,
    Greedy,
    EpsilonGreedy,
    Softmax,
}

impl Selection {
    pub const ALL: [Selection; 5] = [
        Selection::Random,
        Selection::Brick,
        Selection::Greedy,
        Selection::EpsilonGreedy,
        Selection::Softmax,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Selection::Random => "RANDOM",
            Selection::Brick => "BRICK",
            Selection::Greedy => "GREEDY",
            Selection::EpsilonGreedy => "EPSILON_GREEDY",
            Selection::Softmax => "SOFTMAX",
        }
    }

    fn build(&self, config: &AgentConfig) -> EnumActionSelection {
        match self {
            Selection::Random => EpsilonGreedy::constant(1.0, config.seed).into(),
            Selection::Brick | Selection::Greedy => Greedy::new(config.seed).into(),
            Selection::EpsilonGreedy => EpsilonGreedy::linear(
                config.epsilon,
                config.epsilon_decay,
                config.final_epsilon,
                config.seed,
            )
            .into(),
            Selection::Softmax => Softmax::new(config.tau, config.seed).into(),
        }
    }
}

impl std::str::FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selection::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("invalid selection '{}'", s))
    }
}

/// How a [`ConnectAgent`] updates its Q-table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Learning {
    None,
    QLearning,
    Sarsa,
    /// Expectation over the policy actually followed; the brick layer is
    /// deterministic, so it weighs only the column it picked.
    ExpectedSarsa,
    /// Every-visit constant step-size Monte-Carlo on the discounted returns.
    MonteCarlo,
}

impl Learning {
    pub const ALL: [Learning; 5] = [
        Learning::None,
        Learning::QLearning,
        Learning::Sarsa,
        Learning::ExpectedSarsa,
        Learning::MonteCarlo,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Learning::None => "NONE",
            Learning::QLearning => "Q",
            Learning::Sarsa => "SARSA",
            Learning::ExpectedSarsa => "EXPECTED_SARSA",
            Learning::MonteCarlo => "MC",
        }
    }

    /// Bootstrap rule for the one-step modes.
    fn next_value(&self) -> Option<GetNextQValue> {
        let next_value: GetNextQValue = match self {
            Learning::QLearning => qlearning,
            Learning::Sarsa => sarsa,
            Learning::ExpectedSarsa => expected_sarsa,
            Learning::None | Learning::MonteCarlo => return None,
        };
        Some(next_value)
    }
}

impl std::str::FromStr for Learning {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Learning::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("invalid learning mode '{}'", s))
    }
}

/// Tabular Connect-X player.
///
/// States are read from the perspective of the mark being played, so a
/// single agent (and a single Q-table) can take both sides of a game.
/// Episode memory is kept per mark for the same reason.
pub struct ConnectAgent {
    mark: char,
    selection: Selection,
    learning: Learning,
    config: AgentConfig,
    action_selection: EnumActionSelection,
    policy: TabularPolicy,
    brick_column: usize,
    episodes: FxHashMap<char, Vec<(String, usize)>>,
    training_error: Vec<f64>,
}

impl ConnectAgent {
    pub fn new(
        mark: char,
        selection: Selection,
        learning: Learning,
        config: &AgentConfig,
    ) -> Result<Self, TrainingError> {
        if mark == EMPTY {
            return Err(MoveError::InvalidMark(mark).into());
        }
        config.validate()?;
        Ok(Self {
            mark,
            selection,
            learning,
            action_selection: selection.build(config),
            policy: TabularPolicy::new(0, config.default_value),
            config: config.clone(),
            brick_column: 0,
            episodes: FxHashMap::default(),
            training_error: vec![],
        })
    }

    pub fn mark(&self) -> char {
        self.mark
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn learning(&self) -> Learning {
        self.learning
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn policy(&self) -> &TabularPolicy {
        &self.policy
    }

    pub fn training_error(&self) -> &[f64] {
        &self.training_error
    }

    /// Current exploration rate, if the agent explores with epsilon.
    pub fn epsilon(&self) -> Option<f64> {
        match &self.action_selection {
            EnumActionSelection::EpsilonGreedy(selector) => Some(selector.epsilon),
            _ => None,
        }
    }

    fn prepare(&mut self, columns: usize) {
        if self.policy.n_actions() != columns {
            self.policy = TabularPolicy::new(columns, self.config.default_value);
        }
    }

    fn brick_layer(&mut self, legal: &[usize], columns: usize) -> usize {
        for _ in 0..columns {
            self.brick_column = (self.brick_column + 1) % columns;
            if let Some(i) = legal.iter().position(|c| *c == self.brick_column) {
                return i;
            }
        }
        0
    }

    fn learn(&mut self, state: &str, action: usize, reward: f64, future_q_value: f64) {
        let curr_q_value: f64 = self.policy.get(state, action);
        let td: f64 = temporal_difference(
            curr_q_value,
            reward,
            self.config.discount_factor,
            future_q_value,
        );
        self.policy
            .update(state, action, self.config.learning_rate * td);
        self.training_error.push(td);
    }

    /// Picks a legal column for `mark` and, in the one-step modes, backs up
    /// the previous move `mark` made this episode.
    pub fn select_action(&mut self, game: &ConnectX, mark: char) -> Result<usize, TrainingError> {
        let legal: Vec<usize> = game.valid_moves();
        if legal.is_empty() {
            return Err(TrainingError::NoValidMoves(mark));
        }
        self.prepare(game.columns());

        let state: String = game.get_state(Some(mark), 0);
        let values: Vec<f64> = self.policy.get_values(&state);
        let legal_values: Vec<f64> = legal.iter().map(|c| values[*c]).collect();
        let choice: usize = match self.selection {
            Selection::Brick => self.brick_layer(&legal, game.columns()),
            _ => self.action_selection.get_action(&legal_values),
        };
        let action: usize = legal[choice];

        if let Some(next_value) = self.learning.next_value() {
            let previous = self
                .episodes
                .get(&mark)
                .and_then(|episode| episode.last())
                .cloned();
            if let Some((prev_state, prev_action)) = previous {
                let probs: Vec<f64> = match self.selection {
                    Selection::Brick => {
                        let mut probs: Vec<f64> = vec![0.0; legal.len()];
                        probs[choice] = 1.0;
                        probs
                    }
                    _ => self.action_selection.get_exploration_probs(&legal_values),
                };
                let future_q_value: f64 = next_value(&legal_values, choice, &probs);
                self.learn(&prev_state, prev_action, 0.0, future_q_value);
            }
        }

        tracing::trace!(agent = %self.mark, %mark, %state, action, "selected column");
        self.episodes.entry(mark).or_default().push((state, action));
        Ok(action)
    }

    /// Terminal update for `mark` once `game` is over, then clears that
    /// mark's episode memory and lets the selector decay its exploration.
    pub fn finish_episode(&mut self, game: &ConnectX, mark: char) {
        let reward: f64 = game.get_reward(mark);
        let trajectory: Vec<(String, usize)> = self.episodes.remove(&mark).unwrap_or_default();
        match self.learning {
            Learning::None => {}
            Learning::MonteCarlo => {
                let mut rewards: Vec<f64> = vec![0.0; trajectory.len()];
                if let Some(last) = rewards.last_mut() {
                    *last = reward;
                }
                let returns = discounted_returns(&rewards, self.config.mc_discount_factor);
                for ((state, action), g) in trajectory.iter().zip(returns) {
                    let curr_q_value: f64 = self.policy.get(state, *action);
                    let error: f64 = g - curr_q_value;
                    self.policy
                        .update(state, *action, self.config.learning_rate * error);
                    self.training_error.push(error);
                }
            }
            Learning::QLearning | Learning::Sarsa | Learning::ExpectedSarsa => {
                if let Some((state, action)) = trajectory.last() {
                    let curr_q_value: f64 = self.policy.get(state, *action);
                    let td: f64 = temporal_difference(curr_q_value, reward, 0.0, 0.0);
                    self.policy
                        .update(state, *action, self.config.learning_rate * td);
                    self.training_error.push(td);
                }
            }
        }
        self.action_selection.update();
        tracing::debug!(
            agent = %self.mark,
            %mark,
            reward,
            moves = trajectory.len(),
            states = self.policy.len(),
            "episode finished"
        );
    }

    pub fn set_hyperparameter(&mut self, name: &str, value: f64) -> Result<(), ConfigError> {
        let mut config: AgentConfig = self.config.clone();
        match name {
            "alpha" => config.learning_rate = value,
            "gamma" => config.discount_factor = value,
            "gamma_mc" => config.mc_discount_factor = value,
            "epsilon" => config.epsilon = value,
            "tau" => config.tau = value,
            _ => return Err(ConfigError::UnknownHyperparameter(name.to_owned())),
        }
        config.validate()?;
        match (&mut self.action_selection, name) {
            (EnumActionSelection::EpsilonGreedy(selector), "epsilon")
                if self.selection == Selection::EpsilonGreedy =>
            {
                selector.initial_epsilon = value;
                selector.epsilon = value;
            }
            (EnumActionSelection::Softmax(selector), "tau") => selector.set_temperature(value),
            _ => {}
        }
        self.config = config;
        Ok(())
    }

    /// Forgets the Q-table and any episode in progress.
    pub fn reset(&mut self) {
        self.policy.reset();
        self.episodes.clear();
        self.training_error.clear();
        self.action_selection.reset();
        self.brick_column = 0;
    }
}
