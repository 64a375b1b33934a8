mod bandit_trainer;
mod connect_trainer;

pub use bandit_trainer::{average_runs, compare_modes, ExperimentResult};
pub use connect_trainer::{
    agent_play, play, self_play, train_agent, win_rates, TrainReport, WinRates,
};
