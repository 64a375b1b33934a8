pub mod action_selection;
pub mod agent;
pub mod bandit;
pub mod config;
pub mod env;
pub mod error;
pub mod policy;
pub mod policy_update;
pub mod trainer;
pub mod utils;
