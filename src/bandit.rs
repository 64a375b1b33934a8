mod agent;
mod problem;

pub use agent::{BanditAgent, Mode, RunHistory, StepRecord};
pub use problem::{ArmDistribution, Dist, Problem, Pull};
