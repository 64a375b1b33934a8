mod connect_agent;

pub use connect_agent::{ConnectAgent, Learning, Selection};

/// Bootstrap value of the next state given its action values and the
/// position of the action that will be taken there.
pub type GetNextQValue = fn(&[f64], usize, &[f64]) -> f64;
