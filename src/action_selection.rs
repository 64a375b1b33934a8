mod epsilon_greedy;
mod gradient_bandit;
mod greedy;
mod softmax;
mod upper_confidence_bound;

use enum_dispatch::enum_dispatch;
pub use epsilon_greedy::EpsilonGreedy;
pub use gradient_bandit::GradientBandit;
pub use greedy::Greedy;
pub use softmax::Softmax;
pub use upper_confidence_bound::UpperConfidenceBound;

/// Chooses an index into a slice of value estimates.
///
/// Implementations own their random source, so two selectors built with the
/// same seed make the same choices.
#[enum_dispatch]
pub trait ActionSelection {
    fn get_action(&mut self, values: &[f64]) -> usize;
    /// Feedback for the action that was just taken.
    fn observe(&mut self, action: usize, reward: f64);
    /// Called once at the end of each episode.
    fn update(&mut self);
    fn get_exploration_probs(&mut self, values: &[f64]) -> Vec<f64>;
    fn reset(&mut self);
}

#[derive(Debug, Clone)]
#[enum_dispatch(ActionSelection)]
pub enum EnumActionSelection {
    Greedy(Greedy),
    EpsilonGreedy(EpsilonGreedy),
    UpperConfidenceBound(UpperConfidenceBound),
    Softmax(Softmax),
    GradientBandit(GradientBandit),
}
