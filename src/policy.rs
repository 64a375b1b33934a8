mod tabular_policy;

pub use tabular_policy::TabularPolicy;

/// Action values keyed by a state string.
pub trait Policy {
    /// Values of every action in `state`; unseen states read as the default row.
    fn get_values(&self, state: &str) -> Vec<f64>;

    /// Adds `delta` to the value of `action` in `state` and returns the new value.
    fn update(&mut self, state: &str, action: usize, delta: f64) -> f64;

    fn reset(&mut self);
}
