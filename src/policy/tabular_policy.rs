use fxhash::FxHashMap;

use super::Policy;

/// Lazily grown Q-table. Rows are only stored once they are written to and
/// are never evicted.
#[derive(Debug, Clone)]
pub struct TabularPolicy {
    default: Vec<f64>,
    policy: FxHashMap<String, Vec<f64>>,
}

impl TabularPolicy {
    pub fn new(n_actions: usize, default_value: f64) -> Self {
        Self {
            default: vec![default_value; n_actions],
            policy: FxHashMap::default(),
        }
    }

    pub fn n_actions(&self) -> usize {
        self.default.len()
    }

    pub fn get(&self, state: &str, action: usize) -> f64 {
        self.policy
            .get(state)
            .unwrap_or(&self.default)
            .get(action)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn set(&mut self, state: &str, action: usize, value: f64) {
        self.row_mut(state)[action] = value;
    }

    pub fn contains(&self, state: &str) -> bool {
        self.policy.contains_key(state)
    }

    /// Number of stored states.
    pub fn len(&self) -> usize {
        self.policy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policy.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.policy
            .iter()
            .map(|(state, values)| (state.as_str(), values.as_slice()))
    }

    fn row_mut(&mut self, state: &str) -> &mut Vec<f64> {
        let default = &self.default;
        self.policy
            .entry(state.to_owned())
            .or_insert_with(|| default.clone())
    }
}

impl Policy for TabularPolicy {
    fn get_values(&self, state: &str) -> Vec<f64> {
        self.policy.get(state).unwrap_or(&self.default).clone()
    }

    fn update(&mut self, state: &str, action: usize, delta: f64) -> f64 {
        let row = self.row_mut(state);
        row[action] += delta;
        row[action]
    }

    fn reset(&mut self) {
        self.policy = FxHashMap::default()
    }
}
