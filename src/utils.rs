use rand::Rng;

pub fn argmax<T: PartialOrd>(values: &[T]) -> usize {
    let mut result: usize = 0;
    for (i, v) in values.iter().enumerate() {
        if v > &values[result] {
            result = i;
        }
    }
    result
}

/// Index of a maximal value, chosen uniformly among ties.
pub fn random_argmax<R: Rng + ?Sized>(values: &[f64], rng: &mut R) -> usize {
    let best: f64 = max(values);
    let ties: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v == best)
        .map(|(i, _)| i)
        .collect();
    match ties.len() {
        0 => argmax(values),
        1 => ties[0],
        n => ties[rng.gen_range(0..n)],
    }
}

pub fn max(values: &[f64]) -> f64 {
    values.iter().fold(f64::NEG_INFINITY, |acc, v| acc.max(*v))
}

pub fn categorical_sample(probs: &[f64], random: f64) -> usize {
    let mut cumulative: f64 = 0.0;
    for (i, p) in probs.iter().enumerate() {
        cumulative += p;
        if cumulative > random {
            return i;
        }
    }
    probs.len().saturating_sub(1)
}

/// Exponential normalisation of `values / temperature`, shifted by the max
/// so large estimates do not overflow.
pub fn softmax(values: &[f64], temperature: f64) -> Vec<f64> {
    let top: f64 = max(values);
    let exps: Vec<f64> = values
        .iter()
        .map(|v| ((v - top) / temperature).exp())
        .collect();
    let total: f64 = exps.iter().sum();
    exps.iter().map(|e| e / total).collect()
}

pub fn moving_average(window: usize, vector: &[f64]) -> Vec<f64> {
    let window = window.max(1);
    let mut aux: usize = 0;
    let mut result: Vec<f64> = vec![];
    while aux < vector.len() {
        let end: usize = if aux + window < vector.len() {
            aux + window
        } else {
            vector.len()
        };
        let slice: &[f64] = &vector[aux..end];
        let r: f64 = slice.iter().sum();
        result.push(r / slice.len() as f64);
        aux = end;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn argmax_returns_first_maximum() {
        assert_eq!(argmax(&[0.1, 0.7, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[3, 1, 2]), 0);
    }

    #[test]
    fn random_argmax_only_returns_ties() {
        let mut rng = StdRng::seed_from_u64(7);
        let values = [0.5, 0.9, 0.1, 0.9, 0.9];
        let mut seen = [false; 5];
        for _ in 0..500 {
            let i = random_argmax(&values, &mut rng);
            assert_eq!(values[i], 0.9);
            seen[i] = true;
        }
        assert!(seen[1] && seen[3] && seen[4]);
    }

    #[test]
    fn categorical_sample_walks_cumulative_mass() {
        let probs = [0.2, 0.5, 0.3];
        assert_eq!(categorical_sample(&probs, 0.0), 0);
        assert_eq!(categorical_sample(&probs, 0.69), 1);
        assert_eq!(categorical_sample(&probs, 0.71), 2);
        assert_eq!(categorical_sample(&probs, 0.999_999_9), 2);
    }

    #[test]
    fn softmax_is_a_distribution() {
        let probs = softmax(&[1000.0, 0.0, -3.0, 999.0], 0.12);
        assert!(probs.iter().all(|p| *p >= 0.0));
        assert_relative_eq!(probs.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert!(probs[0] > probs[3]);
    }

    #[test]
    fn softmax_of_equal_values_is_uniform() {
        for p in softmax(&[0.3; 4], 1.0) {
            assert_relative_eq!(p, 0.25);
        }
    }

    #[test]
    fn moving_average_blocks() {
        let ma = moving_average(2, &[1.0, 3.0, 5.0, 7.0]);
        assert_eq!(ma, vec![2.0, 6.0]);
    }

    #[test]
    fn moving_average_partial_last_block() {
        assert_eq!(moving_average(2, &[1.0, 3.0, 5.0]), vec![2.0, 5.0]);
        assert_eq!(moving_average(100, &[1.0; 150]), vec![1.0, 1.0]);
    }
}
