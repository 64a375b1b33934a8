use approx::assert_relative_eq;
use bandit_connectx::bandit::{ArmDistribution, BanditAgent, Dist, Mode, Problem};
use bandit_connectx::config::BanditConfig;

fn bernoulli_problem(probs: &[f64], seed: u64) -> Problem {
    let arms = probs
        .iter()
        .map(|p| ArmDistribution::bernoulli(*p).unwrap())
        .collect();
    Problem::from_arms(Dist::Bernoulli, arms, seed).unwrap()
}

#[test]
fn estimates_are_the_mean_of_observed_rewards() {
    let config = BanditConfig {
        epsilon: 0.5,
        ..Default::default()
    };
    let problem = Problem::new(config.arms, Dist::Gauss, 8).unwrap();
    let mut agent = BanditAgent::new(problem, Mode::EpsilonGreedy, &config).unwrap();
    let mut sums = vec![0.0; config.arms];
    let mut pulls = vec![0u64; config.arms];
    for _ in 0..300 {
        let record = agent.step().unwrap();
        sums[record.arm] += record.reward;
        pulls[record.arm] += 1;
    }
    for arm in 0..config.arms {
        assert_eq!(agent.counts()[arm], pulls[arm]);
        if pulls[arm] > 0 {
            assert_relative_eq!(
                agent.estimates()[arm],
                sums[arm] / pulls[arm] as f64,
                epsilon = 1e-9
            );
        }
    }
}

#[test]
fn ucb_settles_on_the_best_arm() {
    let config = BanditConfig::default();
    let problem = bernoulli_problem(&[0.1, 0.2, 0.9], 21);
    let mut agent = BanditAgent::new(problem, Mode::Ucb, &config).unwrap();
    let history = agent.run(2000).unwrap();
    assert!(*history.accuracy.last().unwrap() > 0.8);
    assert!(*history.average_rewards.last().unwrap() > 0.7);
}

#[test]
fn preference_probabilities_stay_on_the_simplex() {
    let config = BanditConfig::default();
    let problem = Problem::new(config.arms, Dist::Bernoulli, 13).unwrap();
    let mut agent = BanditAgent::new(problem, Mode::ActionPreferences, &config).unwrap();
    for _ in 0..200 {
        agent.step().unwrap();
        let probs = agent.probabilities();
        assert!(probs.iter().all(|p| *p >= 0.0));
        assert_relative_eq!(probs.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
    }
}

#[test]
fn greedy_only_pulls_maximal_estimates() {
    let config = BanditConfig::default();
    let problem = Problem::new(config.arms, Dist::Gauss, 4).unwrap();
    let mut agent = BanditAgent::new(problem, Mode::Greedy, &config).unwrap();
    for _ in 0..100 {
        let best = agent
            .estimates()
            .iter()
            .fold(f64::NEG_INFINITY, |acc, q| acc.max(*q));
        let before = agent.estimates().clone();
        let record = agent.step().unwrap();
        assert_eq!(before[record.arm], best);
    }
}
