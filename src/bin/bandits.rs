use bandit_connectx::bandit::{Dist, Mode};
use bandit_connectx::config::BanditConfig;
use bandit_connectx::error::BanditError;
use bandit_connectx::trainer::{average_runs, compare_modes, ExperimentResult};
use bandit_connectx::utils::moving_average;

extern crate structopt;

use structopt::StructOpt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Average the k-armed bandit selection modes over many fresh problems
#[derive(StructOpt, Debug)]
#[structopt(name = "bandits")]
struct Cli {
    /// Reward distribution of the arms: gauss or bernoulli
    #[structopt(long = "dist", default_value = "gauss")]
    dist: Dist,

    /// Run a single selection mode instead of all of them
    #[structopt(long = "mode")]
    mode: Option<Mode>,

    /// Number of arms of each problem
    #[structopt(long = "arms", short = "k", default_value = "7")]
    arms: usize,

    /// Number of pulls per run
    #[structopt(long = "steps", default_value = "1000")]
    steps: usize,

    /// Number of runs to average over
    #[structopt(long = "runs", short = "n", default_value = "1000")]
    runs: usize,

    /// Exploration ratio of the epsilon-greedy mode
    #[structopt(long = "epsilon", default_value = "0.38")]
    epsilon: f64,

    /// Confidence level of the UCB mode
    #[structopt(long = "ucb_c", default_value = "0.38")]
    ucb_c: f64,

    /// Step size of the action preferences mode
    #[structopt(long = "alpha", default_value = "0.9")]
    alpha: f64,

    /// Temperature of the softmax mode
    #[structopt(long = "tau", default_value = "0.12")]
    tau: f64,

    /// Initial estimate of the optimistic mode
    #[structopt(long = "optimistic_value", default_value = "1.0")]
    optimistic_value: f64,

    /// Constant step size for the estimates, sample averages when absent
    #[structopt(long = "step_size")]
    step_size: Option<f64>,

    /// Window of the moving average printed for each curve
    #[structopt(long = "moving_average_window", default_value = "100")]
    moving_average_window: usize,

    #[structopt(long = "seed", default_value = "42")]
    seed: u64,
}

impl From<&Cli> for BanditConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            arms: cli.arms,
            steps: cli.steps,
            runs: cli.runs,
            epsilon: cli.epsilon,
            ucb_c: cli.ucb_c,
            alpha: cli.alpha,
            tau: cli.tau,
            optimistic_value: cli.optimistic_value,
            step_size: cli.step_size,
            seed: cli.seed,
        }
    }
}

fn print_result(result: &ExperimentResult, window: usize) {
    println!(
        "{:<20} reward {:.4}  accuracy {:.4}  regret {:.2}",
        result.mode.name(),
        result.final_average_reward(),
        result.final_accuracy(),
        result.final_regret(),
    );
    let rewards: Vec<f64> = result.average_rewards.to_vec();
    let smoothed: Vec<String> = moving_average(window, &rewards)
        .iter()
        .map(|r| format!("{:.3}", r))
        .collect();
    println!("{:<20} {}", "", smoothed.join(" "));
}

fn run(cli: &Cli) -> Result<(), BanditError> {
    let config = BanditConfig::from(cli);
    let results: Vec<ExperimentResult> = match cli.mode {
        Some(mode) => vec![average_runs(cli.dist, mode, &config)?],
        None => compare_modes(cli.dist, &config)?,
    };
    println!(
        "{} bandit, {} arms, {} steps, {} runs",
        cli.dist.name(),
        config.arms,
        config.steps,
        config.runs
    );
    for result in &results {
        print_result(result, cli.moving_average_window);
    }
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli: Cli = Cli::from_args();
    if let Err(err) = run(&cli) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
