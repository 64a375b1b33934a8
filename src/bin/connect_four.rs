use bandit_connectx::agent::{ConnectAgent, Learning, Selection};
use bandit_connectx::config::{AgentConfig, GameConfig};
use bandit_connectx::env::ConnectX;
use bandit_connectx::error::TrainingError;
use bandit_connectx::trainer::{train_agent, win_rates};

extern crate structopt;

use rand::{rngs::StdRng, SeedableRng};
use structopt::StructOpt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Train a tabular agent to play Connect-X, against itself or an opponent
#[derive(StructOpt, Debug)]
#[structopt(name = "connect_four")]
struct Cli {
    /// Number of games to play
    #[structopt(long = "epochs", short = "n", default_value = "1000")]
    epochs: usize,

    #[structopt(long = "columns", default_value = "7")]
    columns: usize,

    #[structopt(long = "rows", default_value = "6")]
    rows: usize,

    /// Pieces in a row needed to win
    #[structopt(long = "goal", default_value = "4")]
    goal: usize,

    /// Update rule of the trained agent: none, q, sarsa, expected_sarsa or mc
    #[structopt(long = "learning", default_value = "q")]
    learning: Learning,

    /// Column selection of the trained agent
    #[structopt(long = "selection", default_value = "epsilon_greedy")]
    selection: Selection,

    /// Column selection of the opponent; the agent plays itself when absent
    #[structopt(long = "opponent")]
    opponent: Option<Selection>,

    /// Update rule of the opponent
    #[structopt(long = "opponent_learning", default_value = "none")]
    opponent_learning: Learning,

    /// Learning rate of the agents
    #[structopt(long = "learning_rate", default_value = "0.5")]
    learning_rate: f64,

    /// Discount factor of the one-step updates
    #[structopt(long = "discount_factor", default_value = "0.9")]
    discount_factor: f64,

    /// Discount factor of the Monte-Carlo returns
    #[structopt(long = "mc_discount_factor", default_value = "0.99")]
    mc_discount_factor: f64,

    /// Initial value for the exploration ratio
    #[structopt(long = "epsilon", default_value = "0.1")]
    epsilon: f64,

    /// Exploration ratio subtracted after every game
    #[structopt(long = "epsilon_decay", default_value = "0.0")]
    epsilon_decay: f64,

    /// Final value for the exploration ratio
    #[structopt(long = "final_epsilon", default_value = "0.0")]
    final_epsilon: f64,

    /// Temperature of the softmax selection
    #[structopt(long = "tau", default_value = "0.12")]
    tau: f64,

    /// Value of state-action pairs never updated
    #[structopt(long = "default_value", default_value = "0.0")]
    default_value: f64,

    /// Number of checkpoints at which the running win rates are printed
    #[structopt(long = "checkpoints", default_value = "10")]
    checkpoints: usize,

    #[structopt(long = "seed", default_value = "42")]
    seed: u64,
}

impl From<&Cli> for AgentConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            learning_rate: cli.learning_rate,
            discount_factor: cli.discount_factor,
            mc_discount_factor: cli.mc_discount_factor,
            epsilon: cli.epsilon,
            epsilon_decay: cli.epsilon_decay,
            final_epsilon: cli.final_epsilon,
            tau: cli.tau,
            default_value: cli.default_value,
            seed: cli.seed,
        }
    }
}

fn run(cli: &Cli) -> Result<(), TrainingError> {
    let game_config = GameConfig {
        columns: cli.columns,
        rows: cli.rows,
        goal: cli.goal,
    };
    let mut game = ConnectX::from_config(&game_config)?;
    let agent_config = AgentConfig::from(cli);
    let mut agent = ConnectAgent::new('A', cli.selection, cli.learning, &agent_config)?;
    let mut opponent: Option<ConnectAgent> = match cli.opponent {
        Some(selection) => {
            let opponent_config = AgentConfig {
                seed: cli.seed.wrapping_add(1),
                ..agent_config.clone()
            };
            Some(ConnectAgent::new(
                'B',
                selection,
                cli.opponent_learning,
                &opponent_config,
            )?)
        }
        None => None,
    };
    let mut rng = StdRng::seed_from_u64(cli.seed);

    let report = train_agent(&mut game, &mut agent, opponent.as_mut(), cli.epochs, &mut rng)?;

    println!(
        "{} ({}) vs {}: {} games on {}x{}, goal {}",
        cli.selection.name(),
        cli.learning.name(),
        cli.opponent.map(|s| s.name()).unwrap_or("SELF"),
        cli.epochs,
        cli.columns,
        cli.rows,
        cli.goal
    );
    for (winner, count) in &report.winners {
        println!("{:<6} {}", winner, count);
    }

    let rates = win_rates(&report.history, agent.mark());
    let every: usize = (report.history.len() / cli.checkpoints.max(1)).max(1);
    println!("{:>8} {:>8} {:>8} {:>8}", "epoch", "win%", "loss%", "draw%");
    for epoch in (every - 1..report.history.len()).step_by(every) {
        println!(
            "{:>8} {:>8.2} {:>8.2} {:>8.2}",
            epoch + 1,
            rates.wins[epoch],
            rates.losses[epoch],
            rates.draws[epoch]
        );
    }
    println!("states learned: {}", agent.policy().len());
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
