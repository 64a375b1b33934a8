use indexmap::IndexMap;
use kdam::tqdm;
use rand::{seq::SliceRandom, Rng};

use crate::agent::ConnectAgent;
use crate::env::{ConnectX, Outcome};
use crate::error::TrainingError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainReport {
    /// Games won per mark plus `"DRAW"`, in the order agent, opponent, draw.
    pub winners: IndexMap<String, u64>,
    pub history: Vec<Outcome>,
}

/// Cumulative outcome percentages after each epoch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WinRates {
    pub wins: Vec<f64>,
    pub losses: Vec<f64>,
    pub draws: Vec<f64>,
}

/// Mark used for the second side when an agent plays itself.
fn self_play_mark(mark: char) -> char {
    if mark == 'Z' {
        'Y'
    } else {
        'Z'
    }
}

fn play_turn(game: &mut ConnectX, agent: &mut ConnectAgent, mark: char) -> Result<(), TrainingError> {
    let legal: Vec<usize> = game.valid_moves();
    let column: usize = agent.select_action(game, mark)?;
    game.add_piece(column, mark)
        .map_err(|_| TrainingError::IllegalMove {
            mark,
            column,
            legal,
        })?;
    Ok(())
}

/// One game of `agent` against itself, the agent's mark moving first.
pub fn self_play(game: &mut ConnectX, agent: &mut ConnectAgent) -> Result<Outcome, TrainingError> {
    game.reset();
    let marks: [char; 2] = [agent.mark(), self_play_mark(agent.mark())];
    let mut turn: usize = 0;
    let outcome: Outcome = loop {
        if let Some(outcome) = game.outcome() {
            break outcome;
        }
        play_turn(game, agent, marks[turn % 2])?;
        turn += 1;
    };
    for mark in marks {
        agent.finish_episode(game, mark);
    }
    Ok(outcome)
}

/// One game between two agents; who moves first is drawn from `rng`.
pub fn agent_play<R: Rng + ?Sized>(
    game: &mut ConnectX,
    agent0: &mut ConnectAgent,
    agent1: &mut ConnectAgent,
    rng: &mut R,
) -> Result<Outcome, TrainingError> {
    if agent0.mark() == agent1.mark() {
        return Err(TrainingError::SameMark(agent0.mark()));
    }
    game.reset();
    let mut agents: [&mut ConnectAgent; 2] = [agent0, agent1];
    agents.shuffle(rng);
    let mut turn: usize = 0;
    let outcome: Outcome = loop {
        if let Some(outcome) = game.outcome() {
            break outcome;
        }
        let agent: &mut ConnectAgent = &mut *agents[turn % 2];
        let mark: char = agent.mark();
        play_turn(game, agent, mark)?;
        turn += 1;
    };
    for agent in agents {
        let mark: char = agent.mark();
        agent.finish_episode(game, mark);
    }
    Ok(outcome)
}

pub fn play<R: Rng + ?Sized>(
    game: &mut ConnectX,
    agent0: &mut ConnectAgent,
    agent1: Option<&mut ConnectAgent>,
    rng: &mut R,
) -> Result<Outcome, TrainingError> {
    match agent1 {
        Some(agent1) => agent_play(game, agent0, agent1, rng),
        None => self_play(game, agent0),
    }
}

/// Plays `epochs` games, against `agent1` when given and against itself
/// otherwise.
pub fn train_agent<R: Rng + ?Sized>(
    game: &mut ConnectX,
    agent0: &mut ConnectAgent,
    mut agent1: Option<&mut ConnectAgent>,
    epochs: usize,
    rng: &mut R,
) -> Result<TrainReport, TrainingError> {
    if let Some(agent1) = agent1.as_deref() {
        if agent1.mark() == agent0.mark() {
            return Err(TrainingError::SameMark(agent0.mark()));
        }
    }
    let opponent: char = agent1
        .as_ref()
        .map(|agent| agent.mark())
        .unwrap_or_else(|| self_play_mark(agent0.mark()));
    let mut report = TrainReport::default();
    for key in [
        Outcome::Winner(agent0.mark()),
        Outcome::Winner(opponent),
        Outcome::Draw,
    ] {
        report.winners.insert(key.to_string(), 0);
    }

    for _epoch in tqdm!(0..epochs) {
        let outcome: Outcome = play(game, agent0, agent1.as_deref_mut(), rng)?;
        *report.winners.entry(outcome.to_string()).or_insert(0) += 1;
        report.history.push(outcome);
    }

    tracing::info!(
        agent = %agent0.mark(),
        %opponent,
        epochs,
        winners = ?report.winners,
        states = agent0.policy().len(),
        "training finished"
    );
    Ok(report)
}

/// Running win, loss and draw percentages of `mark` over `history`.
pub fn win_rates(history: &[Outcome], mark: char) -> WinRates {
    let mut rates = WinRates::default();
    let (mut wins, mut losses, mut draws) = (0u64, 0u64, 0u64);
    for (epoch, outcome) in history.iter().enumerate() {
        match outcome {
            Outcome::Winner(winner) if *winner == mark => wins += 1,
            Outcome::Winner(_) => losses += 1,
            Outcome::Draw => draws += 1,
        }
        let played: f64 = (epoch + 1) as f64;
        rates.wins.push(100.0 * wins as f64 / played);
        rates.losses.push(100.0 * losses as f64 / played);
        rates.draws.push(100.0 * draws as f64 / played);
    }
    rates
}
