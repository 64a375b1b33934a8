use std::fmt::Display;

use crate::config::GameConfig;
use crate::error::{ConfigError, MoveError};

/// Mark of an empty cell. Players may not use it.
pub const EMPTY: char = '0';

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Winner(char),
    Draw,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(mark) => write!(f, "{}", mark),
            Outcome::Draw => write!(f, "DRAW"),
        }
    }
}

/// A Connect-X game. Row 0 is the top of the board and cells are stored
/// row-major, so pieces fall towards higher indices.
#[derive(Debug, Clone)]
pub struct ConnectX {
    columns: usize,
    rows: usize,
    goal: usize,
    board: Vec<char>,
    history: Vec<Vec<char>>,
    moves: Vec<(char, usize)>,
    turn: usize,
    outcome: Option<Outcome>,
}

impl Default for ConnectX {
    fn default() -> Self {
        let config = GameConfig::default();
        Self::empty(config.columns, config.rows, config.goal)
    }
}

impl ConnectX {
    const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

    pub fn new(columns: usize, rows: usize, goal: usize) -> Result<Self, ConfigError> {
        GameConfig {
            columns,
            rows,
            goal,
        }
        .validate()?;
        Ok(Self::empty(columns, rows, goal))
    }

    pub fn from_config(config: &GameConfig) -> Result<Self, ConfigError> {
        Self::new(config.columns, config.rows, config.goal)
    }

    fn empty(columns: usize, rows: usize, goal: usize) -> Self {
        let board: Vec<char> = vec![EMPTY; columns * rows];
        Self {
            columns,
            rows,
            goal,
            history: vec![board.clone()],
            board,
            moves: vec![],
            turn: 0,
            outcome: None,
        }
    }

    pub fn reset(&mut self) {
        self.board = vec![EMPTY; self.columns * self.rows];
        self.history = vec![self.board.clone()];
        self.moves = vec![];
        self.turn = 0;
        self.outcome = None;
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn goal(&self) -> usize {
        self.goal
    }

    pub fn board(&self) -> &[char] {
        &self.board
    }

    /// Number of pieces placed since the last reset.
    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn moves(&self) -> &[(char, usize)] {
        &self.moves
    }

    pub fn last_move(&self) -> Option<(char, usize)> {
        self.moves.last().copied()
    }

    /// Move made `traceback` moves ago, clamped to the first move.
    pub fn get_move(&self, traceback: usize) -> Option<(char, usize)> {
        let idx: usize = self.moves.len().checked_sub(1 + traceback).unwrap_or(0);
        self.moves.get(idx).copied()
    }

    fn column_has_space(&self, column: usize) -> bool {
        self.board[column] == EMPTY
    }

    /// Columns that can still take a piece. Empty once the game is over.
    pub fn valid_moves(&self) -> Vec<usize> {
        if self.is_terminal() {
            return vec![];
        }
        (0..self.columns)
            .filter(|c| self.column_has_space(*c))
            .collect()
    }

    fn drop_piece(&mut self, column: usize, mark: char) -> usize {
        let mut pos: usize = column;
        for row in (0..self.rows).rev() {
            let i: usize = row * self.columns + column;
            if self.board[i] == EMPTY {
                pos = i;
                break;
            }
        }
        self.board[pos] = mark;
        pos
    }

    fn count_direction(&self, row: usize, column: usize, dr: isize, dc: isize, mark: char) -> usize {
        let mut count: usize = 0;
        let mut r: isize = row as isize + dr;
        let mut c: isize = column as isize + dc;
        while r >= 0
            && c >= 0
            && (r as usize) < self.rows
            && (c as usize) < self.columns
            && self.board[r as usize * self.columns + c as usize] == mark
        {
            count += 1;
            r += dr;
            c += dc;
        }
        count
    }

    fn check_win(&self, pos: usize, mark: char) -> bool {
        let (row, column) = (pos / self.columns, pos % self.columns);
        Self::DIRECTIONS.iter().any(|(dr, dc)| {
            1 + self.count_direction(row, column, *dr, *dc, mark)
                + self.count_direction(row, column, -dr, -dc, mark)
                >= self.goal
        })
    }

    /// Drops a piece of `mark` into `column` and returns the board index it
    /// landed on. The board is left untouched when the move is rejected.
    pub fn add_piece(&mut self, column: usize, mark: char) -> Result<usize, MoveError> {
        if self.is_terminal() {
            tracing::warn!(column, %mark, "move after the game ended");
            return Err(MoveError::GameOver);
        }
        if mark == EMPTY {
            return Err(MoveError::InvalidMark(mark));
        }
        if column >= self.columns {
            tracing::warn!(column, %mark, "invalid move");
            return Err(MoveError::InvalidColumn {
                column,
                columns: self.columns,
            });
        }
        if !self.column_has_space(column) {
            tracing::warn!(column, %mark, "invalid move, column is full");
            return Err(MoveError::ColumnFull(column));
        }

        let pos: usize = self.drop_piece(column, mark);
        self.turn += 1;
        if self.check_win(pos, mark) {
            self.outcome = Some(Outcome::Winner(mark));
        } else if !self.board.contains(&EMPTY) {
            self.outcome = Some(Outcome::Draw);
        }
        self.moves.push((mark, column));
        self.history.push(self.board.clone());
        if let Some(outcome) = self.outcome {
            tracing::trace!(turn = self.turn, %outcome, "game over");
        }
        Ok(pos)
    }

    /// 1 if `mark` won, -1 if it lost, 0 on a draw or while the game runs.
    pub fn get_reward(&self, mark: char) -> f64 {
        match self.outcome {
            Some(Outcome::Winner(winner)) if winner == mark => 1.0,
            Some(Outcome::Winner(_)) => -1.0,
            _ => 0.0,
        }
    }

    pub fn step(&mut self, column: usize, mark: char) -> Result<f64, MoveError> {
        self.add_piece(column, mark)?;
        Ok(self.get_reward(mark))
    }

    /// Board `traceback` moves ago as a string. With a perspective, that
    /// mark's pieces read `'1'` and every other piece `'2'`.
    pub fn get_state(&self, perspective: Option<char>, traceback: usize) -> String {
        let idx: usize = self.history.len().checked_sub(1 + traceback).unwrap_or(0);
        let board: &[char] = &self.history[idx];
        match perspective {
            None => board.iter().collect(),
            Some(mark) => board
                .iter()
                .map(|p| {
                    if *p == EMPTY {
                        '0'
                    } else if *p == mark {
                        '1'
                    } else {
                        '2'
                    }
                })
                .collect(),
        }
    }

    /// Repeats the final state so the side that did not make the last move
    /// can observe it too.
    pub fn copy_end_state(&mut self) {
        if let Some(last) = self.history.last().cloned() {
            self.history.push(last);
        }
        if let Some(last) = self.moves.last().copied() {
            self.moves.push(last);
        }
        self.turn += 1;
    }
}
