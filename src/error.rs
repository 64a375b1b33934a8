/// Invalid construction parameters or hyperparameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("a bandit needs at least one arm")]
    NoArms,

    #[error("no arm has a comparable mean")]
    UnrankableArms,

    #[error("invalid board: {columns} columns x {rows} rows with goal {goal}")]
    InvalidBoard {
        columns: usize,
        rows: usize,
        goal: usize,
    },

    #[error("invalid value {value} for {name}: {reason}")]
    InvalidHyperparameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("unknown hyperparameter '{0}'")]
    UnknownHyperparameter(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BanditError {
    #[error("arm {arm} does not exist (problem has {arms} arms)")]
    InvalidArm { arm: usize, arms: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Reasons a piece cannot be dropped. The board is untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("the game is already over")]
    GameOver,

    #[error("{column}: invalid move, there are only {columns} columns")]
    InvalidColumn { column: usize, columns: usize },

    #[error("{0}: invalid move, column is full")]
    ColumnFull(usize),

    #[error("player mark cannot be '{0}'")]
    InvalidMark(char),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrainingError {
    #[error("move {column} by agent {mark} failed (valid moves: {legal:?})")]
    IllegalMove {
        mark: char,
        column: usize,
        legal: Vec<usize>,
    },

    #[error("agent {0} was asked to move but no column is free")]
    NoValidMoves(char),

    #[error("both players use mark '{0}'")]
    SameMark(char),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_display() {
        assert_eq!(
            MoveError::ColumnFull(3).to_string(),
            "3: invalid move, column is full"
        );
        assert_eq!(
            MoveError::InvalidMark('0').to_string(),
            "player mark cannot be '0'"
        );
    }

    #[test]
    fn test_training_error_display() {
        let err = TrainingError::IllegalMove {
            mark: 'A',
            column: 5,
            legal: vec![0, 1, 2],
        };
        assert_eq!(
            err.to_string(),
            "move 5 by agent A failed (valid moves: [0, 1, 2])"
        );
    }

    #[test]
    fn test_config_error_wraps() {
        let err: TrainingError = ConfigError::UnknownHyperparameter("beta".into()).into();
        assert_eq!(err.to_string(), "unknown hyperparameter 'beta'");
    }
}
