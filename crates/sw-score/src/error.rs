use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    /// Only thieves can reach three warnings; an innocent with that many
    /// means the caller passed inconsistent agent state.
    #[error("a non-thief cannot have shown {warnings} warnings")]
    ImpossibleWarningCount { warnings: u8 },
}

pub type ScoreResult<T> = Result<T, ScoreError>;
