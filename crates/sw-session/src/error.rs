use sw_core::{AgentId, CoreError};
use sw_score::ScoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("decision rejected: {0}")]
    Score(#[from] ScoreError),

    #[error("{0} is not an active customer")]
    UnknownAgent(AgentId),

    #[error("no day is in progress")]
    DayNotInProgress,

    #[error("cannot {action} day {day} while it is {status}")]
    InvalidDayTransition {
        day:    u32,
        status: &'static str,
        action: &'static str,
    },
}

pub type SessionResult<T> = Result<T, SessionError>;
