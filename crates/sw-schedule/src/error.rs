use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("day table parse error: {0}")]
    Parse(String),

    #[error("day table is empty")]
    EmptyDayTable,

    #[error("day {0} appears more than once in the day table")]
    DuplicateDay(u32),

    #[error("day numbers start at 1 (got {0})")]
    InvalidDay(u32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
