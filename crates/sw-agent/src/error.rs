use sw_core::AgentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("cannot create {0}: shop layout has no checkpoints")]
    NoCheckpoints(AgentId),

    #[error("{0} is already in the roster")]
    DuplicateAgent(AgentId),
}

pub type AgentResult<T> = Result<T, AgentError>;
