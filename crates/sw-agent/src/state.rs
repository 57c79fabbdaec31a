//! Observable movement state.

/// Which movement phase a customer is in.
///
/// The warning timer is deliberately not part of this enum: it is an
/// orthogonal region with its own state in [`WarningTimer`][crate::WarningTimer].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AgentState {
    /// Walking toward a checkpoint.
    Moving,
    /// At a checkpoint, turning to face the nearest landmark.
    AtCheckpoint,
    /// Standing still at a checkpoint.
    Dwelling,
    /// Walking out of the shop after the wave ended.
    Exiting,
}

impl AgentState {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentState::Moving       => "moving",
            AgentState::AtCheckpoint => "at_checkpoint",
            AgentState::Dwelling     => "dwelling",
            AgentState::Exiting      => "exiting",
        }
    }
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
