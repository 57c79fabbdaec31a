//! Stuck recovery.
//!
//! When a moving customer makes no forward progress for the configured stuck
//! duration, the controller climbs one rung of the ladder.  Any tick with
//! forward progress drops it back to the bottom.  The third rung is a
//! teleport, which cannot fail, so a customer is never stuck forever.

/// One rung of the recovery ladder, in the order they are tried.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RecoveryStep {
    /// Abandon the destination and pick another random checkpoint.
    Retarget,
    /// Disable and re-enable navigation, then reissue the same destination.
    ResetNavigation,
    /// Teleport onto the destination and treat it as reached.
    Teleport,
}

/// Retry-token counter for one customer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RecoveryLadder {
    tokens_used: u8,
}

impl RecoveryLadder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a token and return the step to run.  After a teleport the
    /// ladder starts over.
    pub fn escalate(&mut self) -> RecoveryStep {
        let step = match self.tokens_used {
            0 => RecoveryStep::Retarget,
            1 => RecoveryStep::ResetNavigation,
            _ => RecoveryStep::Teleport,
        };
        self.tokens_used = match step {
            RecoveryStep::Teleport => 0,
            _ => self.tokens_used + 1,
        };
        step
    }

    /// Forward progress observed.
    pub fn reset(&mut self) {
        self.tokens_used = 0;
    }

    pub fn tokens_used(&self) -> u8 {
        self.tokens_used
    }
}
