//! `ScoreState`: the running score.

use crate::{Decision, DecisionOutcome};

/// Session-wide score plus a tally of outcomes.
///
/// Persists across days; only [`reset`](Self::reset) clears it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScoreState {
    score: i64,
    tally: [u32; DecisionOutcome::ALL.len()],
}

impl ScoreState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    /// Apply a decision; returns the new score.
    pub fn apply(&mut self, decision: &Decision) -> i64 {
        self.score += decision.delta;
        self.tally[decision.outcome.index()] += 1;
        self.score
    }

    /// How many times `outcome` has been applied since the last reset.
    pub fn count(&self, outcome: DecisionOutcome) -> u32 {
        self.tally[outcome.index()]
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
