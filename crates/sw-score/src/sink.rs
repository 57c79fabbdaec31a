//! Where scored outcomes are announced.

use crate::DecisionOutcome;

/// Receives every score change for display.  Nothing returned here feeds
/// back into the game.
pub trait ScoreSink {
    fn report(&mut self, delta: i64, outcome: DecisionOutcome);
}

/// A [`ScoreSink`] that discards everything.
pub struct NoopScoreSink;

impl ScoreSink for NoopScoreSink {
    fn report(&mut self, _delta: i64, _outcome: DecisionOutcome) {}
}

/// Collects reports in order.
impl ScoreSink for Vec<(i64, DecisionOutcome)> {
    fn report(&mut self, delta: i64, outcome: DecisionOutcome) {
        self.push((delta, outcome));
    }
}
