//! The decision table.

use std::fmt;

use crate::{ScoreError, ScoreResult};

/// Warnings at which a customer counts as a confirmed thief.
pub const CONFIRMED_AT: u8 = 3;

/// The operator's two possible calls on a selected customer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Apprehend,
    Release,
}

/// Classification of a scored event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DecisionOutcome {
    ConfirmedCatch,
    EarlyCatch,
    WrongInnocentWithWarnings,
    WrongInnocentNoWarnings,
    CorrectRelease,
    ThiefEscaped,
}

impl DecisionOutcome {
    pub const ALL: [DecisionOutcome; 6] = [
        DecisionOutcome::ConfirmedCatch,
        DecisionOutcome::EarlyCatch,
        DecisionOutcome::WrongInnocentWithWarnings,
        DecisionOutcome::WrongInnocentNoWarnings,
        DecisionOutcome::CorrectRelease,
        DecisionOutcome::ThiefEscaped,
    ];

    /// Score change for this outcome.
    pub fn points(self) -> i64 {
        match self {
            DecisionOutcome::ConfirmedCatch            => 100,
            DecisionOutcome::EarlyCatch                => -50,
            DecisionOutcome::WrongInnocentWithWarnings => -50,
            DecisionOutcome::WrongInnocentNoWarnings   => -100,
            DecisionOutcome::CorrectRelease            => 0,
            DecisionOutcome::ThiefEscaped              => -100,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DecisionOutcome::ConfirmedCatch            => "confirmed_catch",
            DecisionOutcome::EarlyCatch                => "early_catch",
            DecisionOutcome::WrongInnocentWithWarnings => "wrong_innocent_with_warnings",
            DecisionOutcome::WrongInnocentNoWarnings   => "wrong_innocent_no_warnings",
            DecisionOutcome::CorrectRelease            => "correct_release",
            DecisionOutcome::ThiefEscaped              => "thief_escaped",
        }
    }

    /// `true` for outcomes that catch an actual thief.
    pub fn is_catch(self) -> bool {
        matches!(self, DecisionOutcome::ConfirmedCatch | DecisionOutcome::EarlyCatch)
    }

    /// Position in [`ALL`](Self::ALL).
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DecisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scored outcome.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub outcome: DecisionOutcome,
    pub delta:   i64,
}

impl From<DecisionOutcome> for Decision {
    fn from(outcome: DecisionOutcome) -> Self {
        Self { outcome, delta: outcome.points() }
    }
}

/// Score an operator action.
///
/// A thief apprehended before any warning is an `EarlyCatch`, the same as
/// one caught after one or two.
///
/// # Errors
///
/// [`ScoreError::ImpossibleWarningCount`] when apprehending a non-thief
/// that has shown three or more warnings.
pub fn evaluate(is_thief: bool, warnings: u8, action: Action) -> ScoreResult<Decision> {
    let outcome = match (action, is_thief, warnings) {
        (Action::Release, _, _)                 => DecisionOutcome::CorrectRelease,
        (Action::Apprehend, true, w) if w >= CONFIRMED_AT => DecisionOutcome::ConfirmedCatch,
        (Action::Apprehend, true, _)            => DecisionOutcome::EarlyCatch,
        (Action::Apprehend, false, 0)           => DecisionOutcome::WrongInnocentNoWarnings,
        (Action::Apprehend, false, w) if w < CONFIRMED_AT => {
            DecisionOutcome::WrongInnocentWithWarnings
        }
        (Action::Apprehend, false, w) => {
            return Err(ScoreError::ImpossibleWarningCount { warnings: w });
        }
    };
    Ok(outcome.into())
}

/// Score a customer walking out of the shop unapprehended.  Only thieves
/// cost anything.
pub fn evaluate_exit(is_thief: bool) -> Option<Decision> {
    is_thief.then(|| DecisionOutcome::ThiefEscaped.into())
}
