//! `sw-score`: decision scoring.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`decision`] | `Action`, `DecisionOutcome`, `Decision`, `evaluate`, `evaluate_exit` |
//! | [`score`]    | `ScoreState`: the session-wide running score                |
//! | [`sink`]     | `ScoreSink` trait, `NoopScoreSink`                           |
//! | [`error`]    | `ScoreError`, `ScoreResult<T>`                               |
//!
//! # Scoring table
//!
//! | thief | warnings | action      | outcome                     | Δ    |
//! |-------|----------|-------------|-----------------------------|------|
//! | yes   | ≥ 3      | apprehend   | `ConfirmedCatch`            | +100 |
//! | yes   | 0–2      | apprehend   | `EarlyCatch`                | −50  |
//! | no    | 1–2      | apprehend   | `WrongInnocentWithWarnings` | −50  |
//! | no    | 0        | apprehend   | `WrongInnocentNoWarnings`   | −100 |
//! | any   | any      | release     | `CorrectRelease`            | 0    |
//! | yes   | any      | walks out   | `ThiefEscaped`              | −100 |
//!
//! Everything here is pure; removing agents and applying the escape check
//! once per agent is the session's job.

pub mod decision;
pub mod error;
pub mod score;
pub mod sink;


pub use decision::{Action, Decision, DecisionOutcome, evaluate, evaluate_exit};
pub use error::{ScoreError, ScoreResult};
pub use score::ScoreState;
pub use sink::{NoopScoreSink, ScoreSink};
