//! Plain data row types written by output backends.

use sw_session::{DayReport, DecisionRecord};

/// One scored event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionRow {
    pub tick:    u64,
    pub day:     u32,
    pub wave:    u8,
    pub agent:   u32,
    /// Snake-case outcome name, e.g. `confirmed_catch`.
    pub outcome: &'static str,
    pub delta:   i64,
    /// Running score after this event.
    pub score:   i64,
}

impl From<&DecisionRecord> for DecisionRow {
    fn from(r: &DecisionRecord) -> Self {
        Self {
            tick:    r.tick.0,
            day:     r.day,
            wave:    r.wave,
            agent:   r.agent.0,
            outcome: r.outcome.as_str(),
            delta:   r.delta,
            score:   r.score,
        }
    }
}

/// Summary of one finished day attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRow {
    pub day:             u32,
    pub passed:          bool,
    pub forced:          bool,
    pub score:           i64,
    pub required_score:  i64,
    pub thief_quota:     u32,
    pub thieves_spawned: u32,
    pub thieves_caught:  u32,
    pub thieves_escaped: u32,
    pub wrong_arrests:   u32,
    pub elapsed_ticks:   u64,
}

impl From<&DayReport> for DayRow {
    fn from(r: &DayReport) -> Self {
        Self {
            day:             r.day,
            passed:          r.passed,
            forced:          r.forced,
            score:           r.score,
            required_score:  r.requirement.required_score,
            thief_quota:     r.requirement.thief_quota,
            thieves_spawned: r.thieves_spawned,
            thieves_caught:  r.thieves_caught(),
            thieves_escaped: r.thieves_escaped(),
            wrong_arrests:   r.wrong_arrests,
            elapsed_ticks:   r.elapsed_ticks,
        }
    }
}
