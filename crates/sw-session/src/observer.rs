//! Session observer trait for progress reporting and data collection.

use sw_agent::AgentProfile;
use sw_core::{AgentId, Tick};
use sw_score::DecisionOutcome;

use crate::DayReport;

/// One scored event, as seen by observers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DecisionRecord {
    pub tick:    Tick,
    pub day:     u32,
    /// Wave the customer was spawned in.
    pub wave:    u8,
    pub agent:   AgentId,
    pub outcome: DecisionOutcome,
    pub delta:   i64,
    /// Running score after this event.
    pub score:   i64,
}

/// Callbacks invoked by [`GameSession`][crate::GameSession] at key points.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// Operator decisions made between ticks are delivered through
/// [`on_decision`](Self::on_decision) at the end of the next tick, in the
/// order they happened and before any escape scored in that tick.
///
/// # Example: wave printer
///
/// ```rust,ignore
/// struct WavePrinter;
///
/// impl SessionObserver for WavePrinter {
///     fn on_wave_started(&mut self, day: u32, wave: u8, thieves: u32) {
///         println!("day {day} wave {wave}: {thieves} thieves");
///     }
/// }
/// ```
pub trait SessionObserver {
    /// Called at the end of every tick.
    fn on_tick_end(&mut self, _tick: Tick, _active_agents: usize) {}

    fn on_wave_started(&mut self, _day: u32, _wave: u8, _thief_quota: u32) {}

    fn on_wave_ended(&mut self, _day: u32, _wave: u8) {}

    fn on_agent_spawned(&mut self, _tick: Tick, _agent: AgentId, _profile: &AgentProfile) {}

    /// A decision or an escape changed (or confirmed) the score.
    fn on_decision(&mut self, _record: &DecisionRecord) {}

    /// Called once per finished day, whether it passed or not.
    fn on_day_ended(&mut self, _report: &DayReport) {}

    /// Called once, after the final day is passed.
    fn on_session_end(&mut self, _final_tick: Tick, _score: i64) {}
}

/// A [`SessionObserver`] that does nothing.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}
