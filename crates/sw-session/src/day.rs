//! Day lifecycle: requirements, the day clock, pass/fail, per-day counters.

use std::fmt;

use sw_core::AgentId;
use sw_schedule::{DayRequirement, DayTable};
use sw_score::ScoreState;
use tracing::info;

use crate::{SessionError, SessionResult};

// ── DayStatus ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DayStatus {
    /// Waiting for `start`.
    Ready,
    InProgress,
    /// Ended with enough score; the next day can start.
    Passed,
    /// Ended short of the threshold; the day must be restarted.
    Failed,
    /// The final day was passed.  Terminal.
    SessionComplete,
}

impl DayStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DayStatus::Ready           => "ready",
            DayStatus::InProgress      => "in progress",
            DayStatus::Passed          => "passed",
            DayStatus::Failed          => "failed",
            DayStatus::SessionComplete => "complete",
        }
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── DayReport ─────────────────────────────────────────────────────────────────

/// Summary of one finished day (or one attempt at it).
#[derive(Clone, Debug, PartialEq)]
pub struct DayReport {
    pub day:               u32,
    pub requirement:       DayRequirement,
    /// Cumulative session score at day end.
    pub score:             i64,
    pub passed:            bool,
    /// Ended through `force_end_day` rather than by the clock.
    pub forced:            bool,
    pub waves:             u8,
    pub elapsed_ticks:     u64,
    pub customers_spawned: u32,
    pub thieves_spawned:   u32,
    pub catches:           Vec<AgentId>,
    pub escapes:           Vec<AgentId>,
    pub wrong_arrests:     u32,
}

impl DayReport {
    pub fn thieves_caught(&self) -> u32 {
        self.catches.len() as u32
    }

    pub fn thieves_escaped(&self) -> u32 {
        self.escapes.len() as u32
    }
}

#[derive(Clone, Debug, Default)]
struct DayLog {
    customers_spawned: u32,
    thieves_spawned:   u32,
    catches:           Vec<AgentId>,
    escapes:           Vec<AgentId>,
    wrong_arrests:     u32,
}

// ── DayController ─────────────────────────────────────────────────────────────

/// Which day it is, how much of it is left, and how it went.
///
/// The day clock only moves through [`advance_timer`](Self::advance_timer),
/// which the session calls on ticks where a wave is active.
#[derive(Clone, Debug)]
pub struct DayController {
    table:         DayTable,
    total_days:    u32,
    budget_ticks:  u64,
    day:           u32,
    status:        DayStatus,
    elapsed_ticks: u64,
    log:           DayLog,
    history:       Vec<DayReport>,
}

impl DayController {
    pub fn new(table: DayTable, total_days: u32, budget_ticks: u64) -> Self {
        Self {
            table,
            total_days: total_days.max(1),
            budget_ticks,
            day: 1,
            status: DayStatus::Ready,
            elapsed_ticks: 0,
            log: DayLog::default(),
            history: Vec::new(),
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// 1-based index of the current day.
    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn total_days(&self) -> u32 {
        self.total_days
    }

    pub fn status(&self) -> DayStatus {
        self.status
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == DayStatus::InProgress
    }

    pub fn requirement(&self) -> DayRequirement {
        self.table.requirement(self.day)
    }

    pub fn table(&self) -> &DayTable {
        &self.table
    }

    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    pub fn remaining_ticks(&self) -> u64 {
        self.budget_ticks.saturating_sub(self.elapsed_ticks)
    }

    pub fn thieves_spawned(&self) -> u32 {
        self.log.thieves_spawned
    }

    pub fn thieves_caught(&self) -> u32 {
        self.log.catches.len() as u32
    }

    /// Every finished attempt, oldest first.
    pub fn history(&self) -> &[DayReport] {
        &self.history
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Begin the current day from a clean slate.
    pub fn start(&mut self) -> SessionResult<DayRequirement> {
        self.expect_status(DayStatus::Ready, "start")?;
        self.status = DayStatus::InProgress;
        self.elapsed_ticks = 0;
        self.log = DayLog::default();
        let req = self.requirement();
        info!(day = self.day, quota = req.thief_quota, required = req.required_score, "day started");
        Ok(req)
    }

    /// One tick of active-wave time.  Returns `true` once the budget is spent.
    pub fn advance_timer(&mut self) -> bool {
        if self.status == DayStatus::InProgress {
            self.elapsed_ticks = (self.elapsed_ticks + 1).min(self.budget_ticks);
        }
        self.elapsed_ticks >= self.budget_ticks
    }

    /// Close the day and judge it against `score`.
    pub fn finish(&mut self, score: &ScoreState, forced: bool, waves: u8) -> SessionResult<DayReport> {
        self.expect_status(DayStatus::InProgress, "finish")?;
        let requirement = self.requirement();
        let passed = score.score() >= requirement.required_score;
        self.status = match (passed, self.day >= self.total_days) {
            (true, true)  => DayStatus::SessionComplete,
            (true, false) => DayStatus::Passed,
            (false, _)    => DayStatus::Failed,
        };

        let log = std::mem::take(&mut self.log);
        let report = DayReport {
            day: self.day,
            requirement,
            score: score.score(),
            passed,
            forced,
            waves,
            elapsed_ticks: self.elapsed_ticks,
            customers_spawned: log.customers_spawned,
            thieves_spawned: log.thieves_spawned,
            catches: log.catches,
            escapes: log.escapes,
            wrong_arrests: log.wrong_arrests,
        };
        info!(
            day = report.day,
            passed,
            score = report.score,
            required = requirement.required_score,
            caught = report.thieves_caught(),
            escaped = report.thieves_escaped(),
            "day ended"
        );
        self.history.push(report.clone());
        Ok(report)
    }

    /// Move on after a pass.  Returns the new day index.
    pub fn advance(&mut self) -> SessionResult<u32> {
        self.expect_status(DayStatus::Passed, "advance past")?;
        self.day += 1;
        self.status = DayStatus::Ready;
        self.elapsed_ticks = 0;
        Ok(self.day)
    }

    /// Replay the current day after a failure.
    pub fn restart(&mut self) -> SessionResult<()> {
        self.expect_status(DayStatus::Failed, "restart")?;
        self.status = DayStatus::Ready;
        self.elapsed_ticks = 0;
        Ok(())
    }

    // ── Counters ──────────────────────────────────────────────────────────

    pub fn note_spawn(&mut self, is_thief: bool) {
        self.log.customers_spawned += 1;
        if is_thief {
            self.log.thieves_spawned += 1;
        }
    }

    pub fn note_catch(&mut self, agent: AgentId) {
        self.log.catches.push(agent);
    }

    pub fn note_escape(&mut self, agent: AgentId) {
        self.log.escapes.push(agent);
    }

    pub fn note_wrong_arrest(&mut self) {
        self.log.wrong_arrests += 1;
    }

    fn expect_status(&self, wanted: DayStatus, action: &'static str) -> SessionResult<()> {
        if self.status == wanted {
            Ok(())
        } else {
            Err(SessionError::InvalidDayTransition {
                day: self.day,
                status: self.status.as_str(),
                action,
            })
        }
    }
}

// ── SessionState ──────────────────────────────────────────────────────────────

/// Everything that persists across ticks and days: the score and the day
/// controller.  Owned by the session; nothing else mutates it.
#[derive(Clone, Debug)]
pub struct SessionState {
    pub score: ScoreState,
    pub day:   DayController,
}

impl SessionState {
    pub fn new(day: DayController) -> Self {
        Self { score: ScoreState::new(), day }
    }

    /// `true` once the last day has been passed.
    pub fn is_complete(&self) -> bool {
        self.day.status() == DayStatus::SessionComplete
    }
}
