//! The `GameSession` struct and its tick loop.

use rustc_hash::FxHashMap;
use sw_agent::{AgentCommand, AgentContext, AgentController, AgentProfile, AgentRoster};
use sw_core::{AgentId, GameConfig, ShopPoint, SimClock, SimRng, Tick, Timings};
use sw_nav::{NavStatus, NavigationOracle, PresentationSink, ShopLayout};
use sw_schedule::{DayRequirement, DayTable, SchedulerEvent, SpawnOrder, WavePlan, WaveScheduler};
use sw_score::{Action, Decision, ScoreSink, evaluate, evaluate_exit};
use tracing::{debug, info, warn};

use crate::{
    DayController, DayReport, DayStatus, DecisionRecord, SessionError, SessionObserver,
    SessionResult, SessionState,
};

/// The game core's composition root.
///
/// `GameSession<N, P, S>` owns every agent controller, the wave scheduler and
/// the session state, and drives the tick loop:
///
/// 1. **Movement**: [`NavigationOracle::advance`] integrates one quantum.
/// 2. **Collect**: one [`NavStatus`] is read per live agent.
/// 3. **Step phase** (optionally parallel with the `parallel` feature): every
///    controller advances its movement machine and warning timer and returns
///    [`AgentCommand`]s.
/// 4. **Apply phase** (sequential, ascending `AgentId`): commands go to the
///    oracle and presentation sink; navigation answers are acknowledged back
///    to the controller.  Customers that reached the exit are removed and
///    checked for escape.
/// 5. **Schedule**: the day clock advances if a wave is active, then the
///    scheduler runs and its events are handled (spawns, exit walks, day
///    close).
/// 6. **Report**: scored events and the day report go to the observer.
///
/// Operator input ([`apprehend`](Self::apprehend),
/// [`release`](Self::release)) is applied immediately between ticks.
///
/// Create via [`SessionBuilder`][crate::SessionBuilder].
pub struct GameSession<N: NavigationOracle, P: PresentationSink, S: ScoreSink> {
    config:       GameConfig,
    timings:      Timings,
    layout:       ShopLayout,
    clock:        SimClock,
    state:        SessionState,
    scheduler:    WaveScheduler,
    roster:       AgentRoster,
    oracle:       N,
    presentation: P,
    sink:         S,
    /// Master stream; each day's scheduler gets a child of it.
    rng:          SimRng,
    day_rng:      SimRng,
    next_agent:   u32,
    /// Scored events not yet delivered to an observer.
    pending:      Vec<DecisionRecord>,
}

impl<N: NavigationOracle, P: PresentationSink, S: ScoreSink> GameSession<N, P, S> {
    pub(crate) fn assemble(
        config:       GameConfig,
        layout:       ShopLayout,
        table:        DayTable,
        oracle:       N,
        presentation: P,
        sink:         S,
    ) -> Self {
        let timings = config.timings();
        let plan = WavePlan::new(&config, &timings, layout.template_count);
        let mut rng = SimRng::new(config.seed);
        let day_rng = rng.child(0);
        let day = DayController::new(table, config.days, timings.day_ticks);

        Self {
            clock: config.make_clock(),
            state: SessionState::new(day),
            scheduler: WaveScheduler::new(plan),
            roster: AgentRoster::new(),
            config,
            timings,
            layout,
            oracle,
            presentation,
            sink,
            rng,
            day_rng,
            next_agent: 0,
            pending: Vec::new(),
        }
    }

    // ── Day lifecycle ─────────────────────────────────────────────────────

    /// Start the current day: allocate its thief quota and arm the first
    /// wave.
    pub fn start_day(&mut self) -> SessionResult<DayRequirement> {
        let req = self.state.day.start()?;
        self.day_rng = self.rng.child(u64::from(req.day));
        self.scheduler.begin_day(req.thief_quota, &mut self.day_rng);
        Ok(req)
    }

    /// Administrative override: end the running day now.
    ///
    /// Halts the scheduler (pending spawns, rest and exit-walk timers are
    /// cancelled) and removes every customer without escape checks, then
    /// judges the day as usual.
    pub fn force_end_day<O: SessionObserver>(&mut self, observer: &mut O) -> SessionResult<DayReport> {
        if !self.state.day.is_in_progress() {
            return Err(SessionError::DayNotInProgress);
        }
        self.scheduler.cancel();
        let cleared = self.clear_roster();
        info!(day = self.state.day.day(), cleared, "day force-ended");
        self.flush_decisions(observer);
        self.finish_day(true, observer)
    }

    /// Move to the next day after a pass.  Score carries over.
    pub fn advance_day(&mut self) -> SessionResult<u32> {
        self.state.day.advance()
    }

    /// Make a failed day startable again.  The session score is kept unless
    /// `reset_score` is set.
    pub fn restart_day(&mut self, reset_score: bool) -> SessionResult<()> {
        self.state.day.restart()?;
        if reset_score {
            self.state.score.reset();
        }
        info!(day = self.state.day.day(), reset_score, "day restarted");
        Ok(())
    }

    // ── Operator input ────────────────────────────────────────────────────

    /// Apprehend `agent`: score the call and remove the customer, whether or
    /// not it was a thief.
    ///
    /// # Errors
    ///
    /// - [`SessionError::DayNotInProgress`] between days.
    /// - [`SessionError::UnknownAgent`] if `agent` is not live (already
    ///   removed, never spawned).
    /// - [`SessionError::Score`] if the controller reports an impossible
    ///   warning count.  The customer is left in place.
    pub fn apprehend(&mut self, agent: AgentId) -> SessionResult<Decision> {
        if !self.state.day.is_in_progress() {
            return Err(SessionError::DayNotInProgress);
        }
        let controller = self.roster.get(agent).ok_or(SessionError::UnknownAgent(agent))?;
        let decision = evaluate(
            controller.is_thief(),
            controller.current_warning_count(),
            Action::Apprehend,
        )?;
        let wave = controller.profile().wave;
        let visible = controller.is_warning_visible();

        self.roster.remove(agent);
        self.despawn(agent, visible);
        if decision.outcome.is_catch() {
            self.state.day.note_catch(agent);
        } else {
            self.state.day.note_wrong_arrest();
        }
        let score = self.record(agent, wave, decision);
        info!(agent = %agent, outcome = %decision.outcome, delta = decision.delta, score, "apprehended");
        self.release_exit_walk_if_done(wave);
        Ok(decision)
    }

    /// Release `agent`.  Never changes the score, never removes the customer.
    ///
    /// # Errors
    ///
    /// As for [`apprehend`](Self::apprehend), minus the warning-count check.
    pub fn release(&mut self, agent: AgentId) -> SessionResult<Decision> {
        if !self.state.day.is_in_progress() {
            return Err(SessionError::DayNotInProgress);
        }
        let controller = self.roster.get(agent).ok_or(SessionError::UnknownAgent(agent))?;
        let decision = evaluate(
            controller.is_thief(),
            controller.current_warning_count(),
            Action::Release,
        )?;
        let wave = controller.profile().wave;
        self.record(agent, wave, decision);
        debug!(agent = %agent, "released");
        Ok(decision)
    }

    // ── Running ───────────────────────────────────────────────────────────

    /// Process one tick.  Returns the day report if the day ended on it.
    pub fn tick<O: SessionObserver>(&mut self, observer: &mut O) -> Option<DayReport> {
        let now = self.clock.current_tick;

        // ── Phase 1: movement ─────────────────────────────────────────────
        self.oracle.advance(self.timings.secs_per_tick);

        // ── Phase 2: collect oracle readings (sequential) ─────────────────
        let statuses: FxHashMap<AgentId, Option<NavStatus>> = self
            .roster
            .ids()
            .into_iter()
            .map(|agent| (agent, self.oracle.query(agent)))
            .collect();

        // ── Phase 3: step phase (produce) ─────────────────────────────────
        let ctx = AgentContext::new(&self.layout, &self.timings);
        let reports = self.roster.step_all(&ctx, &statuses);

        // ── Phase 4: apply phase (consume) ────────────────────────────────
        //
        // Reports arrive in ascending AgentId order, so application order is
        // deterministic even when the step phase ran in parallel.
        let mut at_exit = Vec::new();
        for (agent, report) in reports {
            self.apply_commands(agent, &report.commands);
            if report.reached_exit {
                at_exit.push(agent);
            }
        }
        for agent in at_exit {
            self.remove_exiting(agent);
        }

        // ── Phase 5: day clock and scheduler ──────────────────────────────
        if self.scheduler.is_wave_active() {
            self.state.day.advance_timer();
        }
        let remaining = self.state.day.remaining_ticks();
        let day = self.state.day.day();
        let mut day_closed = false;

        for event in self.scheduler.tick(&mut self.day_rng, remaining) {
            match event {
                SchedulerEvent::WaveStarted { wave, thief_quota } => {
                    observer.on_wave_started(day, wave, thief_quota);
                }
                SchedulerEvent::Spawn(order) => self.spawn(order, now, observer),
                SchedulerEvent::WaveEnded { wave } => {
                    self.roster.begin_exit_all(self.layout.exit);
                    self.release_exit_walk_if_done(wave);
                    observer.on_wave_ended(day, wave);
                }
                SchedulerEvent::ExitTimedOut { wave } => {
                    let stragglers: Vec<AgentId> = self
                        .roster
                        .iter()
                        .filter(|c| c.profile().wave == wave)
                        .map(|c| c.id())
                        .collect();
                    if !stragglers.is_empty() {
                        info!(wave, count = stragglers.len(), "exit walk timed out");
                    }
                    for agent in stragglers {
                        self.remove_exiting(agent);
                    }
                }
                SchedulerEvent::DayClosed => day_closed = true,
                SchedulerEvent::SpawnSkipped { .. }
                | SchedulerEvent::RestStarted { .. }
                | SchedulerEvent::ClosingStarted => {}
            }
        }

        // ── Phase 6: report ───────────────────────────────────────────────
        self.flush_decisions(observer);
        let report = if day_closed {
            match self.finish_day(false, observer) {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!(error = %e, "scheduler closed a day that was not running");
                    None
                }
            }
        } else {
            None
        };

        observer.on_tick_end(now, self.roster.len());
        self.clock.advance();
        report
    }

    /// Run exactly `n` ticks.  Returns the reports of any days that ended.
    pub fn run_ticks<O: SessionObserver>(&mut self, n: u64, observer: &mut O) -> Vec<DayReport> {
        (0..n).filter_map(|_| self.tick(observer)).collect()
    }

    /// Run the current day to its end, starting it first if it is ready.
    pub fn run_day<O: SessionObserver>(&mut self, observer: &mut O) -> SessionResult<DayReport> {
        if self.state.day.status() == DayStatus::Ready {
            self.start_day()?;
        }
        while self.state.day.is_in_progress() {
            if let Some(report) = self.tick(observer) {
                return Ok(report);
            }
        }
        Err(SessionError::DayNotInProgress)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    pub fn layout(&self) -> &ShopLayout {
        &self.layout
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn score(&self) -> i64 {
        self.state.score.score()
    }

    pub fn day(&self) -> &DayController {
        &self.state.day
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    pub fn scheduler(&self) -> &WaveScheduler {
        &self.scheduler
    }

    pub fn roster(&self) -> &AgentRoster {
        &self.roster
    }

    pub fn agent(&self, agent: AgentId) -> Option<&AgentController> {
        self.roster.get(agent)
    }

    pub fn oracle(&self) -> &N {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut N {
        &mut self.oracle
    }

    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn spawn<O: SessionObserver>(&mut self, order: SpawnOrder, now: Tick, observer: &mut O) {
        let agent = AgentId(self.next_agent);
        let profile = AgentProfile {
            is_thief: order.is_thief,
            template: order.template,
            wave:     order.wave,
        };
        let entrance = self.layout.entrance;
        let ctx = AgentContext::new(&self.layout, &self.timings);
        let controller = match AgentController::new(agent, profile, entrance, self.config.seed, &ctx) {
            Ok(c) => c,
            Err(e) => {
                warn!(wave = order.wave, slot = order.slot, error = %e, "spawn skipped");
                self.scheduler.spawn_failed(order.wave, order.slot);
                return;
            }
        };
        if let Err(e) = self.roster.insert(controller) {
            warn!(wave = order.wave, slot = order.slot, error = %e, "spawn skipped");
            self.scheduler.spawn_failed(order.wave, order.slot);
            return;
        }
        self.next_agent += 1;
        self.oracle.spawn(agent, entrance);
        self.scheduler.record_agent(order.wave, agent);
        self.state.day.note_spawn(order.is_thief);
        debug!(agent = %agent, wave = order.wave, slot = order.slot, template = %order.template, "spawned");
        observer.on_agent_spawned(now, agent, &profile);
    }

    fn apply_commands(&mut self, agent: AgentId, commands: &[AgentCommand]) {
        for command in commands {
            match *command {
                AgentCommand::SetDestination(point) => {
                    let accepted = self.oracle.set_destination(agent, point);
                    self.acknowledge(agent, point, accepted);
                }
                AgentCommand::ResetNavigation(point) => {
                    self.oracle.set_enabled(agent, false);
                    self.oracle.set_enabled(agent, true);
                    let accepted = self.oracle.set_destination(agent, point);
                    self.acknowledge(agent, point, accepted);
                }
                AgentCommand::Teleport(point) => self.oracle.teleport(agent, point),
                AgentCommand::SetMovingAnimation(moving) => {
                    self.presentation.set_moving_animation(agent, moving);
                }
                AgentCommand::Face(heading) => self.presentation.set_facing(agent, heading),
                AgentCommand::ShowWarning { .. } => self.presentation.set_warning_visible(agent, true),
                AgentCommand::HideWarning => self.presentation.set_warning_visible(agent, false),
            }
        }
    }

    fn acknowledge(&mut self, agent: AgentId, point: ShopPoint, accepted: bool) {
        if !accepted {
            warn!(agent = %agent, x = point.x, z = point.z, "destination refused; holding position");
        }
        if let Some(controller) = self.roster.get_mut(agent) {
            controller.destination_ack(accepted);
        }
    }

    /// Remove a customer that left the shop (walked out or timed out) and
    /// run the escape check.
    fn remove_exiting(&mut self, agent: AgentId) {
        let Some(controller) = self.roster.remove(agent) else { return };
        self.despawn(agent, controller.is_warning_visible());
        let wave = controller.profile().wave;
        if let Some(decision) = evaluate_exit(controller.is_thief()) {
            self.state.day.note_escape(agent);
            let score = self.record(agent, wave, decision);
            info!(agent = %agent, warnings = controller.current_warning_count(), score, "thief escaped");
        }
        self.release_exit_walk_if_done(wave);
    }

    /// Once nobody from `wave` is left, its exit walk is over.
    fn release_exit_walk_if_done(&mut self, wave: u8) {
        if !self.roster.iter().any(|c| c.profile().wave == wave) {
            self.scheduler.complete_exit_walk(wave);
        }
    }

    fn despawn(&mut self, agent: AgentId, warning_visible: bool) {
        if warning_visible {
            self.presentation.set_warning_visible(agent, false);
        }
        self.oracle.despawn(agent);
    }

    /// Remove everyone without escape checks.  Returns how many were removed.
    fn clear_roster(&mut self) -> usize {
        let visible: Vec<AgentId> = self
            .roster
            .iter()
            .filter(|c| c.is_warning_visible())
            .map(|c| c.id())
            .collect();
        for &agent in &visible {
            self.presentation.set_warning_visible(agent, false);
        }
        let cleared = self.roster.clear();
        for &agent in &cleared {
            self.oracle.despawn(agent);
        }
        cleared.len()
    }

    /// Apply a decision to the score, announce it, and queue it for the
    /// observer.  Returns the new score.
    fn record(&mut self, agent: AgentId, wave: u8, decision: Decision) -> i64 {
        let score = self.state.score.apply(&decision);
        self.sink.report(decision.delta, decision.outcome);
        self.pending.push(DecisionRecord {
            tick: self.clock.current_tick,
            day: self.state.day.day(),
            wave,
            agent,
            outcome: decision.outcome,
            delta: decision.delta,
            score,
        });
        score
    }

    fn flush_decisions<O: SessionObserver>(&mut self, observer: &mut O) {
        for record in self.pending.drain(..) {
            observer.on_decision(&record);
        }
    }

    fn finish_day<O: SessionObserver>(&mut self, forced: bool, observer: &mut O) -> SessionResult<DayReport> {
        self.clear_roster();
        let waves = self.scheduler.waves_started();
        let report = self.state.day.finish(&self.state.score, forced, waves)?;
        observer.on_day_ended(&report);
        if self.state.is_complete() {
            info!(score = self.state.score.score(), "session complete");
            observer.on_session_end(self.clock.current_tick, self.state.score.score());
        }
        Ok(report)
    }
}
