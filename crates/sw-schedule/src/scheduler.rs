//! `WaveScheduler`: pacing of one day's waves.
//!
//! # State machine
//!
//! ```text
//!   Idle ──begin_day──▶ WaveActive ──wave timer──▶ Resting ──rest timer──▶ WaveActive …
//!                           │
//!                           └── last wave, or too little day left ──▶ Closing ──exit walks done──▶ Idle
//! ```
//!
//! The scheduler owns every timer of the day: the wave countdown, the spawn
//! interval, the rest countdown and one exit-walk ceiling per ended wave.
//! [`WaveScheduler::cancel`] disarms all of them at once.
//!
//! The day clock itself lives with the caller, which advances it only while
//! [`WaveScheduler::is_wave_active`] and passes what is left into
//! [`WaveScheduler::tick`].

use sw_core::{AgentId, Countdown, GameConfig, SimRng, TemplateId, Timings};
use tracing::{debug, info, warn};

use crate::{Allocation, Wave, allocate_thieves};

// ── Plan ──────────────────────────────────────────────────────────────────────

/// The fixed shape of every day, in ticks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WavePlan {
    pub waves_per_day:        u8,
    pub customers_per_wave:   u32,
    pub max_thieves_per_wave: u32,
    pub wave_ticks:           u64,
    pub rest_ticks:           u64,
    /// Another wave is only started while at least this much day is left.
    pub min_wave_ticks:       u64,
    pub spawn_interval_ticks: u64,
    pub exit_timeout_ticks:   u64,
    pub template_count:       u16,
}

impl WavePlan {
    pub fn new(config: &GameConfig, timings: &Timings, template_count: u16) -> Self {
        Self {
            waves_per_day:        config.waves_per_day.min(u8::MAX as u32) as u8,
            customers_per_wave:   config.customers_per_wave,
            max_thieves_per_wave: config.max_thieves_per_wave,
            wave_ticks:           timings.wave_ticks,
            rest_ticks:           timings.rest_ticks,
            min_wave_ticks:       timings.min_wave_ticks,
            spawn_interval_ticks: timings.spawn_interval_ticks,
            exit_timeout_ticks:   timings.exit_timeout_ticks,
            template_count,
        }
    }
}

// ── States and events ─────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WaveState {
    /// No day in progress, or the day has not produced its first wave yet.
    Idle,
    WaveActive,
    Resting,
    /// All waves are over; waiting for the last exit walks.
    Closing,
}

impl WaveState {
    pub fn as_str(self) -> &'static str {
        match self {
            WaveState::Idle       => "idle",
            WaveState::WaveActive => "wave_active",
            WaveState::Resting    => "resting",
            WaveState::Closing    => "closing",
        }
    }
}

/// One customer to create.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpawnOrder {
    pub wave:     u8,
    /// Position in the wave's shuffled spawn order.
    pub slot:     usize,
    pub is_thief: bool,
    pub template: TemplateId,
}

/// What happened during one [`WaveScheduler::tick`], in order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SchedulerEvent {
    WaveStarted { wave: u8, thief_quota: u32 },
    Spawn(SpawnOrder),
    /// A slot was dropped because there are no entity templates.
    SpawnSkipped { wave: u8, slot: usize },
    /// Every customer still browsing should head for the exit.
    WaveEnded { wave: u8 },
    RestStarted { next_wave: u8 },
    /// No more waves today.
    ClosingStarted,
    /// The exit-walk ceiling for `wave` ran out; its stragglers must be
    /// removed now.
    ExitTimedOut { wave: u8 },
    /// The day is over.
    DayClosed,
}

#[derive(Copy, Clone, Debug)]
struct ExitWalk {
    wave:    u8,
    timeout: Countdown,
}

// ── WaveScheduler ─────────────────────────────────────────────────────────────

pub struct WaveScheduler {
    plan:          WavePlan,
    state:         WaveState,
    day_open:      bool,
    allocation:    Allocation,
    current:       Option<Wave>,
    finished:      Vec<Wave>,
    waves_started: u8,
    wave_timer:    Countdown,
    spawn_timer:   Countdown,
    rest_timer:    Countdown,
    exit_walks:    Vec<ExitWalk>,
}

impl WaveScheduler {
    pub fn new(plan: WavePlan) -> Self {
        Self {
            plan,
            state:         WaveState::Idle,
            day_open:      false,
            allocation:    Allocation { per_wave: Vec::new(), dropped: 0 },
            current:       None,
            finished:      Vec::new(),
            waves_started: 0,
            wave_timer:    Countdown::idle(),
            spawn_timer:   Countdown::idle(),
            rest_timer:    Countdown::idle(),
            exit_walks:    Vec::new(),
        }
    }

    /// Reset for a new day and allocate `thief_quota` across its waves.  The
    /// first wave starts on the next [`tick`](Self::tick).
    pub fn begin_day(&mut self, thief_quota: u32, rng: &mut SimRng) -> &Allocation {
        self.cancel();
        self.finished.clear();
        self.waves_started = 0;
        // A wave never holds more thieves than customers.
        let cap = self.plan.max_thieves_per_wave.min(self.plan.customers_per_wave);
        self.allocation = allocate_thieves(thief_quota, self.plan.waves_per_day as u32, cap, rng);
        self.day_open = true;
        debug!(quota = thief_quota, per_wave = ?self.allocation.per_wave, "thieves allocated");
        &self.allocation
    }

    /// Advance every timer by one tick.
    ///
    /// `day_remaining` is what is left of the day budget after this tick's
    /// clock update; reaching 0 ends the running wave.
    pub fn tick(&mut self, rng: &mut SimRng, day_remaining: u64) -> Vec<SchedulerEvent> {
        let mut events = Vec::new();

        // Exit walks run in every state.
        self.exit_walks.retain_mut(|walk| {
            if walk.timeout.tick() {
                events.push(SchedulerEvent::ExitTimedOut { wave: walk.wave });
                false
            } else {
                true
            }
        });

        match self.state {
            WaveState::Idle => {
                if self.day_open {
                    if day_remaining == 0 {
                        self.start_closing(&mut events);
                    } else {
                        self.start_wave(rng, &mut events);
                    }
                }
            }
            WaveState::WaveActive => {
                let expired = self.wave_timer.tick();
                if expired || day_remaining == 0 {
                    self.end_wave(day_remaining, &mut events);
                } else if self.spawn_timer.tick() {
                    self.spawn_next(rng, &mut events);
                }
            }
            WaveState::Resting => {
                if self.rest_timer.tick() {
                    self.start_wave(rng, &mut events);
                }
            }
            WaveState::Closing => {}
        }

        if self.state == WaveState::Closing && self.exit_walks.is_empty() {
            self.state = WaveState::Idle;
            self.day_open = false;
            info!(waves = self.waves_started, "day closed");
            events.push(SchedulerEvent::DayClosed);
        }
        events
    }

    /// Attach a spawned customer's id to its wave.
    pub fn record_agent(&mut self, wave: u8, agent: AgentId) {
        if let Some(w) = self.wave_mut(wave) {
            w.record_agent(agent);
        }
    }

    /// The customer ordered for `slot` of `wave` was never created; count the
    /// slot as skipped.
    pub fn spawn_failed(&mut self, wave: u8, slot: usize) {
        if let Some(w) = self.wave_mut(wave) {
            w.revoke_slot(slot);
        }
    }

    /// Every customer of `wave` has left; drop its exit-walk ceiling.
    pub fn complete_exit_walk(&mut self, wave: u8) {
        self.exit_walks.retain(|walk| walk.wave != wave);
    }

    /// Halt immediately: disarm every timer, drop pending exit walks, close
    /// the day.  Nothing fires after this until [`begin_day`](Self::begin_day).
    pub fn cancel(&mut self) {
        self.wave_timer.cancel();
        self.spawn_timer.cancel();
        self.rest_timer.cancel();
        self.exit_walks.clear();
        if let Some(mut wave) = self.current.take() {
            wave.deactivate();
            self.finished.push(wave);
        }
        self.state = WaveState::Idle;
        self.day_open = false;
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn plan(&self) -> &WavePlan {
        &self.plan
    }

    pub fn state(&self) -> WaveState {
        self.state
    }

    /// The day clock runs only while this is `true`.
    pub fn is_wave_active(&self) -> bool {
        self.state == WaveState::WaveActive
    }

    /// `true` from [`begin_day`](Self::begin_day) until `DayClosed` or
    /// [`cancel`](Self::cancel).
    pub fn is_day_open(&self) -> bool {
        self.day_open
    }

    pub fn allocation(&self) -> &Allocation {
        &self.allocation
    }

    pub fn current_wave(&self) -> Option<&Wave> {
        self.current.as_ref()
    }

    /// Ended waves of the current day, oldest first.
    pub fn finished_waves(&self) -> &[Wave] {
        &self.finished
    }

    pub fn waves_started(&self) -> u8 {
        self.waves_started
    }

    /// Waves whose customers are still walking out.
    pub fn pending_exit_walks(&self) -> impl Iterator<Item = u8> + '_ {
        self.exit_walks.iter().map(|walk| walk.wave)
    }

    // ── Transitions ───────────────────────────────────────────────────────

    fn start_wave(&mut self, rng: &mut SimRng, events: &mut Vec<SchedulerEvent>) {
        self.waves_started += 1;
        let number = self.waves_started;
        let quota = self.allocation.for_wave(number);
        self.current = Some(Wave::new(number, quota, self.plan.customers_per_wave, rng));
        self.wave_timer = Countdown::new(self.plan.wave_ticks);
        self.state = WaveState::WaveActive;

        info!(wave = number, thieves = quota, "wave started");
        events.push(SchedulerEvent::WaveStarted { wave: number, thief_quota: quota });
        self.spawn_next(rng, events);
    }

    fn spawn_next(&mut self, rng: &mut SimRng, events: &mut Vec<SchedulerEvent>) {
        let template_count = self.plan.template_count;
        let Some(wave) = self.current.as_mut() else { return };
        let Some(is_thief) = wave.next_flag() else { return };
        let slot = wave.next_slot();

        match wave.pick_template(template_count, rng) {
            Some(template) => {
                wave.consume_slot(template);
                events.push(SchedulerEvent::Spawn(SpawnOrder {
                    wave: wave.number,
                    slot,
                    is_thief,
                    template,
                }));
            }
            None => {
                warn!(wave = wave.number, slot, "no entity templates; spawn skipped");
                wave.skip_slot();
                events.push(SchedulerEvent::SpawnSkipped { wave: wave.number, slot });
            }
        }

        if !wave.is_sealed() {
            self.spawn_timer = Countdown::new(self.plan.spawn_interval_ticks);
        }
    }

    fn end_wave(&mut self, day_remaining: u64, events: &mut Vec<SchedulerEvent>) {
        self.wave_timer.cancel();
        self.spawn_timer.cancel();

        if let Some(mut wave) = self.current.take() {
            wave.deactivate();
            info!(
                wave = wave.number,
                spawned = wave.spawned().len(),
                thieves = wave.thieves_spawned(),
                "wave ended"
            );
            events.push(SchedulerEvent::WaveEnded { wave: wave.number });
            self.exit_walks.push(ExitWalk {
                wave:    wave.number,
                timeout: Countdown::new(self.plan.exit_timeout_ticks),
            });
            self.finished.push(wave);
        }

        let last_wave = self.waves_started >= self.plan.waves_per_day;
        if last_wave || day_remaining < self.plan.min_wave_ticks.max(1) {
            self.start_closing(events);
        } else {
            self.rest_timer = Countdown::new(self.plan.rest_ticks);
            self.state = WaveState::Resting;
            debug!(next_wave = self.waves_started + 1, "resting");
            events.push(SchedulerEvent::RestStarted { next_wave: self.waves_started + 1 });
        }
    }

    fn start_closing(&mut self, events: &mut Vec<SchedulerEvent>) {
        self.state = WaveState::Closing;
        debug!("no further waves today");
        events.push(SchedulerEvent::ClosingStarted);
    }

    fn wave_mut(&mut self, number: u8) -> Option<&mut Wave> {
        match self.current.as_mut() {
            Some(w) if w.number == number => Some(w),
            _ => self.finished.iter_mut().find(|w| w.number == number),
        }
    }
}
