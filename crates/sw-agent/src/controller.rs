//! `AgentController`: one customer's behavior.

use sw_core::geo::angular_distance_deg;
use sw_core::{AgentId, AgentRng, CheckpointId, Countdown, ShopPoint, TemplateId};
use sw_nav::{MAX_CHECKPOINTS, NavStatus};
use tracing::debug;

use crate::warning::CONFIRMED_WARNINGS;
use crate::{
    AgentCommand, AgentContext, AgentError, AgentResult, AgentState, RecoveryLadder, RecoveryStep,
    WarningEvent, WarningTimer,
};

// ── Public types ──────────────────────────────────────────────────────────────

/// Creation-time facts about a customer.  Never changes afterward.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AgentProfile {
    pub is_thief: bool,
    pub template: TemplateId,
    /// 1-based wave number the customer was spawned in.
    pub wave:     u8,
}

/// Everything one step produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepReport {
    pub commands:    Vec<AgentCommand>,
    /// The customer is exiting and has reached the exit point.
    pub reached_exit: bool,
    /// The recovery rung climbed this step, if any.
    pub recovery:    Option<RecoveryStep>,
}

// ── Internal movement region ──────────────────────────────────────────────────

/// Where a navigation request stands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum LegStatus {
    /// Needs (re)issuing: never sent, or the oracle refused it.
    Undispatched,
    /// Sent this tick; waiting for the oracle's answer.
    Awaiting,
    /// Accepted; status readings now describe this leg.
    Tracking,
}

#[derive(Clone, Debug)]
struct Leg {
    target:         ShopPoint,
    status:         LegStatus,
    best_remaining: Option<f32>,
    stalled_ticks:  u64,
}

impl Leg {
    /// A leg whose destination request is being sent in this step.
    fn dispatched(target: ShopPoint, cmds: &mut Vec<AgentCommand>) -> Self {
        cmds.push(AgentCommand::SetDestination(target));
        Self::with_status(target, LegStatus::Awaiting)
    }

    fn with_status(target: ShopPoint, status: LegStatus) -> Self {
        Self { target, status, best_remaining: None, stalled_ticks: 0 }
    }

    fn redispatch_if_needed(&mut self, cmds: &mut Vec<AgentCommand>) {
        if self.status == LegStatus::Undispatched {
            cmds.push(AgentCommand::SetDestination(self.target));
            self.status = LegStatus::Awaiting;
        }
    }

    /// `true` if `status` shows the agent at (or within `threshold` of) the
    /// target.
    fn arrived(&self, status: Option<&NavStatus>, threshold: f32) -> bool {
        let Some(s) = status else { return false };
        if s.position.distance(self.target) <= threshold {
            return true;
        }
        self.status == LegStatus::Tracking && !s.pending && s.remaining_distance <= threshold
    }

    /// Record a reading; returns `true` if remaining distance dropped below
    /// the best seen so far by more than `epsilon`.
    fn track(&mut self, status: Option<&NavStatus>, epsilon: f32) -> bool {
        let Some(s) = status else { return false };
        if self.status != LegStatus::Tracking {
            return false;
        }
        let remaining = s.remaining_distance;
        match self.best_remaining {
            None => {
                self.best_remaining = Some(remaining);
                false
            }
            Some(best) if remaining < best - epsilon => {
                self.best_remaining = Some(remaining);
                true
            }
            Some(_) => false,
        }
    }
}

/// Bounded turn toward a landmark: one `rotation_deg_per_tick` slice per step.
#[derive(Clone, Debug)]
struct Rotation {
    from:    f32,
    to:      f32,
    total:   u64,
    elapsed: u64,
}

impl Rotation {
    fn heading_at(&self, elapsed: u64) -> f32 {
        if self.total == 0 || elapsed >= self.total {
            return self.to;
        }
        let mut delta = (self.to - self.from).rem_euclid(360.0);
        if delta > 180.0 {
            delta -= 360.0;
        }
        (self.from + delta * (elapsed as f32 / self.total as f32)).rem_euclid(360.0)
    }
}

#[derive(Clone, Debug)]
enum Phase {
    Moving       { checkpoint: CheckpointId, leg: Leg },
    AtCheckpoint { checkpoint: CheckpointId, rotation: Option<Rotation> },
    Dwelling     { checkpoint: CheckpointId, remaining: Countdown },
    Exiting      { leg: Leg },
}

// ── AgentController ───────────────────────────────────────────────────────────

/// State machine for one customer.
///
/// Owns its RNG, so stepping many controllers is order-independent.
pub struct AgentController {
    id:       AgentId,
    profile:  AgentProfile,
    warnings: WarningTimer,
    phase:    Phase,
    ladder:   RecoveryLadder,
    rng:      AgentRng,
    position: ShopPoint,
    heading:  f32,
    /// Commands queued outside a step (creation, exit order); flushed first
    /// on the next step.
    outbox:   Vec<AgentCommand>,
}

impl AgentController {
    /// Create a customer standing at `spawn_at` and send it toward a random
    /// checkpoint.
    ///
    /// The warning budget is fixed here: 3 for a thief, uniformly 0–2
    /// otherwise.
    ///
    /// # Errors
    ///
    /// [`AgentError::NoCheckpoints`] if the layout has nowhere to browse.
    pub fn new(
        id:          AgentId,
        profile:     AgentProfile,
        spawn_at:    ShopPoint,
        global_seed: u64,
        ctx:         &AgentContext<'_>,
    ) -> AgentResult<Self> {
        if ctx.checkpoints.is_empty() {
            return Err(AgentError::NoCheckpoints(id));
        }
        let mut rng = AgentRng::new(global_seed, id);
        let total = if profile.is_thief {
            CONFIRMED_WARNINGS
        } else {
            rng.gen_range(0..CONFIRMED_WARNINGS)
        };
        let timings = ctx.timings;

        let checkpoint = pick_checkpoint(&mut rng, ctx.checkpoints.len(), None);
        let target = ctx.checkpoints[checkpoint.index()];
        let mut outbox = vec![AgentCommand::SetMovingAnimation(true)];
        let leg = Leg::dispatched(target, &mut outbox);

        Ok(Self {
            id,
            profile,
            warnings: WarningTimer::new(total, timings.warning_interval, timings.warning_display),
            phase: Phase::Moving { checkpoint, leg },
            ladder: RecoveryLadder::new(),
            rng,
            position: spawn_at,
            heading: spawn_at.heading_to(target).unwrap_or(0.0),
            outbox,
        })
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[inline]
    pub fn profile(&self) -> AgentProfile {
        self.profile
    }

    /// Ground truth.  Operators only ever see the warning count.
    #[inline]
    pub fn is_thief(&self) -> bool {
        self.profile.is_thief
    }

    #[inline]
    pub fn total_warnings_to_show(&self) -> u8 {
        self.warnings.total()
    }

    #[inline]
    pub fn current_warning_count(&self) -> u8 {
        self.warnings.shown()
    }

    /// Observed predicate: all three warnings have been shown.  Only thieves
    /// can get there, but a thief is not confirmed before its third warning.
    #[inline]
    pub fn is_confirmed_thief(&self) -> bool {
        self.current_warning_count() >= CONFIRMED_WARNINGS
    }

    pub fn is_warning_visible(&self) -> bool {
        self.warnings.is_visible()
    }

    pub fn current_state(&self) -> AgentState {
        match self.phase {
            Phase::Moving { .. }       => AgentState::Moving,
            Phase::AtCheckpoint { .. } => AgentState::AtCheckpoint,
            Phase::Dwelling { .. }     => AgentState::Dwelling,
            Phase::Exiting { .. }      => AgentState::Exiting,
        }
    }

    /// Checkpoint being walked to or occupied; `None` while exiting.
    pub fn destination_index(&self) -> Option<CheckpointId> {
        match self.phase {
            Phase::Moving { checkpoint, .. }
            | Phase::AtCheckpoint { checkpoint, .. }
            | Phase::Dwelling { checkpoint, .. } => Some(checkpoint),
            Phase::Exiting { .. } => None,
        }
    }

    #[inline]
    pub fn position(&self) -> ShopPoint {
        self.position
    }

    #[inline]
    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn recovery_tokens(&self) -> u8 {
        self.ladder.tokens_used()
    }

    // ── Inputs from the session ───────────────────────────────────────────

    /// The oracle's answer to this step's `SetDestination` /
    /// `ResetNavigation`.  A refusal is retried on the next step.
    pub fn destination_ack(&mut self, accepted: bool) {
        let leg = match &mut self.phase {
            Phase::Moving { leg, .. } | Phase::Exiting { leg } => leg,
            Phase::AtCheckpoint { .. } | Phase::Dwelling { .. } => return,
        };
        if leg.status != LegStatus::Awaiting {
            return;
        }
        leg.status = if accepted { LegStatus::Tracking } else { LegStatus::Undispatched };
    }

    /// Abandon browsing and walk to `exit`.  Idempotent.
    pub fn begin_exit(&mut self, exit: ShopPoint) {
        if matches!(self.phase, Phase::Exiting { .. }) {
            return;
        }
        self.outbox.push(AgentCommand::SetMovingAnimation(true));
        let leg = Leg::dispatched(exit, &mut self.outbox);
        self.phase = Phase::Exiting { leg };
        debug!(agent = %self.id, "exit walk started");
    }

    // ── Step ──────────────────────────────────────────────────────────────

    /// Advance both regions by one tick.
    ///
    /// `status` is the oracle reading collected at the start of this tick;
    /// `None` means the oracle could not report, which counts as a tick
    /// without progress.
    pub fn step(&mut self, status: Option<NavStatus>, ctx: &AgentContext<'_>) -> StepReport {
        let mut report = StepReport {
            commands: std::mem::take(&mut self.outbox),
            ..StepReport::default()
        };
        if let Some(s) = &status {
            self.observe_position(s.position);
        }

        self.step_warnings(&mut report.commands);
        self.step_movement(status.as_ref(), ctx, &mut report);
        report
    }

    fn step_warnings(&mut self, cmds: &mut Vec<AgentCommand>) {
        let (hidden, shown) = self.warnings.tick();
        if hidden.is_some() {
            cmds.push(AgentCommand::HideWarning);
        }
        if let Some(WarningEvent::Shown { count }) = shown {
            debug!(agent = %self.id, count, "warning shown");
            cmds.push(AgentCommand::ShowWarning { count });
        }
    }

    fn step_movement(
        &mut self,
        status: Option<&NavStatus>,
        ctx:    &AgentContext<'_>,
        report: &mut StepReport,
    ) {
        let timings = ctx.timings;
        let cmds = &mut report.commands;

        let next = match &mut self.phase {
            Phase::Moving { checkpoint, leg } => {
                leg.redispatch_if_needed(cmds);
                let progressed = leg.track(status, timings.progress_epsilon);

                if leg.arrived(status, timings.arrival_threshold) {
                    self.ladder.reset();
                    Some(orient(*checkpoint, self.position, self.heading, ctx, cmds))
                } else if progressed {
                    self.ladder.reset();
                    leg.stalled_ticks = 0;
                    None
                } else {
                    leg.stalled_ticks += 1;
                    if leg.stalled_ticks < timings.stuck_ticks {
                        None
                    } else {
                        let step = self.ladder.escalate();
                        report.recovery = Some(step);
                        debug!(agent = %self.id, ?step, "stuck; recovering");
                        match step {
                            RecoveryStep::Retarget => {
                                let cp = pick_checkpoint(
                                    &mut self.rng, ctx.checkpoints.len(), Some(*checkpoint),
                                );
                                *checkpoint = cp;
                                *leg = Leg::dispatched(ctx.checkpoints[cp.index()], cmds);
                                None
                            }
                            RecoveryStep::ResetNavigation => {
                                cmds.push(AgentCommand::ResetNavigation(leg.target));
                                *leg = Leg::with_status(leg.target, LegStatus::Awaiting);
                                None
                            }
                            RecoveryStep::Teleport => {
                                cmds.push(AgentCommand::Teleport(leg.target));
                                self.position = leg.target;
                                Some(orient(*checkpoint, self.position, self.heading, ctx, cmds))
                            }
                        }
                    }
                }
            }

            Phase::AtCheckpoint { checkpoint, rotation } => match rotation {
                None => Some(dwell(*checkpoint, timings.dwell_ticks)),
                Some(r) => {
                    if r.elapsed < r.total {
                        r.elapsed += 1;
                        self.heading = r.heading_at(r.elapsed);
                        cmds.push(AgentCommand::Face(self.heading));
                    }
                    if r.elapsed >= r.total {
                        self.heading = r.to;
                        Some(dwell(*checkpoint, timings.dwell_ticks))
                    } else {
                        None
                    }
                }
            },

            Phase::Dwelling { checkpoint, remaining } => {
                if remaining.tick() {
                    let cp = pick_checkpoint(&mut self.rng, ctx.checkpoints.len(), Some(*checkpoint));
                    cmds.push(AgentCommand::SetMovingAnimation(true));
                    let leg = Leg::dispatched(ctx.checkpoints[cp.index()], cmds);
                    Some(Phase::Moving { checkpoint: cp, leg })
                } else {
                    None
                }
            }

            Phase::Exiting { leg } => {
                leg.redispatch_if_needed(cmds);
                leg.track(status, timings.progress_epsilon);
                if leg.arrived(status, timings.arrival_threshold) {
                    report.reached_exit = true;
                }
                None
            }
        };

        if let Some(next) = next {
            debug!(agent = %self.id, from = %self.current_state(), "transition");
            self.phase = next;
        }
    }

    /// Track the oracle's position.  Heading follows the direction of travel
    /// only while walking; at a checkpoint it belongs to the rotation.
    fn observe_position(&mut self, p: ShopPoint) {
        let walking = matches!(self.phase, Phase::Moving { .. } | Phase::Exiting { .. });
        if walking && self.position.distance_sq(p) > 1e-6 {
            if let Some(h) = self.position.heading_to(p) {
                self.heading = h;
            }
        }
        self.position = p;
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Uniform random checkpoint, never `exclude` when there is a choice.
fn pick_checkpoint(rng: &mut AgentRng, count: usize, exclude: Option<CheckpointId>) -> CheckpointId {
    // Only the first MAX_CHECKPOINTS points are addressable.
    let count = count.min(MAX_CHECKPOINTS);
    match exclude {
        Some(prev) if count > 1 && prev.index() < count => {
            let mut i = rng.gen_range(0..count - 1);
            if i >= prev.index() {
                i += 1;
            }
            CheckpointId(i as u16)
        }
        _ => CheckpointId(rng.gen_range(0..count) as u16),
    }
}

/// Enter `AtCheckpoint`, planning the turn toward the nearest landmark.
fn orient(
    checkpoint: CheckpointId,
    position:   ShopPoint,
    heading:    f32,
    ctx:        &AgentContext<'_>,
    cmds:       &mut Vec<AgentCommand>,
) -> Phase {
    cmds.push(AgentCommand::SetMovingAnimation(false));
    let rotation = ctx
        .landmarks
        .nearest(position)
        .and_then(|(_, landmark)| position.heading_to(landmark))
        .map(|to| {
            let angle = angular_distance_deg(heading, to);
            let total = (angle / ctx.timings.rotation_deg_per_tick).ceil() as u64;
            Rotation { from: heading, to, total, elapsed: 0 }
        });
    Phase::AtCheckpoint { checkpoint, rotation }
}

fn dwell(checkpoint: CheckpointId, dwell_ticks: u64) -> Phase {
    Phase::Dwelling { checkpoint, remaining: Countdown::new(dwell_ticks) }
}
