//! Unit tests for sw-agent.

use rustc_hash::FxHashMap;
use sw_core::{AgentId, ShopPoint, TemplateId, Timings};
use sw_nav::{NavigationOracle, ShopLayout, StraightLineOracle};

use crate::{
    AgentCommand, AgentContext, AgentController, AgentError, AgentProfile, AgentRoster,
    AgentState, RecoveryLadder, RecoveryStep, StepReport, WarningTimer,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const SEED: u64 = 7;

fn p(x: f32, z: f32) -> ShopPoint {
    ShopPoint::new(x, z)
}

fn profile(is_thief: bool) -> AgentProfile {
    AgentProfile { is_thief, template: TemplateId(0), wave: 1 }
}

fn fast_timings() -> Timings {
    Timings {
        warning_interval: 5,
        warning_display:  2,
        dwell_ticks:      3,
        stuck_ticks:      10,
        ..Timings::default()
    }
}

/// A controller wired to a straight-line oracle, applying commands the way
/// the session does.
struct Rig {
    layout:  ShopLayout,
    timings: Timings,
    oracle:  StraightLineOracle,
}

impl Rig {
    fn new(checkpoints: Vec<ShopPoint>, landmarks: Vec<ShopPoint>) -> Self {
        Self {
            layout:  ShopLayout::new(p(0.0, 0.0), p(0.0, -2.0), checkpoints, landmarks, 1),
            timings: fast_timings(),
            oracle:  StraightLineOracle::new(1.4),
        }
    }

    fn spawn(&mut self, id: u32, is_thief: bool) -> AgentController {
        let ctx = AgentContext::new(&self.layout, &self.timings);
        let ctrl = AgentController::new(AgentId(id), profile(is_thief), self.layout.entrance, SEED, &ctx)
            .expect("layout has checkpoints");
        self.oracle.spawn(AgentId(id), self.layout.entrance);
        ctrl
    }

    fn drive(&mut self, ctrl: &mut AgentController) -> StepReport {
        let id = ctrl.id();
        let ctx = AgentContext::new(&self.layout, &self.timings);
        let report = ctrl.step(self.oracle.query(id), &ctx);
        for cmd in &report.commands {
            match *cmd {
                AgentCommand::SetDestination(point) => {
                    let ok = self.oracle.set_destination(id, point);
                    ctrl.destination_ack(ok);
                }
                AgentCommand::ResetNavigation(point) => {
                    self.oracle.set_enabled(id, false);
                    self.oracle.set_enabled(id, true);
                    let ok = self.oracle.set_destination(id, point);
                    ctrl.destination_ack(ok);
                }
                AgentCommand::Teleport(point) => self.oracle.teleport(id, point),
                _ => {}
            }
        }
        self.oracle.advance(self.timings.secs_per_tick);
        report
    }
}

// ── WarningTimer ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod warning_timer {
    use proptest::prelude::*;

    use super::*;
    use crate::WarningEvent;

    #[test]
    fn shows_every_interval_until_budget_spent() {
        let mut timer = WarningTimer::new(3, 4, 1);
        let mut shown_at = Vec::new();
        for t in 1..=40u64 {
            if let (_, Some(WarningEvent::Shown { count })) = timer.tick() {
                shown_at.push((t, count));
            }
        }
        assert_eq!(shown_at, vec![(4, 1), (8, 2), (12, 3)]);
        assert!(timer.is_exhausted());
    }

    #[test]
    fn zero_budget_never_shows() {
        let mut timer = WarningTimer::new(0, 1, 1);
        for _ in 0..20 {
            assert_eq!(timer.tick(), (None, None));
        }
        assert_eq!(timer.shown(), 0);
    }

    #[test]
    fn budget_is_clamped() {
        assert_eq!(WarningTimer::new(9, 1, 1).total(), 3);
    }

    #[test]
    fn warning_hides_after_display_time() {
        let mut timer = WarningTimer::new(1, 2, 3);
        timer.tick();
        timer.tick(); // shown
        assert!(timer.is_visible());
        timer.tick();
        timer.tick();
        assert!(timer.is_visible());
        let (hidden, _) = timer.tick();
        assert_eq!(hidden, Some(WarningEvent::Hidden));
        assert!(!timer.is_visible());
    }

    proptest! {
        #[test]
        fn shown_count_is_bounded_and_sequential(
            total    in 0u8..6,
            interval in 1u64..20,
            display  in 0u64..20,
            ticks    in 1usize..300,
        ) {
            let mut timer = WarningTimer::new(total, interval, display);
            let cap = total.min(3);
            let mut last = 0u8;
            for _ in 0..ticks {
                if let (_, Some(WarningEvent::Shown { count })) = timer.tick() {
                    prop_assert_eq!(count, last + 1);
                    last = count;
                }
                prop_assert!(timer.shown() <= cap);
                prop_assert_eq!(timer.shown(), last);
            }
            if ticks as u64 >= interval * cap as u64 {
                prop_assert_eq!(timer.shown(), cap);
            }
        }
    }
}

// ── RecoveryLadder ────────────────────────────────────────────────────────────

#[cfg(test)]
mod recovery_ladder {
    use super::*;

    #[test]
    fn climbs_in_order_then_restarts() {
        let mut ladder = RecoveryLadder::new();
        assert_eq!(ladder.escalate(), RecoveryStep::Retarget);
        assert_eq!(ladder.escalate(), RecoveryStep::ResetNavigation);
        assert_eq!(ladder.escalate(), RecoveryStep::Teleport);
        assert_eq!(ladder.tokens_used(), 0);
        assert_eq!(ladder.escalate(), RecoveryStep::Retarget);
    }

    #[test]
    fn reset_returns_to_bottom() {
        let mut ladder = RecoveryLadder::new();
        ladder.escalate();
        ladder.escalate();
        ladder.reset();
        assert_eq!(ladder.escalate(), RecoveryStep::Retarget);
    }
}

// ── AgentController ───────────────────────────────────────────────────────────

#[cfg(test)]
mod controller {
    use super::*;

    #[test]
    fn thief_always_gets_three_warnings() {
        let mut rig = Rig::new(vec![p(3.0, 3.0)], vec![]);
        for id in 0..50 {
            assert_eq!(rig.spawn(id, true).total_warnings_to_show(), 3);
        }
    }

    #[test]
    fn non_thief_gets_zero_to_two_warnings() {
        let mut rig = Rig::new(vec![p(3.0, 3.0)], vec![]);
        let mut seen = [false; 3];
        for id in 0..200 {
            let total = rig.spawn(id, false).total_warnings_to_show();
            assert!(total <= 2);
            seen[total as usize] = true;
        }
        assert_eq!(seen, [true; 3], "every budget 0..=2 should occur");
    }

    #[test]
    fn no_checkpoints_is_an_error() {
        let layout = ShopLayout::new(p(0.0, 0.0), p(0.0, 1.0), vec![], vec![], 1);
        let timings = Timings::default();
        let ctx = AgentContext::new(&layout, &timings);
        let err = AgentController::new(AgentId(1), profile(false), p(0.0, 0.0), SEED, &ctx);
        assert!(matches!(err, Err(AgentError::NoCheckpoints(AgentId(1)))));
    }

    #[test]
    fn first_step_starts_walking() {
        let mut rig = Rig::new(vec![p(3.0, 3.0)], vec![]);
        let mut ctrl = rig.spawn(1, false);
        assert_eq!(ctrl.current_state(), AgentState::Moving);
        let report = rig.drive(&mut ctrl);
        assert!(report.commands.contains(&AgentCommand::SetMovingAnimation(true)));
        assert!(report.commands.contains(&AgentCommand::SetDestination(p(3.0, 3.0))));
        assert_eq!(rig.oracle.destination(AgentId(1)), Some(p(3.0, 3.0)));
    }

    #[test]
    fn browse_cycle_moves_through_every_state() {
        let mut rig = Rig::new(vec![p(0.0, 3.0)], vec![p(2.0, 3.0)]);
        let mut ctrl = rig.spawn(1, false);
        let mut states = vec![ctrl.current_state()];
        for _ in 0..200 {
            rig.drive(&mut ctrl);
            let s = ctrl.current_state();
            if states.last() != Some(&s) {
                states.push(s);
            }
        }
        assert!(states.len() >= 4);
        assert_eq!(
            &states[..4],
            &[AgentState::Moving, AgentState::AtCheckpoint, AgentState::Dwelling, AgentState::Moving],
        );
    }

    #[test]
    fn orientation_turns_at_bounded_rate() {
        // Walks +z, then turns to face a landmark directly behind it.
        let mut rig = Rig::new(vec![p(0.0, 5.0)], vec![p(0.0, 2.0)]);
        let mut ctrl = rig.spawn(1, false);
        let mut faces = Vec::new();
        for _ in 0..200 {
            let report = rig.drive(&mut ctrl);
            faces.extend(report.commands.iter().filter_map(|c| match c {
                AgentCommand::Face(h) => Some(*h),
                _ => None,
            }));
            if ctrl.current_state() == AgentState::Dwelling {
                break;
            }
        }
        // 180° at 18°/tick.
        assert!((10..=11).contains(&faces.len()), "got {} face commands", faces.len());
        assert!((ctrl.heading() - 180.0).abs() < 1e-3);
    }

    #[test]
    fn arrival_without_landmarks_goes_straight_to_dwelling() {
        let mut rig = Rig::new(vec![p(0.0, 1.0)], vec![]);
        let mut ctrl = rig.spawn(1, false);
        let mut saw_at_checkpoint = false;
        for _ in 0..100 {
            rig.drive(&mut ctrl);
            match ctrl.current_state() {
                AgentState::AtCheckpoint => saw_at_checkpoint = true,
                AgentState::Dwelling => break,
                _ => {}
            }
        }
        assert!(saw_at_checkpoint);
        assert_eq!(ctrl.current_state(), AgentState::Dwelling);
    }

    #[test]
    fn next_destination_never_repeats_current() {
        let cps = vec![p(1.0, 1.0), p(-1.0, 1.0), p(1.0, 2.0), p(-1.0, 2.0)];
        let mut rig = Rig::new(cps, vec![]);
        let mut ctrl = rig.spawn(3, false);
        let mut prev = (ctrl.current_state(), ctrl.destination_index());
        let mut picks = 0;
        for _ in 0..3000 {
            rig.drive(&mut ctrl);
            let now = (ctrl.current_state(), ctrl.destination_index());
            if prev.0 == AgentState::Dwelling && now.0 == AgentState::Moving {
                assert_ne!(prev.1, now.1);
                picks += 1;
            }
            prev = now;
        }
        assert!(picks >= 3, "only {picks} re-targets observed");
    }

    #[test]
    fn steady_walking_never_triggers_recovery() {
        let mut rig = Rig::new(vec![p(0.0, 30.0)], vec![]);
        let mut ctrl = rig.spawn(1, false);
        for _ in 0..400 {
            let report = rig.drive(&mut ctrl);
            assert_eq!(report.recovery, None);
            if ctrl.current_state() != AgentState::Moving {
                break;
            }
        }
        assert_ne!(ctrl.current_state(), AgentState::Moving);
    }

    #[test]
    fn stuck_agent_climbs_ladder_and_teleports() {
        let cps = vec![p(5.0, 5.0), p(-5.0, 5.0)];
        let mut rig = Rig::new(cps.clone(), vec![]);
        let mut ctrl = rig.spawn(1, false);
        rig.oracle.set_frozen(AgentId(1), true);

        let stuck = rig.timings.stuck_ticks;
        let mut steps = Vec::new();
        for t in 1..=(3 * stuck + 2) {
            let report = rig.drive(&mut ctrl);
            if let Some(step) = report.recovery {
                steps.push((t, step));
            }
            if ctrl.current_state() != AgentState::Moving {
                break;
            }
        }
        assert_eq!(
            steps,
            vec![
                (stuck, RecoveryStep::Retarget),
                (2 * stuck, RecoveryStep::ResetNavigation),
                (3 * stuck, RecoveryStep::Teleport),
            ],
        );
        assert_eq!(ctrl.current_state(), AgentState::AtCheckpoint);
        let target = cps[ctrl.destination_index().unwrap().index()];
        assert_eq!(ctrl.position(), target);
        assert_eq!(rig.oracle.position(AgentId(1)), Some(target));
        assert_eq!(rig.oracle.disable_count, 1);
        assert_eq!(rig.oracle.teleport_count, 1);
        assert_eq!(ctrl.recovery_tokens(), 0);
    }

    #[test]
    fn refused_destination_is_retried_next_step() {
        let mut rig = Rig::new(vec![p(5.0, 5.0)], vec![]);
        rig.oracle.set_bounds(p(100.0, 100.0), p(101.0, 101.0));
        let mut ctrl = rig.spawn(1, false);

        let first = rig.drive(&mut ctrl);
        assert!(first.commands.contains(&AgentCommand::SetDestination(p(5.0, 5.0))));
        let second = rig.drive(&mut ctrl);
        assert!(second.commands.contains(&AgentCommand::SetDestination(p(5.0, 5.0))));

        // Refusals never deadlock: the ladder ends in a teleport.
        for _ in 0..(3 * rig.timings.stuck_ticks) {
            rig.drive(&mut ctrl);
        }
        assert_ne!(ctrl.current_state(), AgentState::Moving);
        assert_eq!(rig.oracle.teleport_count, 1);
    }

    #[test]
    fn missing_status_counts_as_no_progress() {
        let layout = ShopLayout::new(p(0.0, 0.0), p(0.0, 1.0), vec![p(9.0, 9.0)], vec![], 1);
        let timings = fast_timings();
        let ctx = AgentContext::new(&layout, &timings);
        let mut ctrl = AgentController::new(AgentId(2), profile(false), p(0.0, 0.0), SEED, &ctx).unwrap();
        let mut recovered = false;
        for _ in 0..timings.stuck_ticks {
            recovered |= ctrl.step(None, &ctx).recovery.is_some();
        }
        assert!(recovered);
    }

    #[test]
    fn warnings_run_while_stuck() {
        let mut rig = Rig::new(vec![p(5.0, 5.0)], vec![]);
        let mut ctrl = rig.spawn(1, true);
        rig.oracle.set_frozen(AgentId(1), true);

        let mut shows = Vec::new();
        let mut hides = 0;
        for t in 1..=30u64 {
            for cmd in rig.drive(&mut ctrl).commands {
                match cmd {
                    AgentCommand::ShowWarning { count } => shows.push((t, count)),
                    AgentCommand::HideWarning => hides += 1,
                    _ => {}
                }
            }
        }
        assert_eq!(shows, vec![(5, 1), (10, 2), (15, 3)]);
        assert_eq!(hides, 3);
        assert!(ctrl.is_confirmed_thief());
    }

    #[test]
    fn innocent_is_never_confirmed() {
        let mut rig = Rig::new(vec![p(5.0, 5.0), p(1.0, 4.0)], vec![p(0.0, 6.0)]);
        for id in 0..20 {
            let mut ctrl = rig.spawn(id, false);
            for _ in 0..100 {
                rig.drive(&mut ctrl);
                assert!(ctrl.current_warning_count() <= ctrl.total_warnings_to_show());
            }
            assert!(!ctrl.is_confirmed_thief());
            assert!(!ctrl.is_thief());
        }
    }

    #[test]
    fn exit_walk_reaches_exit() {
        let mut rig = Rig::new(vec![p(0.0, 3.0)], vec![]);
        let mut ctrl = rig.spawn(1, false);
        for _ in 0..10 {
            rig.drive(&mut ctrl);
        }
        ctrl.begin_exit(rig.layout.exit);
        ctrl.begin_exit(rig.layout.exit);
        assert_eq!(ctrl.current_state(), AgentState::Exiting);
        assert_eq!(ctrl.destination_index(), None);

        let first = rig.drive(&mut ctrl);
        let dispatches = first
            .commands
            .iter()
            .filter(|c| matches!(c, AgentCommand::SetDestination(_)))
            .count();
        assert_eq!(dispatches, 1);

        let mut reached = false;
        for _ in 0..200 {
            if rig.drive(&mut ctrl).reached_exit {
                reached = true;
                break;
            }
        }
        assert!(reached);
    }

    #[test]
    fn same_seed_same_choices() {
        let run = || {
            let mut rig = Rig::new(vec![p(1.0, 1.0), p(-1.0, 1.0), p(1.0, 3.0)], vec![]);
            let mut ctrl = rig.spawn(4, false);
            (0..500)
                .map(|_| {
                    rig.drive(&mut ctrl);
                    ctrl.destination_index()
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}

// ── AgentRoster ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod roster {
    use super::*;

    fn make(rig: &mut Rig, ids: &[u32]) -> AgentRoster {
        let mut roster = AgentRoster::new();
        for &id in ids {
            roster.insert(rig.spawn(id, false)).unwrap();
        }
        roster
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut rig = Rig::new(vec![p(1.0, 1.0)], vec![]);
        let mut roster = make(&mut rig, &[1]);
        let err = roster.insert(rig.spawn(1, true)).unwrap_err();
        assert!(matches!(err, AgentError::DuplicateAgent(AgentId(1))));
        assert!(!roster.get(AgentId(1)).unwrap().is_thief());
    }

    #[test]
    fn step_all_reports_in_id_order() {
        let mut rig = Rig::new(vec![p(1.0, 1.0)], vec![]);
        let mut roster = make(&mut rig, &[9, 2, 5]);
        let ctx = AgentContext::new(&rig.layout, &rig.timings);
        let reports = roster.step_all(&ctx, &FxHashMap::default());
        let ids: Vec<_> = reports.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![AgentId(2), AgentId(5), AgentId(9)]);
        assert!(reports.iter().all(|(_, r)| !r.commands.is_empty()));
    }

    #[test]
    fn begin_exit_all_and_clear() {
        let mut rig = Rig::new(vec![p(1.0, 1.0)], vec![]);
        let mut roster = make(&mut rig, &[1, 2]);
        roster.begin_exit_all(p(0.0, -1.0));
        assert!(roster.iter().all(|c| c.current_state() == AgentState::Exiting));
        assert_eq!(roster.clear(), vec![AgentId(1), AgentId(2)]);
        assert!(roster.is_empty());
    }

    #[test]
    fn remove_returns_controller() {
        let mut rig = Rig::new(vec![p(1.0, 1.0)], vec![]);
        let mut roster = make(&mut rig, &[3]);
        assert!(roster.remove(AgentId(3)).is_some());
        assert!(roster.remove(AgentId(3)).is_none());
        assert_eq!(roster.len(), 0);
    }
}
