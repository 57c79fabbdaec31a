//! Unit tests for sw-schedule.

use sw_core::{AgentId, SimRng, TemplateId};

use crate::{
    DayRequirement, DayTable, SchedulerEvent, ScheduleError, Wave, WavePlan, WaveScheduler,
    WaveState, allocate_thieves,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn plan() -> WavePlan {
    WavePlan {
        waves_per_day:        4,
        customers_per_wave:   4,
        max_thieves_per_wave: 2,
        wave_ticks:           20,
        rest_ticks:           5,
        min_wave_ticks:       3,
        spawn_interval_ticks: 3,
        exit_timeout_ticks:   6,
        template_count:       3,
    }
}

/// Day clock that, like the session's, only runs while a wave is active.
struct DayClock {
    budget:  u64,
    elapsed: u64,
}

fn drive(
    sched: &mut WaveScheduler,
    rng:   &mut SimRng,
    clock: &mut DayClock,
    ticks: u64,
) -> Vec<(u64, SchedulerEvent)> {
    let mut out = Vec::new();
    for t in 1..=ticks {
        if sched.is_wave_active() {
            clock.elapsed = (clock.elapsed + 1).min(clock.budget);
        }
        let remaining = clock.budget - clock.elapsed;
        out.extend(sched.tick(rng, remaining).into_iter().map(|e| (t, e)));
    }
    out
}

fn count(events: &[(u64, SchedulerEvent)], pred: impl Fn(&SchedulerEvent) -> bool) -> usize {
    events.iter().filter(|(_, e)| pred(e)).count()
}

// ── Allocation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod allocation {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn quota_of_five_over_four_waves() {
        let mut rng = SimRng::new(1);
        let a = allocate_thieves(5, 4, 2, &mut rng);
        assert_eq!(a.per_wave.len(), 4);
        assert_eq!(a.total(), 5);
        assert_eq!(a.dropped, 0);
        assert!(a.per_wave.iter().all(|&n| n <= 2));
    }

    #[test]
    fn placement_is_random_not_round_robin() {
        let mut heavy_waves = std::collections::HashSet::new();
        for seed in 0..50 {
            let a = allocate_thieves(5, 4, 2, &mut SimRng::new(seed));
            let heavy = a.per_wave.iter().position(|&n| n == 2).unwrap();
            heavy_waves.insert(heavy);
        }
        assert!(heavy_waves.len() > 1);
    }

    #[test]
    fn overflow_is_dropped() {
        let a = allocate_thieves(11, 4, 2, &mut SimRng::new(3));
        assert_eq!(a.per_wave, vec![2, 2, 2, 2]);
        assert_eq!(a.dropped, 3);
    }

    #[test]
    fn zero_cap_drops_everything() {
        let a = allocate_thieves(3, 4, 0, &mut SimRng::new(3));
        assert_eq!(a.total(), 0);
        assert_eq!(a.dropped, 3);
    }

    #[test]
    fn for_wave_is_one_based() {
        let a = allocate_thieves(8, 4, 2, &mut SimRng::new(9));
        assert_eq!(a.for_wave(1), 2);
        assert_eq!(a.for_wave(4), 2);
        assert_eq!(a.for_wave(0), 0);
        assert_eq!(a.for_wave(5), 0);
    }

    proptest! {
        #[test]
        fn sum_is_capped_quota(quota in 0u32..30, waves in 1u32..8, cap in 0u32..4, seed: u64) {
            let a = allocate_thieves(quota, waves, cap, &mut SimRng::new(seed));
            prop_assert_eq!(a.per_wave.len(), waves as usize);
            prop_assert_eq!(a.total(), quota.min(cap * waves));
            prop_assert_eq!(a.dropped, quota - a.total());
            prop_assert!(a.per_wave.iter().all(|&n| n <= cap));
        }
    }
}

// ── Wave ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod wave {
    use super::*;

    #[test]
    fn flags_hold_exact_quota() {
        let wave = Wave::new(1, 2, 4, &mut SimRng::new(5));
        assert_eq!(wave.spawn_flags().len(), 4);
        assert_eq!(wave.spawn_flags().iter().filter(|&&f| f).count(), 2);
    }

    #[test]
    fn thief_positions_are_shuffled() {
        let mut orders = std::collections::HashSet::new();
        for seed in 0..40 {
            orders.insert(Wave::new(1, 1, 4, &mut SimRng::new(seed)).spawn_flags().to_vec());
        }
        assert!(orders.len() > 1);
    }

    #[test]
    fn quota_larger_than_wave_is_truncated() {
        let wave = Wave::new(1, 9, 4, &mut SimRng::new(0));
        assert_eq!(wave.thief_quota, 4);
        assert!(wave.spawn_flags().iter().all(|&f| f));
    }

    #[test]
    fn templates_are_unique_until_exhausted() {
        let mut rng = SimRng::new(11);
        let mut wave = Wave::new(1, 0, 4, &mut rng);
        let mut used = Vec::new();
        for _ in 0..3 {
            let t = wave.pick_template(3, &mut rng).unwrap();
            assert!(!used.contains(&t));
            used.push(t);
            wave.consume_slot(t);
        }
        // All three used: any template is acceptable now.
        let t = wave.pick_template(3, &mut rng).unwrap();
        assert!(t.0 < 3);
    }

    #[test]
    fn no_templates_means_no_pick() {
        let mut rng = SimRng::new(0);
        let wave = Wave::new(1, 0, 4, &mut rng);
        assert_eq!(wave.pick_template(0, &mut rng), None);
    }

    #[test]
    fn sealed_after_every_slot() {
        let mut rng = SimRng::new(2);
        let mut wave = Wave::new(1, 1, 2, &mut rng);
        assert!(!wave.is_sealed());
        wave.consume_slot(TemplateId(0));
        wave.skip_slot();
        assert!(wave.is_sealed());
        assert_eq!(wave.next_flag(), None);
        assert_eq!(wave.skipped(), 1);
    }
}

// ── WaveScheduler ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler {
    use super::*;

    #[test]
    fn idle_until_begin_day() {
        let mut sched = WaveScheduler::new(plan());
        let mut rng = SimRng::new(0);
        assert!(sched.tick(&mut rng, 100).is_empty());
        assert_eq!(sched.state(), WaveState::Idle);
        assert!(!sched.is_day_open());
    }

    #[test]
    fn first_wave_timeline() {
        let mut sched = WaveScheduler::new(plan());
        let mut rng = SimRng::new(4);
        sched.begin_day(2, &mut rng);
        let mut clock = DayClock { budget: 1000, elapsed: 0 };
        let events = drive(&mut sched, &mut rng, &mut clock, 26);

        let spawn_ticks: Vec<u64> = events
            .iter()
            .filter(|(_, e)| matches!(e, SchedulerEvent::Spawn(o) if o.wave == 1))
            .map(|(t, _)| *t)
            .collect();
        assert_eq!(spawn_ticks, vec![1, 4, 7, 10]);
        assert!(events.contains(&(21, SchedulerEvent::WaveEnded { wave: 1 })));
        assert!(events.contains(&(21, SchedulerEvent::RestStarted { next_wave: 2 })));
        assert!(events.contains(&(26, SchedulerEvent::WaveStarted {
            wave:        2,
            thief_quota: sched.allocation().for_wave(2),
        })));
        // The day clock ran for wave 1 only.
        assert_eq!(clock.elapsed, 20);
    }

    #[test]
    fn full_day_runs_every_wave() {
        let mut sched = WaveScheduler::new(plan());
        let mut rng = SimRng::new(8);
        let quota = sched.begin_day(5, &mut rng).total();
        let mut clock = DayClock { budget: 1000, elapsed: 0 };
        let events = drive(&mut sched, &mut rng, &mut clock, 200);

        assert_eq!(count(&events, |e| matches!(e, SchedulerEvent::WaveStarted { .. })), 4);
        assert_eq!(count(&events, |e| matches!(e, SchedulerEvent::Spawn(_))), 16);
        assert_eq!(count(&events, |e| matches!(e, SchedulerEvent::WaveEnded { .. })), 4);
        assert_eq!(count(&events, |e| matches!(e, SchedulerEvent::RestStarted { .. })), 3);
        assert_eq!(count(&events, |e| matches!(e, SchedulerEvent::ClosingStarted)), 1);
        assert_eq!(count(&events, |e| matches!(e, SchedulerEvent::ExitTimedOut { .. })), 4);
        assert_eq!(events.last(), Some(&(102, SchedulerEvent::DayClosed)));

        let thieves = count(&events, |e| matches!(e, SchedulerEvent::Spawn(o) if o.is_thief));
        assert_eq!(thieves as u32, quota);
        assert_eq!(clock.elapsed, 80);
        assert_eq!(sched.state(), WaveState::Idle);
        assert!(!sched.is_day_open());
        assert_eq!(sched.finished_waves().len(), 4);
    }

    #[test]
    fn day_budget_cuts_wave_short() {
        let mut sched = WaveScheduler::new(plan());
        let mut rng = SimRng::new(1);
        sched.begin_day(2, &mut rng);
        let mut clock = DayClock { budget: 30, elapsed: 0 };
        let events = drive(&mut sched, &mut rng, &mut clock, 100);

        assert_eq!(sched.waves_started(), 2);
        assert!(events.contains(&(36, SchedulerEvent::WaveEnded { wave: 2 })));
        assert!(events.contains(&(36, SchedulerEvent::ClosingStarted)));
        assert_eq!(events.last(), Some(&(42, SchedulerEvent::DayClosed)));
    }

    #[test]
    fn too_little_time_skips_rest_and_next_wave() {
        let mut sched = WaveScheduler::new(plan());
        let mut rng = SimRng::new(1);
        sched.begin_day(0, &mut rng);
        let mut clock = DayClock { budget: 42, elapsed: 0 };
        let events = drive(&mut sched, &mut rng, &mut clock, 100);

        assert_eq!(sched.waves_started(), 2);
        assert_eq!(count(&events, |e| matches!(e, SchedulerEvent::RestStarted { .. })), 1);
        assert_eq!(clock.elapsed, 40);
    }

    #[test]
    fn completed_exit_walks_close_the_day_early() {
        let mut sched = WaveScheduler::new(plan());
        let mut rng = SimRng::new(1);
        sched.begin_day(0, &mut rng);
        let mut clock = DayClock { budget: 20, elapsed: 0 };
        let events = drive(&mut sched, &mut rng, &mut clock, 21);
        assert!(events.contains(&(21, SchedulerEvent::ClosingStarted)));
        assert_eq!(sched.pending_exit_walks().collect::<Vec<_>>(), vec![1]);

        sched.complete_exit_walk(1);
        assert_eq!(sched.tick(&mut rng, 0), vec![SchedulerEvent::DayClosed]);
    }

    #[test]
    fn cancel_leaves_no_live_timers() {
        let mut sched = WaveScheduler::new(plan());
        let mut rng = SimRng::new(6);
        sched.begin_day(4, &mut rng);
        let mut clock = DayClock { budget: 1000, elapsed: 0 };
        drive(&mut sched, &mut rng, &mut clock, 30);
        assert!(sched.is_wave_active());

        sched.cancel();
        assert_eq!(sched.state(), WaveState::Idle);
        assert!(sched.current_wave().is_none());
        assert_eq!(sched.pending_exit_walks().count(), 0);
        for _ in 0..200 {
            assert!(sched.tick(&mut rng, 1000).is_empty());
        }
    }

    #[test]
    fn missing_templates_skip_spawns() {
        let mut sched = WaveScheduler::new(WavePlan { template_count: 0, ..plan() });
        let mut rng = SimRng::new(0);
        sched.begin_day(2, &mut rng);
        let mut clock = DayClock { budget: 1000, elapsed: 0 };
        let events = drive(&mut sched, &mut rng, &mut clock, 21);

        assert_eq!(count(&events, |e| matches!(e, SchedulerEvent::Spawn(_))), 0);
        assert_eq!(count(&events, |e| matches!(e, SchedulerEvent::SpawnSkipped { .. })), 4);
        assert_eq!(sched.finished_waves()[0].skipped(), 4);
    }

    #[test]
    fn cap_above_wave_size_drops_excess_quota() {
        let tight = WavePlan { waves_per_day: 1, customers_per_wave: 2, max_thieves_per_wave: 3, ..plan() };
        let mut sched = WaveScheduler::new(tight);
        let mut rng = SimRng::new(0);
        let allocation = sched.begin_day(3, &mut rng).clone();
        assert_eq!(allocation.total(), 2);
        assert_eq!(allocation.dropped, 1);

        let mut clock = DayClock { budget: 1000, elapsed: 0 };
        let events = drive(&mut sched, &mut rng, &mut clock, 30);
        let thieves = count(&events, |e| matches!(e, SchedulerEvent::Spawn(o) if o.is_thief));
        assert_eq!(thieves as u32, allocation.total());
        assert_eq!(sched.finished_waves()[0].thieves_spawned(), 2);
    }

    #[test]
    fn failed_spawn_counts_as_skipped() {
        let mut sched = WaveScheduler::new(WavePlan { max_thieves_per_wave: 4, ..plan() });
        let mut rng = SimRng::new(0);
        sched.begin_day(16, &mut rng);
        let events = sched.tick(&mut rng, 100);
        let SchedulerEvent::Spawn(order) = events[1] else { panic!("expected a spawn") };
        assert!(order.is_thief);
        assert_eq!(sched.current_wave().unwrap().thieves_spawned(), 1);

        sched.spawn_failed(order.wave, order.slot);
        let wave = sched.current_wave().unwrap();
        assert_eq!(wave.thieves_spawned(), 0);
        assert_eq!(wave.skipped(), 1);
        assert!(wave.spawned().is_empty());
    }

    #[test]
    fn spawned_agents_are_recorded_on_their_wave() {
        let mut sched = WaveScheduler::new(plan());
        let mut rng = SimRng::new(0);
        sched.begin_day(1, &mut rng);
        let events = sched.tick(&mut rng, 100);
        assert!(matches!(events[1], SchedulerEvent::Spawn(o) if o.wave == 1 && o.slot == 0));
        sched.record_agent(1, AgentId(7));
        assert_eq!(sched.current_wave().unwrap().spawned(), &[AgentId(7)]);
    }

    #[test]
    fn begin_day_resets_previous_day() {
        let mut sched = WaveScheduler::new(plan());
        let mut rng = SimRng::new(0);
        sched.begin_day(1, &mut rng);
        let mut clock = DayClock { budget: 1000, elapsed: 0 };
        drive(&mut sched, &mut rng, &mut clock, 200);
        assert_eq!(sched.waves_started(), 4);

        sched.begin_day(3, &mut rng);
        assert_eq!(sched.waves_started(), 0);
        assert!(sched.finished_waves().is_empty());
        assert_eq!(sched.allocation().total(), 3);
    }

    #[test]
    fn zero_day_budget_closes_immediately() {
        let mut sched = WaveScheduler::new(plan());
        let mut rng = SimRng::new(0);
        sched.begin_day(1, &mut rng);
        assert_eq!(
            sched.tick(&mut rng, 0),
            vec![SchedulerEvent::ClosingStarted, SchedulerEvent::DayClosed],
        );
    }
}

// ── DayTable ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod day_table {
    use super::*;

    #[test]
    fn default_has_five_days() {
        let table = DayTable::default();
        assert_eq!(table.len(), 5);
        assert_eq!(table.requirement(1).thief_quota, 2);
        assert_eq!(table.requirement(5).required_score, 1000);
    }

    #[test]
    fn unknown_day_falls_back_to_first_row() {
        let table = DayTable::default();
        let req = table.requirement(9);
        assert_eq!(req.day, 9);
        assert_eq!(req.thief_quota, table.requirement(1).thief_quota);
        assert_eq!(req.required_score, table.requirement(1).required_score);
        assert!(!table.contains(9));
    }

    #[test]
    fn rejects_bad_tables() {
        let row = |day| DayRequirement { day, thief_quota: 1, required_score: 0 };
        assert!(matches!(DayTable::new(vec![]), Err(ScheduleError::EmptyDayTable)));
        assert!(matches!(DayTable::new(vec![row(0)]), Err(ScheduleError::InvalidDay(0))));
        assert!(matches!(
            DayTable::new(vec![row(2), row(1), row(2)]),
            Err(ScheduleError::DuplicateDay(2)),
        ));
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use super::*;
    use crate::load_day_table_reader;

    #[test]
    fn loads_rows_in_any_order() {
        let csv = "day,thief_quota,required_score\n2, 3, 250\n1, 1, 50\n";
        let table = load_day_table_reader(Cursor::new(csv)).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.requirement(1).required_score, 50);
        assert_eq!(table.requirement(2).thief_quota, 3);
    }

    #[test]
    fn negative_threshold_is_allowed() {
        let csv = "day,thief_quota,required_score\n1,0,-100\n";
        let table = load_day_table_reader(Cursor::new(csv)).unwrap();
        assert_eq!(table.requirement(1).required_score, -100);
    }

    #[test]
    fn malformed_row_is_a_parse_error() {
        let csv = "day,thief_quota,required_score\n1,two,100\n";
        assert!(matches!(load_day_table_reader(Cursor::new(csv)), Err(ScheduleError::Parse(_))));
    }

    #[test]
    fn header_only_is_empty() {
        let csv = "day,thief_quota,required_score\n";
        assert!(matches!(load_day_table_reader(Cursor::new(csv)), Err(ScheduleError::EmptyDayTable)));
    }

    #[test]
    fn loads_from_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("days.csv");
        std::fs::write(&path, "day,thief_quota,required_score\n1,2,100\n2,3,250\n").unwrap();
        let table = crate::load_day_table_csv(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.requirement(2).required_score, 250);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = crate::load_day_table_csv(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(ScheduleError::Io(_))));
    }
}
