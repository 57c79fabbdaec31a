//! Game configuration.
//!
//! `GameConfig` holds every tunable constant of a session.  Durations are in
//! seconds (as a designer would write them); [`GameConfig::timings`] resolves
//! them into whole ticks for the configured quantum.
//!
//! Every field has a default, so a TOML file only needs to list overrides:
//!
//! ```toml
//! seed = 7
//! wave_duration_secs = 45.0
//! warning_interval_secs = 6.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult, SimClock};

/// Top-level session configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Milliseconds per scheduling tick.
    pub tick_ms: u32,
    /// Master RNG seed.  The same seed and the same operator inputs always
    /// produce identical runs.
    pub seed: u64,

    // ── Day / wave structure ──────────────────────────────────────────────
    /// Number of days in a full session.
    pub days: u32,
    pub waves_per_day: u32,
    pub customers_per_wave: u32,
    pub max_thieves_per_wave: u32,
    /// Day timer budget; the timer only runs while a wave is active.
    pub day_duration_secs: f32,
    pub wave_duration_secs: f32,
    pub rest_duration_secs: f32,
    /// A new wave (and the rest before it) is skipped when less day time
    /// than this remains.
    pub min_wave_secs: f32,
    pub spawn_interval_secs: f32,
    /// Ceiling on the end-of-wave walk to the exit.
    pub exit_timeout_secs: f32,

    // ── Agent behavior ────────────────────────────────────────────────────
    pub warning_interval_secs: f32,
    pub warning_display_secs: f32,
    pub dwell_secs: f32,
    /// Turn rate while orienting toward a landmark.
    pub rotation_speed_deg_per_sec: f32,
    /// Remaining distance (m) at which an agent counts as arrived.
    pub arrival_threshold: f32,
    /// Time without forward progress before a recovery step runs.
    pub stuck_secs: f32,
    /// Minimum decrease in remaining distance (m) that counts as progress.
    pub progress_epsilon: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_ms:                    100,
            seed:                       42,
            days:                       5,
            waves_per_day:              4,
            customers_per_wave:         4,
            max_thieves_per_wave:       2,
            day_duration_secs:          240.0,
            wave_duration_secs:         60.0,
            rest_duration_secs:         10.0,
            min_wave_secs:              12.0,
            spawn_interval_secs:        3.0,
            exit_timeout_secs:          15.0,
            warning_interval_secs:      8.0,
            warning_display_secs:       2.0,
            dwell_secs:                 4.0,
            rotation_speed_deg_per_sec: 180.0,
            arrival_threshold:          0.5,
            stuck_secs:                 3.0,
            progress_epsilon:           0.01,
        }
    }
}

impl GameConfig {
    /// Parse a TOML document.  Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> CoreResult<Self> {
        let config: GameConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject configurations the scheduler cannot run at all.
    pub fn validate(&self) -> CoreResult<()> {
        if self.tick_ms == 0 {
            return Err(CoreError::Config("tick_ms must be > 0".into()));
        }
        if self.waves_per_day == 0 || self.waves_per_day > u32::from(u8::MAX) {
            return Err(CoreError::Config("waves_per_day must be in 1..=255".into()));
        }
        if self.customers_per_wave == 0 {
            return Err(CoreError::Config("customers_per_wave must be > 0".into()));
        }
        // Written so NaN fails as well.
        if !(self.rotation_speed_deg_per_sec > 0.0 && self.rotation_speed_deg_per_sec.is_finite()) {
            return Err(CoreError::Config("rotation_speed_deg_per_sec must be > 0".into()));
        }
        let non_negative = [
            ("day_duration_secs", self.day_duration_secs),
            ("wave_duration_secs", self.wave_duration_secs),
            ("rest_duration_secs", self.rest_duration_secs),
            ("min_wave_secs", self.min_wave_secs),
            ("spawn_interval_secs", self.spawn_interval_secs),
            ("exit_timeout_secs", self.exit_timeout_secs),
            ("warning_interval_secs", self.warning_interval_secs),
            ("warning_display_secs", self.warning_display_secs),
            ("dwell_secs", self.dwell_secs),
            ("stuck_secs", self.stuck_secs),
            ("arrival_threshold", self.arrival_threshold),
            ("progress_epsilon", self.progress_epsilon),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(CoreError::Config(format!("{name} must be a finite value >= 0")));
            }
        }
        Ok(())
    }

    /// A clock running at this configuration's quantum.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_ms)
    }

    /// Resolve every second-valued setting to ticks.
    pub fn timings(&self) -> Timings {
        let clock = self.make_clock();
        let t = |secs: f32| clock.ticks_for_secs(secs);
        Timings {
            secs_per_tick:        clock.secs_per_tick(),
            day_ticks:            t(self.day_duration_secs),
            wave_ticks:           t(self.wave_duration_secs).max(1),
            rest_ticks:           t(self.rest_duration_secs),
            min_wave_ticks:       t(self.min_wave_secs),
            spawn_interval_ticks: t(self.spawn_interval_secs),
            exit_timeout_ticks:   t(self.exit_timeout_secs).max(1),
            warning_interval:     t(self.warning_interval_secs).max(1),
            warning_display:      t(self.warning_display_secs),
            dwell_ticks:          t(self.dwell_secs),
            stuck_ticks:          t(self.stuck_secs).max(1),
            rotation_deg_per_tick: self.rotation_speed_deg_per_sec * clock.secs_per_tick(),
            arrival_threshold:    self.arrival_threshold,
            progress_epsilon:     self.progress_epsilon,
        }
    }
}

/// Durations from [`GameConfig`] resolved to whole ticks.
///
/// Cheap to copy; handed to every controller at spawn.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Timings {
    pub secs_per_tick:         f32,
    pub day_ticks:             u64,
    pub wave_ticks:            u64,
    pub rest_ticks:            u64,
    pub min_wave_ticks:        u64,
    pub spawn_interval_ticks:  u64,
    pub exit_timeout_ticks:    u64,
    pub warning_interval:      u64,
    pub warning_display:       u64,
    pub dwell_ticks:           u64,
    pub stuck_ticks:           u64,
    pub rotation_deg_per_tick: f32,
    pub arrival_threshold:     f32,
    pub progress_epsilon:      f32,
}

impl Default for Timings {
    fn default() -> Self {
        GameConfig::default().timings()
    }
}
