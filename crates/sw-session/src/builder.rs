//! Fluent builder for constructing a [`GameSession`].

use sw_core::GameConfig;
use sw_nav::{NavigationOracle, NoopPresentation, PresentationSink, ShopLayout};
use sw_schedule::DayTable;
use sw_score::{NoopScoreSink, ScoreSink};
use tracing::warn;

use crate::{GameSession, SessionError, SessionResult};

/// Fluent builder for [`GameSession<N, P, S>`].
///
/// # Required inputs
///
/// - [`GameConfig`]: seed, quantum, day/wave structure, agent timings
/// - [`ShopLayout`]: entrance, exit, checkpoints, landmarks, templates
/// - `N: NavigationOracle`: the host's pathfinding
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                 |
/// |----------------------|-------------------------|
/// | `.presentation(p)`   | `NoopPresentation`      |
/// | `.score_sink(s)`     | `NoopScoreSink`         |
/// | `.day_table(t)`      | `DayTable::default()`   |
///
/// # Example
///
/// ```rust,ignore
/// let mut session = SessionBuilder::new(config, layout, StraightLineOracle::new(1.4))
///     .day_table(load_day_table_csv("days.csv")?)
///     .build()?;
/// session.run_day(&mut NoopObserver)?;
/// ```
pub struct SessionBuilder<N: NavigationOracle, P: PresentationSink, S: ScoreSink> {
    config:       GameConfig,
    layout:       ShopLayout,
    oracle:       N,
    presentation: P,
    sink:         S,
    day_table:    Option<DayTable>,
}

impl<N: NavigationOracle> SessionBuilder<N, NoopPresentation, NoopScoreSink> {
    /// Create a builder with all required inputs.
    pub fn new(config: GameConfig, layout: ShopLayout, oracle: N) -> Self {
        Self {
            config,
            layout,
            oracle,
            presentation: NoopPresentation,
            sink:         NoopScoreSink,
            day_table:    None,
        }
    }
}

impl<N: NavigationOracle, P: PresentationSink, S: ScoreSink> SessionBuilder<N, P, S> {
    /// Route warning icons, animation and facing to `presentation`.
    pub fn presentation<P2: PresentationSink>(self, presentation: P2) -> SessionBuilder<N, P2, S> {
        SessionBuilder {
            config: self.config,
            layout: self.layout,
            oracle: self.oracle,
            presentation,
            sink: self.sink,
            day_table: self.day_table,
        }
    }

    /// Announce every score change to `sink`.
    pub fn score_sink<S2: ScoreSink>(self, sink: S2) -> SessionBuilder<N, P, S2> {
        SessionBuilder {
            config: self.config,
            layout: self.layout,
            oracle: self.oracle,
            presentation: self.presentation,
            sink,
            day_table: self.day_table,
        }
    }

    /// Supply per-day thief quotas and pass thresholds.
    pub fn day_table(mut self, table: DayTable) -> Self {
        self.day_table = Some(table);
        self
    }

    /// Validate inputs and return a session waiting on day 1.
    ///
    /// Layout deficiencies are not errors: each is logged once here and the
    /// affected spawns are skipped at run time.
    pub fn build(self) -> SessionResult<GameSession<N, P, S>> {
        self.config.validate()?;
        if self.config.days == 0 {
            return Err(SessionError::Config("days must be > 0".into()));
        }
        for deficiency in self.layout.deficiencies() {
            warn!(%deficiency, "incomplete shop layout");
        }
        if !self.layout.can_spawn() {
            warn!("no customer can be spawned; every wave will be empty");
        }

        let table = self.day_table.unwrap_or_default();
        Ok(GameSession::assemble(
            self.config,
            self.layout,
            table,
            self.oracle,
            self.presentation,
            self.sink,
        ))
    }
}
