//! The `NavigationOracle` trait: movement is delegated, never computed here.

use sw_core::{AgentId, ShopPoint};

/// A snapshot of one agent's navigation state, read once per tick before the
/// agent step phase.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NavStatus {
    /// `true` while the oracle is still computing a path.
    pub pending: bool,
    /// Distance left to the current destination, in metres.
    pub remaining_distance: f32,
    /// Current speed in m/s.
    pub velocity: f32,
    /// Where the agent currently stands.
    pub position: ShopPoint,
}

impl NavStatus {
    /// A stationary agent at `position` with nothing left to travel.
    pub fn idle_at(position: ShopPoint) -> Self {
        Self { pending: false, remaining_distance: 0.0, velocity: 0.0, position }
    }
}

/// Movement capability supplied by the host engine.
///
/// All methods are called from the serialized apply phase of the session
/// tick; none of them may block.
///
/// # Failure model
///
/// `set_destination` may refuse (agent off the navigable surface, point not
/// reachable) and `query` may have nothing to report.  Neither is fatal: the
/// agent controller holds position and retries next tick, and its recovery
/// ladder ends in a [`teleport`](Self::teleport), which always succeeds.
pub trait NavigationOracle: Send {
    /// Register a new agent standing at `at`.
    fn spawn(&mut self, agent: AgentId, at: ShopPoint);

    /// Forget `agent`.  Unknown ids are ignored.
    fn despawn(&mut self, agent: AgentId);

    /// Start moving `agent` toward `point`.  Returns `false` if the oracle
    /// refused the request.
    fn set_destination(&mut self, agent: AgentId, point: ShopPoint) -> bool;

    /// Current navigation state, or `None` when the oracle cannot report
    /// (unknown agent, agent off the navigable surface).
    fn query(&self, agent: AgentId) -> Option<NavStatus>;

    /// Place `agent` at `point` immediately and clear its destination.
    fn teleport(&mut self, agent: AgentId, point: ShopPoint);

    /// Disable or re-enable the agent's navigation capability.  Disabling
    /// drops any in-flight path.
    fn set_enabled(&mut self, agent: AgentId, enabled: bool);

    /// Integrate movement over `dt_secs`.  Engines that move agents on their
    /// own frame loop keep the default no-op.
    fn advance(&mut self, _dt_secs: f32) {}
}
