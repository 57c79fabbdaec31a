//! Fire-and-forget presentation hooks.

use sw_core::AgentId;

/// Visual side effects requested by agent controllers.
///
/// Core logic never reads anything back from the sink.
pub trait PresentationSink {
    /// Show or hide the warning signal above `agent`.
    fn set_warning_visible(&mut self, agent: AgentId, visible: bool);

    /// Switch between the walking and idle animation.
    fn set_moving_animation(&mut self, agent: AgentId, moving: bool);

    /// Face `heading_deg` (0° = +z).  Called every tick of a rotation.
    fn set_facing(&mut self, _agent: AgentId, _heading_deg: f32) {}
}

/// A [`PresentationSink`] that discards everything.
pub struct NoopPresentation;

impl PresentationSink for NoopPresentation {
    fn set_warning_visible(&mut self, _agent: AgentId, _visible: bool) {}
    fn set_moving_animation(&mut self, _agent: AgentId, _moving: bool) {}
}
