//! Side effects a controller step asks the session to perform.

use sw_core::ShopPoint;

/// An action requested by [`AgentController::step`][crate::AgentController::step].
///
/// Commands are applied by the session in the order they were produced.
/// Navigation commands are answered through
/// [`AgentController::destination_ack`][crate::AgentController::destination_ack].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AgentCommand {
    /// `NavigationOracle::set_destination`.
    SetDestination(ShopPoint),
    /// Disable, re-enable, then `set_destination` with the same point.
    ResetNavigation(ShopPoint),
    /// `NavigationOracle::teleport`.
    Teleport(ShopPoint),
    /// `PresentationSink::set_moving_animation`.
    SetMovingAnimation(bool),
    /// `PresentationSink::set_facing`.
    Face(f32),
    /// `PresentationSink::set_warning_visible(true)`; `count` includes this one.
    ShowWarning { count: u8 },
    /// `PresentationSink::set_warning_visible(false)`.
    HideWarning,
}
