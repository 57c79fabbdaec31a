//! Read-only state shared by every controller step in a tick.

use sw_core::{ShopPoint, Timings};
use sw_nav::{LandmarkIndex, ShopLayout};

/// A read-only view passed to every [`AgentController`][crate::AgentController]
/// step.  Built once per tick; nothing in it changes during the step phase.
#[derive(Copy, Clone)]
pub struct AgentContext<'a> {
    pub checkpoints: &'a [ShopPoint],
    pub landmarks:   &'a LandmarkIndex,
    pub timings:     &'a Timings,
}

impl<'a> AgentContext<'a> {
    #[inline]
    pub fn new(layout: &'a ShopLayout, timings: &'a Timings) -> Self {
        Self {
            checkpoints: &layout.checkpoints,
            landmarks:   &layout.landmarks,
            timings,
        }
    }
}
