//! A reference [`NavigationOracle`] that walks agents in straight lines.
//!
//! There are no obstacles and no path planning: each enabled agent moves
//! toward its destination at a constant speed when [`advance`] is called.
//! It exists so the core can run headless (tests, the demo) and it exposes a
//! few knobs to provoke the failure modes the controller must survive:
//!
//! - [`StraightLineOracle::set_frozen`]: the agent never moves (stuck).
//! - [`StraightLineOracle::set_bounds`]: destinations outside the
//!   rectangle are refused, as an off-navmesh point would be.
//!
//! [`advance`]: NavigationOracle::advance

use std::collections::HashMap;

use sw_core::{AgentId, ShopPoint};

use crate::{NavStatus, NavigationOracle};

#[derive(Clone, Debug)]
struct Body {
    position:    ShopPoint,
    destination: Option<ShopPoint>,
    enabled:     bool,
    frozen:      bool,
}

/// Obstacle-free constant-speed navigation.
#[derive(Clone, Debug)]
pub struct StraightLineOracle {
    /// Walking speed in m/s.
    pub speed: f32,
    bodies:    HashMap<AgentId, Body>,
    bounds:    Option<(ShopPoint, ShopPoint)>,
    /// Count of `set_enabled(_, false)` calls, for inspecting recoveries.
    pub disable_count: u32,
    /// Count of teleports, for inspecting recoveries.
    pub teleport_count: u32,
}

impl StraightLineOracle {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            bodies: HashMap::new(),
            bounds: None,
            disable_count: 0,
            teleport_count: 0,
        }
    }

    /// Refuse destinations outside the axis-aligned rectangle `min..=max`.
    pub fn set_bounds(&mut self, min: ShopPoint, max: ShopPoint) {
        self.bounds = Some((min, max));
    }

    /// Pin `agent` in place regardless of its destination.
    pub fn set_frozen(&mut self, agent: AgentId, frozen: bool) {
        if let Some(body) = self.bodies.get_mut(&agent) {
            body.frozen = frozen;
        }
    }

    pub fn position(&self, agent: AgentId) -> Option<ShopPoint> {
        self.bodies.get(&agent).map(|b| b.position)
    }

    pub fn destination(&self, agent: AgentId) -> Option<ShopPoint> {
        self.bodies.get(&agent).and_then(|b| b.destination)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    fn in_bounds(&self, p: ShopPoint) -> bool {
        match self.bounds {
            None => true,
            Some((min, max)) => p.x >= min.x && p.x <= max.x && p.z >= min.z && p.z <= max.z,
        }
    }
}

impl NavigationOracle for StraightLineOracle {
    fn spawn(&mut self, agent: AgentId, at: ShopPoint) {
        self.bodies.insert(agent, Body {
            position:    at,
            destination: None,
            enabled:     true,
            frozen:      false,
        });
    }

    fn despawn(&mut self, agent: AgentId) {
        self.bodies.remove(&agent);
    }

    fn set_destination(&mut self, agent: AgentId, point: ShopPoint) -> bool {
        if !self.in_bounds(point) {
            return false;
        }
        match self.bodies.get_mut(&agent) {
            Some(body) if body.enabled => {
                body.destination = Some(point);
                true
            }
            _ => false,
        }
    }

    fn query(&self, agent: AgentId) -> Option<NavStatus> {
        let body = self.bodies.get(&agent)?;
        let Some(dest) = body.destination else {
            return Some(NavStatus::idle_at(body.position));
        };
        let remaining = body.position.distance(dest);
        let moving = body.enabled && !body.frozen && remaining > 0.0;
        Some(NavStatus {
            pending:            false,
            remaining_distance: remaining,
            velocity:           if moving { self.speed } else { 0.0 },
            position:           body.position,
        })
    }

    fn teleport(&mut self, agent: AgentId, point: ShopPoint) {
        self.teleport_count += 1;
        if let Some(body) = self.bodies.get_mut(&agent) {
            body.position = point;
            body.destination = None;
        }
    }

    fn set_enabled(&mut self, agent: AgentId, enabled: bool) {
        if !enabled {
            self.disable_count += 1;
        }
        if let Some(body) = self.bodies.get_mut(&agent) {
            body.enabled = enabled;
            if !enabled {
                body.destination = None;
            }
        }
    }

    fn advance(&mut self, dt_secs: f32) {
        let step = self.speed * dt_secs;
        for body in self.bodies.values_mut() {
            if !body.enabled || body.frozen {
                continue;
            }
            if let Some(dest) = body.destination {
                body.position = body.position.step_toward(dest, step);
            }
        }
    }
}
