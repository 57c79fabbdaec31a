//! Shop-floor coordinates.
//!
//! The shop is modelled as a flat plane.  `ShopPoint` stores the two ground
//! axes (`x`, `z`) in metres; height never matters to the core logic.

use serde::{Deserialize, Serialize};

/// A point on the shop floor.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct ShopPoint {
    pub x: f32,
    pub z: f32,
}

impl ShopPoint {
    pub const ORIGIN: ShopPoint = ShopPoint { x: 0.0, z: 0.0 };

    #[inline]
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Straight-line distance in metres.
    #[inline]
    pub fn distance(self, other: ShopPoint) -> f32 {
        self.distance_sq(other).sqrt()
    }

    #[inline]
    pub fn distance_sq(self, other: ShopPoint) -> f32 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        dx * dx + dz * dz
    }

    /// Heading from `self` toward `target` in degrees, `[0, 360)`.
    ///
    /// 0° faces +z, 90° faces +x.  Returns `None` when the two points
    /// coincide and no heading is defined.
    pub fn heading_to(self, target: ShopPoint) -> Option<f32> {
        let dx = target.x - self.x;
        let dz = target.z - self.z;
        if dx.abs() < f32::EPSILON && dz.abs() < f32::EPSILON {
            return None;
        }
        Some(dx.atan2(dz).to_degrees().rem_euclid(360.0))
    }

    /// Move from `self` toward `target` by at most `step` metres.
    pub fn step_toward(self, target: ShopPoint, step: f32) -> ShopPoint {
        let d = self.distance(target);
        if d <= step || d <= f32::EPSILON {
            return target;
        }
        let t = step / d;
        ShopPoint {
            x: self.x + (target.x - self.x) * t,
            z: self.z + (target.z - self.z) * t,
        }
    }
}

/// Smallest absolute angle between two headings, in `[0, 180]` degrees.
#[inline]
pub fn angular_distance_deg(from: f32, to: f32) -> f32 {
    let d = (to - from).rem_euclid(360.0);
    if d > 180.0 { 360.0 - d } else { d }
}

impl std::fmt::Display for ShopPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.z)
    }
}
