//! Nearest-landmark lookup.
//!
//! An R-tree (via `rstar`) maps a floor position to the closest landmark by
//! straight-line distance.  Built once per layout; queried every time an
//! agent reaches a checkpoint.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use sw_core::{LandmarkId, ShopPoint};
use tracing::warn;

/// Landmarks beyond this many have no `LandmarkId` and are dropped.
pub const MAX_LANDMARKS: usize = LandmarkId::INVALID.0 as usize;

/// R-tree entry: a landmark's floor position and its id.
#[derive(Clone, Debug)]
struct LandmarkEntry {
    point: [f32; 2],
    id:    LandmarkId,
}

impl RTreeObject for LandmarkEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for LandmarkEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dz = self.point[1] - point[1];
        dx * dx + dz * dz
    }
}

/// Spatial index over the shop's landmarks.
#[derive(Clone)]
pub struct LandmarkIndex {
    points: Vec<ShopPoint>,
    tree:   RTree<LandmarkEntry>,
}

impl LandmarkIndex {
    /// Index `points`; `LandmarkId(i)` refers to `points[i]`.
    pub fn new(mut points: Vec<ShopPoint>) -> Self {
        if points.len() > MAX_LANDMARKS {
            warn!(given = points.len(), kept = MAX_LANDMARKS, "too many landmarks; extras dropped");
            points.truncate(MAX_LANDMARKS);
        }
        let entries = points
            .iter()
            .zip((0..=u16::MAX).map(LandmarkId))
            .map(|(p, id)| LandmarkEntry { point: [p.x, p.z], id })
            .collect();
        Self { points, tree: RTree::bulk_load(entries) }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// The landmark closest to `from`, or `None` if there are no landmarks.
    pub fn nearest(&self, from: ShopPoint) -> Option<(LandmarkId, ShopPoint)> {
        self.tree
            .nearest_neighbor(&[from.x, from.z])
            .map(|e| (e.id, self.points[e.id.index()]))
    }

    pub fn get(&self, id: LandmarkId) -> Option<ShopPoint> {
        self.points.get(id.index()).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl std::fmt::Debug for LandmarkIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LandmarkIndex").field("points", &self.points).finish()
    }
}
