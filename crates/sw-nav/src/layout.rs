//! The shop floor as the core sees it: where customers enter and leave,
//! where they browse, what they look at, and what they can look like.

use sw_core::{CheckpointId, ShopPoint};
use tracing::warn;

use crate::LandmarkIndex;

/// Checkpoints beyond this many have no `CheckpointId` and are dropped.
pub const MAX_CHECKPOINTS: usize = CheckpointId::INVALID.0 as usize;

/// A missing piece of shop configuration.  Never fatal: the affected spawn
/// or behavior is skipped and the day carries on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LayoutDeficiency {
    /// No checkpoints: agents have nowhere to browse; spawns are skipped.
    NoCheckpoints,
    /// No landmarks: agents skip orientation and dwell immediately.
    NoLandmarks,
    /// No entity templates: spawns are skipped.
    NoTemplates,
}

impl std::fmt::Display for LayoutDeficiency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LayoutDeficiency::NoCheckpoints => "shop layout has no checkpoints",
            LayoutDeficiency::NoLandmarks   => "shop layout has no landmarks",
            LayoutDeficiency::NoTemplates   => "shop layout has no entity templates",
        })
    }
}

/// Static shop geometry shared by every agent.
#[derive(Clone, Debug)]
pub struct ShopLayout {
    /// Spawn position for new customers.
    pub entrance:    ShopPoint,
    /// Where customers walk when their wave ends.
    pub exit:        ShopPoint,
    /// Browsing destinations; `CheckpointId(i)` is `checkpoints[i]`.
    pub checkpoints: Vec<ShopPoint>,
    pub landmarks:   LandmarkIndex,
    /// Number of customer entity templates available for spawning.
    pub template_count: u16,
}

impl ShopLayout {
    pub fn new(
        entrance:       ShopPoint,
        exit:           ShopPoint,
        checkpoints:    Vec<ShopPoint>,
        landmarks:      Vec<ShopPoint>,
        template_count: u16,
    ) -> Self {
        let mut checkpoints = checkpoints;
        if checkpoints.len() > MAX_CHECKPOINTS {
            warn!(given = checkpoints.len(), kept = MAX_CHECKPOINTS, "too many checkpoints; extras dropped");
            checkpoints.truncate(MAX_CHECKPOINTS);
        }
        Self {
            entrance,
            exit,
            checkpoints,
            landmarks: LandmarkIndex::new(landmarks),
            template_count,
        }
    }

    /// Every deficiency present, in a stable order.
    pub fn deficiencies(&self) -> Vec<LayoutDeficiency> {
        let mut out = Vec::new();
        if self.checkpoints.is_empty() {
            out.push(LayoutDeficiency::NoCheckpoints);
        }
        if self.landmarks.is_empty() {
            out.push(LayoutDeficiency::NoLandmarks);
        }
        if self.template_count == 0 {
            out.push(LayoutDeficiency::NoTemplates);
        }
        out
    }

    /// `true` if agents can be spawned at all.
    pub fn can_spawn(&self) -> bool {
        !self.checkpoints.is_empty() && self.template_count > 0
    }
}
