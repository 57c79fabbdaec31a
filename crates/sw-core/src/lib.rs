//! `sw-core`: foundational types for the `shopwatch` game core.
//!
//! This crate is a dependency of every other `sw-*` crate.  It has no `sw-*`
//! dependencies and only a handful of external ones (`rand`, `thiserror`,
//! `serde`, `toml`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `CheckpointId`, `LandmarkId`, `TemplateId` |
//! | [`geo`]         | `ShopPoint`, straight-line distance, headings         |
//! | [`time`]        | `Tick`, `SimClock`, `Countdown`                       |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)             |
//! | [`config`]      | `GameConfig` (TOML), `Timings` (tick-resolved)        |
//! | [`error`]       | `CoreError`, `CoreResult`                             |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{GameConfig, Timings};
pub use error::{CoreError, CoreResult};
pub use geo::ShopPoint;
pub use ids::{AgentId, CheckpointId, LandmarkId, TemplateId};
pub use rng::{AgentRng, SimRng};
pub use time::{Countdown, SimClock, Tick};
