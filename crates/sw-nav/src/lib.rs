//! `sw-nav`: the narrow interfaces between the game core and the engine.
//!
//! # Crate layout
//!
//! | Module             | Contents                                                  |
//! |--------------------|-----------------------------------------------------------|
//! | [`oracle`]         | `NavigationOracle` trait, `NavStatus`                     |
//! | [`presentation`]   | `PresentationSink` trait, `NoopPresentation`              |
//! | [`layout`]         | `ShopLayout`, `LayoutDeficiency`                          |
//! | [`landmarks`]      | `LandmarkIndex` (R-tree nearest-landmark lookup)          |
//! | [`straight_line`]  | `StraightLineOracle`: obstacle-free reference oracle     |
//!
//! # Pluggability
//!
//! The session drives movement only through [`NavigationOracle`], so a game
//! engine's navmesh agent, a test double, or [`StraightLineOracle`] can be
//! swapped in without touching the core.  No path planning happens here.

pub mod landmarks;
pub mod layout;
pub mod oracle;
pub mod presentation;
pub mod straight_line;


pub use landmarks::{LandmarkIndex, MAX_LANDMARKS};
pub use layout::{LayoutDeficiency, MAX_CHECKPOINTS, ShopLayout};
pub use oracle::{NavStatus, NavigationOracle};
pub use presentation::{NoopPresentation, PresentationSink};
pub use straight_line::StraightLineOracle;
