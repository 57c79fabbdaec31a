//! `sw-session`: tick loop orchestrator for the shopwatch game core.
//!
//! # Two-phase tick loop
//!
//! ```text
//! every tick:
//!   ① Movement : NavigationOracle::advance integrates one quantum.
//!   ② Collect  : one NavStatus per live customer.
//!   ③ Step     : AgentController::step for every customer
//!                 (parallel with the `parallel` feature).
//!   ④ Apply    : for each report in ascending AgentId order:
//!                   SetDestination / ResetNavigation → oracle, then ack
//!                   Teleport                         → oracle
//!                   warnings, animation, facing      → presentation
//!                   reached exit                     → remove + escape check
//!   ⑤ Schedule : day timer (active waves only), then WaveScheduler::tick:
//!                   Spawn        → new controller + oracle body
//!                   WaveEnded    → everyone walks to the exit
//!                   ExitTimedOut → stragglers removed + escape check
//!                   DayClosed    → day judged, report emitted
//!   ⑥ Report   : decisions and day reports go to the observer.
//! ```
//!
//! Operator calls (`apprehend`, `release`, `force_end_day`) happen between
//! ticks and take effect immediately.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the step phase on Rayon's thread pool.            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sw_core::GameConfig;
//! use sw_nav::{ShopLayout, StraightLineOracle};
//! use sw_session::{NoopObserver, SessionBuilder};
//!
//! let mut session = SessionBuilder::new(GameConfig::default(), layout, StraightLineOracle::new(1.4))
//!     .build()?;
//! let report = session.run_day(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod day;
pub mod error;
pub mod observer;
pub mod session;


pub use builder::SessionBuilder;
pub use day::{DayController, DayReport, DayStatus, SessionState};
pub use error::{SessionError, SessionResult};
pub use observer::{DecisionRecord, NoopObserver, SessionObserver};
pub use session::GameSession;
