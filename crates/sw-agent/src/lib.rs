//! `sw-agent`: customer controllers and the active-agent roster.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                        |
//! |----------------|-----------------------------------------------------------------|
//! | [`state`]      | `AgentState`: the observable movement state                    |
//! | [`warning`]    | `WarningTimer`: the independent warning-display region         |
//! | [`recovery`]   | `RecoveryLadder`, `RecoveryStep`: stuck handling               |
//! | [`command`]    | `AgentCommand`: side effects requested by a controller step    |
//! | [`context`]    | `AgentContext<'a>`: read-only layout + timings for one tick    |
//! | [`controller`] | `AgentController`, `AgentProfile`, `StepReport`                 |
//! | [`roster`]     | `AgentRoster`: ordered map of live controllers                 |
//! | [`error`]      | `AgentError`, `AgentResult<T>`                                  |
//!
//! # Two regions per agent
//!
//! Every controller runs two independent sub-machines inside one step:
//!
//! ```text
//!   movement:  Moving ──arrive──▶ AtCheckpoint ──rotated──▶ Dwelling ──dwelt──▶ Moving
//!                 │  (stuck ladder: retarget → reset nav → teleport)
//!                 └──wave end──▶ Exiting
//!   warnings:  interval ──▶ show (count+1) ──display──▶ hide ──▶ interval …  (until count == total)
//! ```
//!
//! Movement transitions never touch the warning timer.
//!
//! # Intent / apply split
//!
//! A step reads a pre-collected [`NavStatus`][sw_nav::NavStatus] and returns
//! [`AgentCommand`]s; it never calls the oracle itself.  The session applies
//! the commands sequentially in ascending `AgentId` order, so with the
//! `parallel` feature the step phase can run on Rayon without changing
//! results.

pub mod command;
pub mod context;
pub mod controller;
pub mod error;
pub mod recovery;
pub mod roster;
pub mod state;
pub mod warning;

#[cfg(test)]
mod tests;

pub use command::AgentCommand;
pub use context::AgentContext;
pub use controller::{AgentController, AgentProfile, StepReport};
pub use error::{AgentError, AgentResult};
pub use recovery::{RecoveryLadder, RecoveryStep};
pub use roster::AgentRoster;
pub use state::AgentState;
pub use warning::{WarningEvent, WarningTimer};
