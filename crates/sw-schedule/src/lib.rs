//! `sw-schedule`: thief allocation, wave pacing, and day requirements.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                        |
//! |-----------------|-----------------------------------------------------------------|
//! | [`allocation`]  | `allocate_thieves`, `Allocation`: capped random quota split    |
//! | [`wave`]        | `Wave`: shuffled spawn flags, template preference, spawned ids |
//! | [`scheduler`]   | `WaveScheduler`, `WavePlan`, `WaveState`, `SchedulerEvent`      |
//! | [`day_table`]   | `DayRequirement`, `DayTable` (built-in five-day table)          |
//! | [`loader`]      | `load_day_table_csv`, `load_day_table_reader`                   |
//! | [`error`]       | `ScheduleError`, `ScheduleResult<T>`                            |
//!
//! # Day model (summary)
//!
//! ```text
//! quota Q ──allocate──▶ [q1, q2, q3, q4]   (each ≤ cap, Σ = min(Q, cap·4))
//! wave i: flags = shuffle(qi × true ++ (customers − qi) × false)
//!         spawn flags[0] at wave start, then one every spawn interval
//! ```
//!
//! The scheduler emits [`SchedulerEvent`]s; creating agents, walking them out
//! and scoring escapes is the session's job.

pub mod allocation;
pub mod day_table;
pub mod error;
pub mod loader;
pub mod scheduler;
pub mod wave;

#[cfg(test)]
mod tests;

pub use allocation::{Allocation, allocate_thieves};
pub use day_table::{DayRequirement, DayTable};
pub use error::{ScheduleError, ScheduleResult};
pub use loader::{load_day_table_csv, load_day_table_reader};
pub use scheduler::{SchedulerEvent, SpawnOrder, WavePlan, WaveScheduler, WaveState};
pub use wave::Wave;
