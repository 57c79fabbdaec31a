//! `sw-output`: session log writers for the shopwatch game core.
//!
//! | Backend | Files created                   |
//! |---------|---------------------------------|
//! | CSV     | `decisions.csv`, `days.csv`     |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SessionOutputObserver`], which implements `sw_session::SessionObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sw_output::{CsvWriter, SessionOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SessionOutputObserver::new(writer);
//! session.run_day(&mut obs)?;
//! obs.finish()?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SessionOutputObserver;
pub use row::{DayRow, DecisionRow};
pub use writer::OutputWriter;
