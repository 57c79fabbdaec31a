//! The `OutputWriter` trait implemented by backend writers.

use crate::{DayRow, DecisionRow, OutputResult};

/// A sink for session logs.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with
/// [`SessionOutputObserver::take_error`][crate::SessionOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one scored event.
    fn write_decision(&mut self, row: &DecisionRow) -> OutputResult<()>;

    /// Write one finished day.
    fn write_day(&mut self, row: &DayRow) -> OutputResult<()>;

    /// Flush all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
