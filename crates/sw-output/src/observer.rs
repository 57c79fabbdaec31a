//! `SessionOutputObserver<W>`: bridges `SessionObserver` to an `OutputWriter`.

use sw_core::Tick;
use sw_session::{DayReport, DecisionRecord, SessionObserver};

use crate::row::{DayRow, DecisionRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SessionObserver`] that logs every scored event and every finished day
/// to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SessionObserver`
/// methods have no return value.  After a run, check for errors with
/// [`take_error`][Self::take_error].
pub struct SessionOutputObserver<W: OutputWriter> {
    writer:     W,
    decisions:  u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SessionOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            decisions:  0,
            last_error: None,
        }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Number of decision rows handed to the writer.
    pub fn decisions_written(&self) -> u64 {
        self.decisions
    }

    /// Flush the writer.  Needed only when a run stops before the session
    /// completes; completion flushes on its own.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.finish()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SessionObserver for SessionOutputObserver<W> {
    fn on_decision(&mut self, record: &DecisionRecord) {
        let result = self.writer.write_decision(&DecisionRow::from(record));
        if result.is_ok() {
            self.decisions += 1;
        }
        self.store_err(result);
    }

    fn on_day_ended(&mut self, report: &DayReport) {
        let result = self.writer.write_day(&DayRow::from(report));
        self.store_err(result);
    }

    fn on_session_end(&mut self, _final_tick: Tick, _score: i64) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
