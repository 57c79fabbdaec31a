//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `decisions.csv`
//! - `days.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{DayRow, DecisionRow, OutputResult};

/// Writes session logs to two CSV files.
pub struct CsvWriter {
    decisions: Writer<File>,
    days:      Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the two CSV files in `dir` (creating `dir` if needed) and write
    /// the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut decisions = Writer::from_path(dir.join("decisions.csv"))?;
        decisions.write_record(["tick", "day", "wave", "agent", "outcome", "delta", "score"])?;

        let mut days = Writer::from_path(dir.join("days.csv"))?;
        days.write_record([
            "day",
            "passed",
            "forced",
            "score",
            "required_score",
            "thief_quota",
            "thieves_spawned",
            "thieves_caught",
            "thieves_escaped",
            "wrong_arrests",
            "elapsed_ticks",
        ])?;

        Ok(Self {
            decisions,
            days,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_decision(&mut self, row: &DecisionRow) -> OutputResult<()> {
        self.decisions.write_record(&[
            row.tick.to_string(),
            row.day.to_string(),
            row.wave.to_string(),
            row.agent.to_string(),
            row.outcome.to_string(),
            row.delta.to_string(),
            row.score.to_string(),
        ])?;
        Ok(())
    }

    fn write_day(&mut self, row: &DayRow) -> OutputResult<()> {
        self.days.write_record(&[
            row.day.to_string(),
            (row.passed as u8).to_string(),
            (row.forced as u8).to_string(),
            row.score.to_string(),
            row.required_score.to_string(),
            row.thief_quota.to_string(),
            row.thieves_spawned.to_string(),
            row.thieves_caught.to_string(),
            row.thieves_escaped.to_string(),
            row.wrong_arrests.to_string(),
            row.elapsed_ticks.to_string(),
        ])?;
        // Days are rare; keep the file current for anyone tailing it.
        self.days.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.decisions.flush()?;
        self.days.flush()?;
        Ok(())
    }
}
