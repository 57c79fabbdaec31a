//! CSV day-table loader.
//!
//! # CSV format
//!
//! One row per day.  Row order does not matter.
//!
//! ```csv
//! day,thief_quota,required_score
//! 1,2,100
//! 2,3,250
//! 3,4,450
//! ```
//!
//! Days not listed fall back to the lowest listed day's values.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::{DayRequirement, DayTable, ScheduleError, ScheduleResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct DayRecord {
    day:            u32,
    thief_quota:    u32,
    required_score: i64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`DayTable`] from a CSV file.
pub fn load_day_table_csv(path: &Path) -> ScheduleResult<DayTable> {
    let file = std::fs::File::open(path)?;
    load_day_table_reader(file)
}

/// Like [`load_day_table_csv`] but accepts any `Read` source.
pub fn load_day_table_reader<R: Read>(reader: R) -> ScheduleResult<DayTable> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let rows = csv_reader
        .deserialize::<DayRecord>()
        .map(|result| {
            let r = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;
            Ok(DayRequirement {
                day:            r.day,
                thief_quota:    r.thief_quota,
                required_score: r.required_score,
            })
        })
        .collect::<ScheduleResult<Vec<_>>>()?;

    DayTable::new(rows)
}
