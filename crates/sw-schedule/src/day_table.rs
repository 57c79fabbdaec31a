//! Per-day requirements.

use serde::{Deserialize, Serialize};

use crate::{ScheduleError, ScheduleResult};

/// What a day asks of the operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRequirement {
    /// 1-based day index.
    pub day:            u32,
    /// Thieves distributed across the day's waves.  Reported, never checked.
    pub thief_quota:    u32,
    /// Cumulative score needed at day end to pass.
    pub required_score: i64,
}

/// Static day → requirement lookup.
///
/// Days missing from the table use the first row's values (day 1 in the
/// built-in table).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DayTable {
    rows: Vec<DayRequirement>,
}

impl DayTable {
    /// Build from rows in any order.
    ///
    /// # Errors
    ///
    /// Empty tables, day 0 and repeated days are rejected.
    pub fn new(mut rows: Vec<DayRequirement>) -> ScheduleResult<Self> {
        if rows.is_empty() {
            return Err(ScheduleError::EmptyDayTable);
        }
        rows.sort_by_key(|r| r.day);
        if rows[0].day == 0 {
            return Err(ScheduleError::InvalidDay(0));
        }
        if let Some(pair) = rows.windows(2).find(|w| w[0].day == w[1].day) {
            return Err(ScheduleError::DuplicateDay(pair[0].day));
        }
        Ok(Self { rows })
    }

    /// Requirement for `day`, falling back to the first row.
    pub fn requirement(&self, day: u32) -> DayRequirement {
        match self.rows.binary_search_by_key(&day, |r| r.day) {
            Ok(i) => self.rows[i],
            Err(_) => DayRequirement { day, ..self.rows[0] },
        }
    }

    /// `true` if `day` has its own row.
    pub fn contains(&self, day: u32) -> bool {
        self.rows.binary_search_by_key(&day, |r| r.day).is_ok()
    }

    pub fn rows(&self) -> &[DayRequirement] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Default for DayTable {
    /// The built-in five-day campaign.
    fn default() -> Self {
        const ROWS: [(u32, u32, i64); 5] = [
            (1, 2, 100),
            (2, 3, 250),
            (3, 4, 450),
            (4, 5, 700),
            (5, 6, 1000),
        ];
        Self {
            rows: ROWS
                .iter()
                .map(|&(day, thief_quota, required_score)| DayRequirement {
                    day,
                    thief_quota,
                    required_score,
                })
                .collect(),
        }
    }
}
