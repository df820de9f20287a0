//! Calendar generator for the configured day range.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::day::Day;
use crate::error::ConfigError;

/// Inclusive, contiguous range of tracked dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DayRange {
    /// # Errors
    /// Returns `ConfigError::InvalidValue` when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::InvalidValue {
                key: "tracker.start_date".to_string(),
                message: format!("start date {start} is after end date {end}"),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn len(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    // A valid range always holds at least one date.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Every date in `range` as a `Locked` day, ids assigned by position.
pub fn generate_days(range: &DayRange) -> Vec<Day> {
    range
        .dates()
        .enumerate()
        .map(|(index, date)| Day::locked(index, date))
        .collect()
}

/// Days of one calendar month, in range order.
#[derive(Debug, Clone, Serialize)]
pub struct MonthGroup<'a> {
    pub year: i32,
    pub month: u32,
    pub days: Vec<&'a Day>,
}

/// Group days by (year, month) preserving order, for the calendar view.
pub fn group_by_month(days: &[Day]) -> Vec<MonthGroup<'_>> {
    let mut groups: Vec<MonthGroup<'_>> = Vec::new();
    for day in days {
        let (year, month) = (day.date.year(), day.date.month());
        match groups.last_mut() {
            Some(group) if group.year == year && group.month == month => group.days.push(day),
            _ => groups.push(MonthGroup {
                year,
                month,
                days: vec![day],
            }),
        }
    }
    groups
}
