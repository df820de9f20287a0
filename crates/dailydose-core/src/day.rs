//! Day records and their status state machine.
//!
//! ## State Transitions
//!
//! ```text
//! Locked -> Pending -> (Taken | Missed)
//! Locked | Pending -> Missed            (auto-miss during reconciliation)
//! ```
//!
//! `Taken` and `Missed` are terminal.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable identifier of a day, derived from its ordinal position in the range.
///
/// Persisted as `"day-<n>"`; it is the join key between a freshly generated
/// range and the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayId(pub usize);

impl DayId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for DayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day-{}", self.0)
    }
}

impl FromStr for DayId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("day-").unwrap_or(s);
        digits
            .parse::<usize>()
            .map(DayId)
            .map_err(|_| format!("invalid day id: {s}"))
    }
}

impl Serialize for DayId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayStatus {
    /// Future date, not yet actionable.
    Locked,
    /// Today, waiting for a decision.
    Pending,
    Taken,
    Missed,
}

impl DayStatus {
    /// `Taken` and `Missed` never change again.
    pub fn is_resolved(self) -> bool {
        matches!(self, DayStatus::Taken | DayStatus::Missed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayStatus::Locked => "LOCKED",
            DayStatus::Pending => "PENDING",
            DayStatus::Taken => "TAKEN",
            DayStatus::Missed => "MISSED",
        }
    }

    /// Whether moving from `self` to `next` respects the monotonic ordering.
    pub fn can_transition_to(self, next: DayStatus) -> bool {
        use DayStatus::*;
        matches!(
            (self, next),
            (Locked, Pending) | (Locked, Missed) | (Pending, Taken) | (Pending, Missed)
        )
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One calendar date in the tracked range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub id: DayId,
    pub date: NaiveDate,
    pub day_of_month: u32,
    pub status: DayStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Day {
    /// A fresh `Locked` day at ordinal position `index`.
    pub fn locked(index: usize, date: NaiveDate) -> Self {
        Self {
            id: DayId(index),
            date,
            day_of_month: date.day(),
            status: DayStatus::Locked,
            note: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == DayStatus::Pending
    }

    /// Resolve the day with a note. Returns `false` and leaves the day
    /// untouched when the transition is not allowed.
    pub fn resolve(&mut self, status: DayStatus, note: impl Into<String>) -> bool {
        if !status.is_resolved() || !self.status.can_transition_to(status) {
            return false;
        }
        self.status = status;
        self.note = Some(note.into());
        true
    }

    /// Unlock a `Locked` day. Any other status is left alone.
    pub fn unlock(&mut self) -> bool {
        if self.status != DayStatus::Locked {
            return false;
        }
        self.status = DayStatus::Pending;
        true
    }
}
