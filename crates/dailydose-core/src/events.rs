use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::day::DayId;
use crate::decision::Decision;

/// Every state change in the tracker produces an Event.
/// The presentation layer drains them after each trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Today's day became actionable.
    DayUnlocked {
        id: DayId,
        date: NaiveDate,
        at: DateTime<Utc>,
    },
    /// Elapsed days were charged during reconciliation.
    DaysAutoMissed {
        ids: Vec<DayId>,
        penalty: i64,
        at: DateTime<Utc>,
    },
    DecisionRecorded {
        id: DayId,
        decision: Decision,
        delta: i64,
        balance: i64,
        streak: u32,
        at: DateTime<Utc>,
    },
    StateSaved {
        at: DateTime<Utc>,
    },
    /// The write did not land; in-memory state is still authoritative.
    SaveFailed {
        reason: String,
        at: DateTime<Utc>,
    },
}
