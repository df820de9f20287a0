//! Analytics view data.
//!
//! The running balance here is re-derived from day statuses alone, one
//! uniform reward per `Taken` day and one uniform penalty per `Missed` day.
//! It is an audit path next to the authoritative [`Ledger`], and it drifts
//! from it whenever a bonus day was completed or the auto-miss penalty
//! differs from the standard one. [`audit`] reports that drift as is.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::day::{Day, DayId, DayStatus};
use crate::ledger::Ledger;
use crate::storage::RewardsConfig;

/// Days per streak milestone on the calendar view.
pub const WEEK_LEN: u32 = 7;

/// One point of the chart series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancePoint {
    pub date: NaiveDate,
    /// Short axis label, e.g. `2 Dec`.
    pub label: String,
    pub balance: i64,
}

/// A resolved day in the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: DayId,
    pub date: NaiveDate,
    pub status: DayStatus,
    pub amount: i64,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_taken: usize,
    pub total_missed: usize,
    /// Running balance over resolved days, oldest first.
    pub history: Vec<BalancePoint>,
    /// Resolved days, newest first.
    pub activity: Vec<ActivityEntry>,
}

impl Analytics {
    pub fn from_days(days: &[Day], rewards: &RewardsConfig) -> Self {
        let mut running = 0i64;
        let mut history = Vec::new();
        let mut activity = Vec::new();

        for day in days.iter().filter(|d| d.status.is_resolved()) {
            let amount = match day.status {
                DayStatus::Taken => rewards.standard_reward,
                _ => -rewards.standard_penalty,
            };
            running = running.saturating_add(amount);
            history.push(BalancePoint {
                date: day.date,
                label: day.date.format("%-d %b").to_string(),
                balance: running,
            });
            activity.push(ActivityEntry {
                id: day.id,
                date: day.date,
                status: day.status,
                amount,
                note: day.note.clone(),
            });
        }
        activity.reverse();

        Self {
            total_taken: days.iter().filter(|d| d.status == DayStatus::Taken).count(),
            total_missed: days.iter().filter(|d| d.status == DayStatus::Missed).count(),
            history,
            activity,
        }
    }

    /// Final point of the derived series, zero when nothing is resolved.
    pub fn derived_balance(&self) -> i64 {
        self.history.last().map(|p| p.balance).unwrap_or(0)
    }
}

/// Derived balance compared against the recorded ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerAudit {
    pub derived: i64,
    pub recorded: i64,
    /// `recorded - derived`.
    pub discrepancy: i64,
}

impl LedgerAudit {
    pub fn is_consistent(&self) -> bool {
        self.discrepancy == 0
    }
}

pub fn audit(analytics: &Analytics, ledger: &Ledger) -> LedgerAudit {
    let derived = analytics.derived_balance();
    LedgerAudit {
        derived,
        recorded: ledger.balance,
        discrepancy: ledger.balance.saturating_sub(derived),
    }
}

/// Position inside the current week-long streak block.
pub fn weekly_progress(streak: u32) -> u32 {
    streak % WEEK_LEN
}

pub fn is_weekly_milestone(streak: u32) -> bool {
    streak > 0 && streak % WEEK_LEN == 0
}
