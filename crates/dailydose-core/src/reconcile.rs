//! Startup reconciliation of persisted days against the wall-clock date.
//!
//! ## Purpose
//! Every time the tracker opens, the freshly generated range is merged with
//! whatever a previous session stored. The merge then catches up with the
//! calendar: today's day is unlocked, and every past day that never got a
//! decision is marked missed and charged once.
//!
//! ## Usage
//! ```rust,ignore
//! use dailydose_core::reconcile::{ReconciliationConfig, ReconciliationEngine};
//!
//! let engine = ReconciliationEngine::with_config(ReconciliationConfig::new(range));
//! let (days, ledger, summary) = engine.reconcile(fresh, stored.as_deref(), ledger, today);
//!
//! if let Some(notice) = summary.notice {
//!     println!("{} day(s) missed, -{}", notice.count, notice.penalty);
//! }
//! ```
//!
//! Running it again with the same `today` changes nothing: auto-missed days
//! are already `Missed` and are skipped.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calendar::DayRange;
use crate::day::{Day, DayId, DayStatus};
use crate::ledger::Ledger;

/// Note attached to days the system marked missed.
pub const AUTO_MISS_NOTE: &str = "Automatic penalty for a missed day";

/// Default charge per auto-missed day.
pub const DEFAULT_AUTO_MISS_PENALTY: i64 = 1000;

/// Configuration for reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationConfig {
    /// Tracked window; days before its start are never auto-missed.
    pub range: DayRange,
    /// Charged once per auto-missed day.
    pub auto_miss_penalty: i64,
    /// Note attached to auto-missed days.
    pub auto_miss_note: String,
}

impl ReconciliationConfig {
    pub fn new(range: DayRange) -> Self {
        Self {
            range,
            auto_miss_penalty: DEFAULT_AUTO_MISS_PENALTY,
            auto_miss_note: AUTO_MISS_NOTE.to_string(),
        }
    }

    pub fn with_auto_miss_penalty(mut self, penalty: i64) -> Self {
        self.auto_miss_penalty = penalty.max(0);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.auto_miss_note = note.into();
        self
    }
}

/// One-time notification about days charged while the user was away.
///
/// Shown once and dismissed; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoMissNotice {
    pub count: usize,
    pub penalty: i64,
}

/// Summary of a reconciliation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationSummary {
    /// Date the pass ran against.
    pub reconciled_on: NaiveDate,
    /// Day moved from `Locked` to `Pending` because it is today.
    pub unlocked: Option<DayId>,
    /// Days moved to `Missed` by this pass.
    pub auto_missed: Vec<DayId>,
    /// Stored days whose id is no longer part of the range.
    pub dropped: usize,
    pub notice: Option<AutoMissNotice>,
}

impl ReconciliationSummary {
    pub fn has_changes(&self) -> bool {
        self.unlocked.is_some() || !self.auto_missed.is_empty()
    }

    /// Auto-misses moved money, so they must reach storage right away.
    pub fn needs_persist(&self) -> bool {
        !self.auto_missed.is_empty()
    }

    /// Get a human-readable summary message.
    pub fn message(&self) -> String {
        match (&self.notice, self.unlocked) {
            (Some(notice), _) => format!(
                "Auto-missed {} day(s), charged {}.",
                notice.count, notice.penalty
            ),
            (None, Some(id)) => format!("Unlocked {id} for {}.", self.reconciled_on),
            (None, None) => "Nothing to reconcile.".to_string(),
        }
    }
}

/// Merges stored day state into the generated range and applies the
/// time-based transitions.
#[derive(Debug, Clone)]
pub struct ReconciliationEngine {
    config: ReconciliationConfig,
}

impl ReconciliationEngine {
    pub fn new(range: DayRange) -> Self {
        Self::with_config(ReconciliationConfig::new(range))
    }

    pub fn with_config(config: ReconciliationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconciliationConfig {
        &self.config
    }

    /// Whether `day` should be charged as missed on `today`.
    pub fn is_overdue(&self, day: &Day, today: NaiveDate) -> bool {
        day.date < today && day.date >= self.config.range.start() && !day.status.is_resolved()
    }

    /// Run reconciliation.
    ///
    /// This is a pure function that returns:
    /// - The merged days with today unlocked and overdue days missed
    /// - The ledger after auto-miss penalties
    /// - A summary of what was done
    ///
    /// The caller is responsible for persisting the result.
    pub fn reconcile(
        &self,
        fresh: Vec<Day>,
        persisted: Option<&[Day]>,
        mut ledger: Ledger,
        today: NaiveDate,
    ) -> (Vec<Day>, Ledger, ReconciliationSummary) {
        let stored: HashMap<DayId, &Day> = persisted
            .unwrap_or_default()
            .iter()
            .map(|d| (d.id, d))
            .collect();
        let dropped = stored
            .keys()
            .filter(|id| id.index() >= fresh.len())
            .count();

        let mut unlocked = None;
        let mut auto_missed = Vec::new();
        let mut days = Vec::with_capacity(fresh.len());

        for mut day in fresh {
            if let Some(prior) = stored.get(&day.id) {
                if prior.date != day.date {
                    warn!(
                        id = %day.id,
                        stored = %prior.date,
                        generated = %day.date,
                        "stored day points at a different date, keeping its status"
                    );
                }
                day.status = prior.status;
                day.note = prior.note.clone();
            }

            if day.date == today && day.unlock() {
                unlocked = Some(day.id);
            }

            if self.is_overdue(&day, today) {
                day.status = DayStatus::Missed;
                day.note = Some(self.config.auto_miss_note.clone());
                auto_missed.push(day.id);
            }

            days.push(day);
        }

        let notice = if auto_missed.is_empty() {
            None
        } else {
            let penalty = ledger.penalize(auto_missed.len(), self.config.auto_miss_penalty);
            info!(
                count = auto_missed.len(),
                penalty,
                balance = ledger.balance,
                "auto-missed elapsed days"
            );
            Some(AutoMissNotice {
                count: auto_missed.len(),
                penalty,
            })
        };

        if let Some(id) = unlocked {
            info!(%id, %today, "unlocked today");
        }

        let summary = ReconciliationSummary {
            reconciled_on: today,
            unlocked,
            auto_missed,
            dropped,
            notice,
        };

        (days, ledger, summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::generate_days;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn december() -> DayRange {
        DayRange::new(date(2025, 12, 2), date(2025, 12, 31)).unwrap()
    }

    #[test]
    fn config_builder_clamps_negative_penalty() {
        let config = ReconciliationConfig::new(december()).with_auto_miss_penalty(-5);
        assert_eq!(config.auto_miss_penalty, 0);
        assert_eq!(config.auto_miss_note, AUTO_MISS_NOTE);
    }

    #[test]
    fn first_run_unlocks_only_today() {
        let engine = ReconciliationEngine::new(december());
        let (days, ledger, summary) = engine.reconcile(
            generate_days(&december()),
            None,
            Ledger::default(),
            date(2025, 12, 2),
        );

        assert_eq!(days[0].status, DayStatus::Pending);
        assert!(days[1..].iter().all(|d| d.status == DayStatus::Locked));
        assert_eq!(ledger, Ledger::default());
        assert_eq!(summary.unlocked, Some(DayId(0)));
        assert!(summary.notice.is_none());
        assert!(!summary.needs_persist());
        assert!(summary.has_changes());
    }

    #[test]
    fn stored_status_and_note_survive_merge() {
        let range = december();
        let mut stored = generate_days(&range);
        stored[0].status = DayStatus::Taken;
        stored[0].note = Some("nice".to_string());
        stored[1].status = DayStatus::Pending;

        let engine = ReconciliationEngine::new(range);
        let (days, ledger, summary) = engine.reconcile(
            generate_days(&range),
            Some(&stored),
            Ledger::new(500, 1),
            date(2025, 12, 3),
        );

        assert_eq!(days[0].status, DayStatus::Taken);
        assert_eq!(days[0].note.as_deref(), Some("nice"));
        assert_eq!(days[1].status, DayStatus::Pending);
        assert!(summary.unlocked.is_none());
        assert!(!summary.has_changes());
        assert_eq!(ledger, Ledger::new(500, 1));
    }

    #[test]
    fn resolved_today_is_not_unlocked_again() {
        let range = december();
        let mut stored = generate_days(&range);
        stored[0].status = DayStatus::Missed;

        let engine = ReconciliationEngine::new(range);
        let (days, _, summary) = engine.reconcile(
            generate_days(&range),
            Some(&stored),
            Ledger::default(),
            date(2025, 12, 2),
        );
        assert_eq!(days[0].status, DayStatus::Missed);
        assert!(summary.unlocked.is_none());
    }

    #[test]
    fn overdue_days_are_missed_and_charged_once() {
        let range = december();
        let engine = ReconciliationEngine::new(range);
        let today = date(2025, 12, 6);

        let (days, ledger, summary) =
            engine.reconcile(generate_days(&range), None, Ledger::new(2000, 3), today);

        assert_eq!(summary.auto_missed, vec![DayId(0), DayId(1), DayId(2), DayId(3)]);
        assert_eq!(
            summary.notice,
            Some(AutoMissNotice {
                count: 4,
                penalty: 4000
            })
        );
        assert_eq!(ledger, Ledger::new(-2000, 0));
        assert!(days[..4]
            .iter()
            .all(|d| d.status == DayStatus::Missed && d.note.as_deref() == Some(AUTO_MISS_NOTE)));
        assert_eq!(days[4].status, DayStatus::Pending);

        let (again, ledger_again, second) =
            engine.reconcile(generate_days(&range), Some(&days), ledger, today);
        assert_eq!(again, days);
        assert_eq!(ledger_again, ledger);
        assert!(second.notice.is_none());
        assert!(!second.has_changes());
    }

    #[test]
    fn custom_penalty_and_note_are_used() {
        let range = december();
        let engine = ReconciliationEngine::with_config(
            ReconciliationConfig::new(range)
                .with_auto_miss_penalty(250)
                .with_note("auto"),
        );
        let (days, ledger, _) =
            engine.reconcile(generate_days(&range), None, Ledger::default(), date(2025, 12, 4));
        assert_eq!(ledger.balance, -500);
        assert_eq!(days[0].note.as_deref(), Some("auto"));
    }

    #[test]
    fn today_before_range_touches_nothing() {
        let range = december();
        let engine = ReconciliationEngine::new(range);
        let (days, ledger, summary) =
            engine.reconcile(generate_days(&range), None, Ledger::default(), date(2025, 11, 20));
        assert!(days.iter().all(|d| d.status == DayStatus::Locked));
        assert_eq!(ledger, Ledger::default());
        assert!(!summary.has_changes());
    }

    #[test]
    fn today_after_range_misses_everything_unresolved() {
        let range = DayRange::new(date(2025, 12, 2), date(2025, 12, 4)).unwrap();
        let mut stored = generate_days(&range);
        stored[1].status = DayStatus::Taken;
        let engine = ReconciliationEngine::new(range);
        let (_, ledger, summary) =
            engine.reconcile(generate_days(&range), Some(&stored), Ledger::default(), date(2026, 1, 1));
        assert_eq!(summary.auto_missed, vec![DayId(0), DayId(2)]);
        assert_eq!(ledger.balance, -2000);
        assert!(summary.unlocked.is_none());
    }

    #[test]
    fn stored_days_outside_range_are_dropped() {
        let long = DayRange::new(date(2025, 12, 2), date(2025, 12, 10)).unwrap();
        let short = DayRange::new(date(2025, 12, 2), date(2025, 12, 5)).unwrap();
        let stored = generate_days(&long);

        let engine = ReconciliationEngine::new(short);
        let (days, _, summary) = engine.reconcile(
            generate_days(&short),
            Some(&stored),
            Ledger::default(),
            date(2025, 12, 2),
        );
        assert_eq!(days.len(), 4);
        assert_eq!(summary.dropped, 5);
    }

    #[test]
    fn summary_message_reports_penalty() {
        let engine = ReconciliationEngine::new(december());
        let (_, _, summary) = engine.reconcile(
            generate_days(&december()),
            None,
            Ledger::default(),
            date(2025, 12, 4),
        );
        assert_eq!(summary.message(), "Auto-missed 2 day(s), charged 2000.");
    }
}
