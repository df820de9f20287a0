//! Tracker facade owning the day list and ledger for one session.
//!
//! The two triggers of the system run through here: [`Tracker::open`]
//! (load, reconcile, persist) and [`Tracker::decide`] (apply, persist).
//! Both run to completion before the next one is handled.

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::analytics::{self, Analytics, LedgerAudit};
use crate::calendar::{generate_days, DayRange};
use crate::day::{Day, DayId};
use crate::decision::{Decision, DecisionOutcome, DecisionProcessor};
use crate::error::{CoreError, DecisionError, StorageError};
use crate::events::Event;
use crate::feedback::FeedbackProvider;
use crate::ledger::Ledger;
use crate::reconcile::{
    AutoMissNotice, ReconciliationConfig, ReconciliationEngine, ReconciliationSummary,
};
use crate::storage::{Config, KvStore, LedgerGateway};

/// Day list plus ledger, the whole mutable state of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerState {
    pub days: Vec<Day>,
    pub ledger: Ledger,
}

/// A decision together with whether it reached storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionReceipt {
    pub outcome: DecisionOutcome,
    /// `false` when the write failed; call [`Tracker::flush`] to retry.
    pub persisted: bool,
}

pub struct Tracker<S: KvStore> {
    config: Config,
    range: DayRange,
    gateway: LedgerGateway<S>,
    processor: DecisionProcessor,
    feedback: Box<dyn FeedbackProvider>,
    state: TrackerState,
    today: NaiveDate,
    summary: ReconciliationSummary,
    notice: Option<AutoMissNotice>,
    events: Vec<Event>,
    dirty: bool,
}

impl<S: KvStore> Tracker<S> {
    /// Load stored state, reconcile it against `today` and persist the result.
    ///
    /// A failed write here is not fatal: the reconciled state is kept in
    /// memory, marked dirty and reported through a `SaveFailed` event.
    ///
    /// # Errors
    /// Returns an error only if `config` is invalid.
    pub fn open(
        config: Config,
        store: S,
        today: NaiveDate,
        feedback: Box<dyn FeedbackProvider>,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        let range = config.day_range()?;
        let gateway = LedgerGateway::new(store);
        let persisted = gateway.load();

        let engine = ReconciliationEngine::with_config(
            ReconciliationConfig::new(range)
                .with_auto_miss_penalty(config.rewards.auto_miss_penalty),
        );
        let (days, ledger, summary) = engine.reconcile(
            generate_days(&range),
            persisted.days.as_deref(),
            persisted.ledger,
            today,
        );

        let changed = persisted.days.as_deref() != Some(days.as_slice())
            || persisted.ledger != ledger;

        let mut events = Vec::new();
        let now = Utc::now();
        if let Some(id) = summary.unlocked {
            events.push(Event::DayUnlocked {
                id,
                date: days[id.index()].date,
                at: now,
            });
        }
        if let Some(notice) = summary.notice {
            events.push(Event::DaysAutoMissed {
                ids: summary.auto_missed.clone(),
                penalty: notice.penalty,
                at: now,
            });
        }

        let mut tracker = Self {
            processor: DecisionProcessor::new(config.rewards.clone()),
            config,
            range,
            gateway,
            feedback,
            state: TrackerState { days, ledger },
            today,
            notice: summary.notice,
            summary,
            events,
            dirty: changed,
        };

        if tracker.summary.needs_persist() || changed {
            tracker.persist();
        }

        Ok(tracker)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn range(&self) -> DayRange {
        self.range
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn days(&self) -> &[Day] {
        &self.state.days
    }

    pub fn ledger(&self) -> Ledger {
        self.state.ledger
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn summary(&self) -> &ReconciliationSummary {
        &self.summary
    }

    /// In-memory state has changes storage does not.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The day for `today`, if the range covers it.
    pub fn today_day(&self) -> Option<&Day> {
        if !self.range.contains(self.today) {
            return None;
        }
        let offset = (self.today - self.range.start()).num_days();
        usize::try_from(offset)
            .ok()
            .and_then(|i| self.state.days.get(i))
    }

    /// The day currently accepting a decision.
    pub fn pending_day(&self) -> Option<&Day> {
        self.today_day()
            .filter(|d| d.is_pending())
            .or_else(|| self.state.days.iter().find(|d| d.is_pending()))
    }

    /// Hand out the auto-miss notice. Returns `None` on every later call.
    pub fn take_notice(&mut self) -> Option<AutoMissNotice> {
        self.notice.take()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn analytics(&self) -> Analytics {
        Analytics::from_days(&self.state.days, &self.config.rewards)
    }

    pub fn audit(&self) -> LedgerAudit {
        analytics::audit(&self.analytics(), &self.state.ledger)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Decide the currently pending day.
    ///
    /// # Errors
    /// Returns `DecisionError::NothingPending` when no day is pending, or the
    /// processor's rejection. Rejections never mutate state or write.
    pub fn decide(&mut self, decision: Decision) -> Result<DecisionReceipt, DecisionError> {
        let id = self
            .pending_day()
            .map(|d| d.id)
            .ok_or(DecisionError::NothingPending)?;
        self.decide_day(id, decision)
    }

    /// Decide a specific day. The write happens before this returns.
    ///
    /// # Errors
    /// See [`DecisionProcessor::apply`].
    pub fn decide_day(
        &mut self,
        id: DayId,
        decision: Decision,
    ) -> Result<DecisionReceipt, DecisionError> {
        let outcome =
            self.processor
                .apply(&mut self.state, id, decision, self.feedback.as_ref())?;
        self.events.push(Event::DecisionRecorded {
            id,
            decision,
            delta: outcome.delta,
            balance: outcome.ledger.balance,
            streak: outcome.ledger.streak,
            at: Utc::now(),
        });
        self.dirty = true;
        let persisted = self.persist();
        Ok(DecisionReceipt { outcome, persisted })
    }

    /// Retry writing the in-memory state.
    ///
    /// # Errors
    /// Returns the storage error if the write fails again.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        self.gateway.save(&self.state.days, &self.state.ledger)?;
        self.dirty = false;
        self.events.push(Event::StateSaved { at: Utc::now() });
        Ok(())
    }

    fn persist(&mut self) -> bool {
        match self.flush() {
            Ok(()) => {
                info!(balance = self.state.ledger.balance, "tracker state persisted");
                true
            }
            Err(e) => {
                warn!("tracker state not persisted, keeping it in memory: {e}");
                self.events.push(Event::SaveFailed {
                    reason: e.to_string(),
                    at: Utc::now(),
                });
                false
            }
        }
    }
}
