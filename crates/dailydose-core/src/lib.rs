//! # dailydose Core Library
//!
//! Business logic for the dailydose "take it or pay for it" habit tracker.
//! Every calendar day in a configured window is either completed (reward) or
//! missed (penalty); days left without a decision are charged automatically
//! the next time the tracker opens. The CLI is a thin presentation layer over
//! this crate.
//!
//! ## Architecture
//!
//! - **Calendar**: generates the fixed, contiguous day range
//! - **Reconciliation**: merges stored days with the range on every open,
//!   unlocks today and auto-misses elapsed days exactly once
//! - **Decisions**: applies completed/missed to the pending day
//! - **Storage**: SQLite key-value snapshot and TOML configuration
//!
//! ## Key Components
//!
//! - [`Tracker`]: owns one session's state and runs both triggers
//! - [`ReconciliationEngine`]: pure startup reconciliation
//! - [`DecisionProcessor`]: ledger updates for a decision
//! - [`LedgerGateway`]: atomic load/save of days, balance and streak
//! - [`Config`]: application configuration management

pub mod analytics;
pub mod calendar;
pub mod confirmation;
pub mod day;
pub mod decision;
pub mod error;
pub mod events;
pub mod feedback;
pub mod ledger;
pub mod reconcile;
pub mod storage;
pub mod tracker;

pub use analytics::{Analytics, BalancePoint, LedgerAudit};
pub use calendar::{generate_days, DayRange};
pub use confirmation::ConfirmationTimer;
pub use day::{Day, DayId, DayStatus};
pub use decision::{Decision, DecisionOutcome, DecisionProcessor};
pub use error::{ConfigError, CoreError, DecisionError, StorageError};
pub use events::Event;
pub use feedback::{FeedbackProvider, PhrasePool};
pub use ledger::Ledger;
pub use reconcile::{AutoMissNotice, ReconciliationEngine, ReconciliationSummary};
pub use storage::{Config, Database, KvStore, LedgerGateway, MemoryStore, RewardsConfig};
pub use tracker::{DecisionReceipt, Tracker, TrackerState};
