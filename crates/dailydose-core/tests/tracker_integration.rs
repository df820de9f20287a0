//! Integration tests for reconciliation and decisions across sessions.

use chrono::NaiveDate;
use dailydose_core::reconcile::AUTO_MISS_NOTE;
use dailydose_core::{
    Config, Database, Decision, DayId, DayStatus, FeedbackProvider, Ledger, LedgerGateway,
    MemoryStore, Tracker,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn quiet() -> Box<dyn FeedbackProvider> {
    Box::new(|_: Decision, bonus: bool| if bonus { "bonus!" } else { "ok" }.to_string())
}

#[test]
fn first_run_on_start_date() {
    let mut tracker =
        Tracker::open(Config::default(), MemoryStore::new(), date(2025, 12, 2), quiet()).unwrap();

    let days = tracker.days();
    assert_eq!(days[0].date, date(2025, 12, 2));
    assert_eq!(days[0].status, DayStatus::Pending);
    assert!(days[1..].iter().all(|d| d.status == DayStatus::Locked));
    assert_eq!(tracker.ledger(), Ledger::new(0, 0));
    assert!(tracker.take_notice().is_none());
}

#[test]
fn returning_on_bonus_date_after_absence() {
    let store = MemoryStore::new();

    // Session one: day 0 unlocked, no decision taken.
    Tracker::open(Config::default(), &store, date(2025, 12, 2), quiet()).unwrap();

    // Session two, three days later on the bonus date.
    let mut tracker = Tracker::open(Config::default(), &store, date(2025, 12, 5), quiet()).unwrap();
    let notice = tracker.take_notice().unwrap();
    assert_eq!(notice.count, 3);
    assert_eq!(notice.penalty, 3000);

    let days = tracker.days();
    for day in &days[..3] {
        assert_eq!(day.status, DayStatus::Missed);
        assert_eq!(day.note.as_deref(), Some(AUTO_MISS_NOTE));
    }
    assert_eq!(days[3].status, DayStatus::Pending);
    assert_eq!(tracker.ledger(), Ledger::new(-3000, 0));

    let receipt = tracker.decide(Decision::Completed).unwrap();
    assert_eq!(receipt.outcome.day_id, DayId(3));
    assert_eq!(receipt.outcome.delta, 30_000);
    assert!(receipt.outcome.bonus);
    assert_eq!(receipt.outcome.message, "bonus!");
    assert_eq!(tracker.ledger(), Ledger::new(27_000, 1));
}

#[test]
fn prior_session_state_is_merged_before_auto_miss() {
    let store = MemoryStore::new();
    let gateway = LedgerGateway::new(&store);

    // Day 0 pending, days 1-2 locked, as a previous session left them.
    let mut stored = dailydose_core::generate_days(&Config::default().day_range().unwrap());
    stored[0].status = DayStatus::Pending;
    gateway.save(&stored, &Ledger::default()).unwrap();

    let mut tracker = Tracker::open(Config::default(), &store, date(2025, 12, 4), quiet()).unwrap();
    let notice = tracker.take_notice().unwrap();
    assert_eq!(notice.count, 2);
    assert_eq!(notice.penalty, 2000);
    assert_eq!(tracker.days()[2].status, DayStatus::Pending);
    assert_eq!(tracker.ledger(), Ledger::new(-2000, 0));
}

#[test]
fn streak_builds_across_days_and_resets_on_miss() {
    let store = MemoryStore::new();
    let mut balance = 0;

    for (offset, decision) in [
        Decision::Completed,
        Decision::Completed,
        Decision::Completed,
        Decision::Missed,
        Decision::Completed,
    ]
    .into_iter()
    .enumerate()
    {
        // Start after the bonus date so every completion is standard.
        let today = date(2025, 12, 10) + chrono::Duration::days(offset as i64);
        let mut tracker = Tracker::open(Config::default(), &store, today, quiet()).unwrap();
        let before = tracker.ledger();
        let receipt = tracker.decide(decision).unwrap();
        match decision {
            Decision::Completed => {
                assert!(receipt.outcome.ledger.balance >= before.balance);
                assert_eq!(receipt.outcome.ledger.streak, before.streak + 1);
            }
            Decision::Missed => {
                assert_eq!(receipt.outcome.ledger.streak, 0);
                assert_eq!(receipt.outcome.ledger.balance, before.balance - 1000);
            }
        }
        balance = receipt.outcome.ledger.balance;
    }

    // Days 2025-12-02..09 were auto-missed on the first open.
    let tracker = Tracker::open(Config::default(), &store, date(2025, 12, 14), quiet()).unwrap();
    assert_eq!(tracker.ledger().balance, balance);
    assert_eq!(tracker.ledger().streak, 1);
    assert_eq!(balance, -8000 + 1500 - 1000 + 500);
}

#[test]
fn decisions_on_non_pending_days_change_nothing() {
    let store = MemoryStore::new();
    let mut tracker = Tracker::open(Config::default(), &store, date(2025, 12, 3), quiet()).unwrap();
    tracker.decide(Decision::Completed).unwrap();
    let before = tracker.state().clone();

    // Day 0 auto-missed, day 1 taken, day 2 locked.
    for id in [DayId(0), DayId(1), DayId(2)] {
        for decision in [Decision::Completed, Decision::Missed] {
            assert!(tracker.decide_day(id, decision).is_err());
        }
    }
    assert_eq!(tracker.state(), &before);
}

#[test]
fn analytics_audit_diverges_after_bonus_and_auto_miss() {
    let store = MemoryStore::new();
    let mut tracker = Tracker::open(Config::default(), &store, date(2025, 12, 5), quiet()).unwrap();
    tracker.decide(Decision::Completed).unwrap();

    let analytics = tracker.analytics();
    assert_eq!(analytics.total_missed, 3);
    assert_eq!(analytics.total_taken, 1);

    // Derived: -1000 * 3 + 500; recorded: -1000 * 3 + 30000.
    let audit = tracker.audit();
    assert_eq!(audit.derived, -2500);
    assert_eq!(audit.recorded, 27_000);
    assert_eq!(audit.discrepancy, 29_500);
    assert!(!audit.is_consistent());
}

#[test]
fn sqlite_store_carries_state_between_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dailydose.db");

    {
        let db = Database::open_at(&path).unwrap();
        let mut tracker = Tracker::open(Config::default(), db, date(2025, 12, 2), quiet()).unwrap();
        tracker.decide(Decision::Completed).unwrap();
    }

    let db = Database::open_at(&path).unwrap();
    let tracker = Tracker::open(Config::default(), db, date(2025, 12, 3), quiet()).unwrap();
    assert_eq!(tracker.days()[0].status, DayStatus::Taken);
    assert_eq!(tracker.days()[1].status, DayStatus::Pending);
    assert_eq!(tracker.ledger(), Ledger::new(500, 1));
}

#[test]
fn corrupted_storage_falls_back_to_fresh_range() {
    use dailydose_core::KvStore;

    let store = MemoryStore::new();
    store
        .set(dailydose_core::storage::STATE_KEY, "][ definitely not json")
        .unwrap();

    let tracker = Tracker::open(Config::default(), &store, date(2025, 11, 30), quiet()).unwrap();
    assert!(tracker.days().iter().all(|d| d.status == DayStatus::Locked));
    assert_eq!(tracker.ledger(), Ledger::default());
}

#[test]
fn shrinking_window_keeps_decisions_for_surviving_ids() {
    let store = MemoryStore::new();
    let mut tracker = Tracker::open(Config::default(), &store, date(2025, 12, 2), quiet()).unwrap();
    tracker.decide(Decision::Completed).unwrap();

    let mut config = Config::default();
    config.apply("tracker.end_date", "2025-12-31").unwrap();
    let tracker = Tracker::open(config, &store, date(2025, 12, 2), quiet()).unwrap();
    assert_eq!(tracker.days().len(), 30);
    assert_eq!(tracker.days()[0].status, DayStatus::Taken);
    assert_eq!(tracker.summary().dropped, 90);
}
