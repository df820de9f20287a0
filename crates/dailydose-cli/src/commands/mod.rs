pub mod calendar;
pub mod config;
pub mod decide;
pub mod stats;
pub mod status;

use chrono::{Local, NaiveDate};
use dailydose_core::{AutoMissNotice, Config, Database, DayStatus, PhrasePool, Tracker};

/// Flags shared by every tracker command.
pub struct Context {
    pub today: Option<NaiveDate>,
    pub json: bool,
}

impl Context {
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Load config and storage, then reconcile against today.
pub fn open_tracker(ctx: &Context) -> Result<Tracker<Database>, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    tracing::debug!(today = %ctx.today(), "opening tracker");
    let db = Database::open()?;
    let tracker = Tracker::open(config, db, ctx.today(), Box::new(PhrasePool::new()))?;
    if tracker.is_dirty() {
        eprintln!("warning: reconciled state could not be saved; it will be retried on the next change");
    }
    Ok(tracker)
}

pub fn print_notice(notice: &AutoMissNotice) {
    println!(
        "Oops, {} day(s) went by without a decision. Penalty charged: -{}",
        notice.count, notice.penalty
    );
}

pub fn status_mark(status: DayStatus) -> &'static str {
    match status {
        DayStatus::Locked => "·",
        DayStatus::Pending => "?",
        DayStatus::Taken => "✓",
        DayStatus::Missed => "✗",
    }
}
