use dailydose_core::analytics::{is_weekly_milestone, weekly_progress, WEEK_LEN};

use super::{open_tracker, print_notice, Context};

pub fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = open_tracker(ctx)?;
    let notice = tracker.take_notice();
    let ledger = tracker.ledger();

    if ctx.json {
        let json = serde_json::json!({
            "today": tracker.today(),
            "balance": ledger.balance,
            "streak": ledger.streak,
            "pending": tracker.pending_day(),
            "notice": notice,
            "events": tracker.drain_events(),
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    if let Some(notice) = &notice {
        print_notice(notice);
    }
    println!("Balance: {}", ledger.balance);
    println!(
        "Streak:  {} ({}/{} this week)",
        ledger.streak,
        weekly_progress(ledger.streak),
        WEEK_LEN
    );
    if is_weekly_milestone(ledger.streak) {
        println!("A full week in a row!");
    }

    match tracker.today_day() {
        Some(day) => println!("Today:   {} ({}, {})", day.date, day.id, day.status),
        None => {
            let range = tracker.range();
            println!(
                "Today:   {} is outside the tracked range ({} to {})",
                tracker.today(),
                range.start(),
                range.end()
            );
        }
    }
    if tracker.config().rewards.is_bonus_date(tracker.today()) {
        println!(
            "Bonus day: completing today pays {}",
            tracker.config().rewards.bonus_amount
        );
    }
    Ok(())
}
