use chrono::{Datelike, NaiveDate};
use dailydose_core::calendar::group_by_month;

use super::{open_tracker, print_notice, status_mark, Context};

pub fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = open_tracker(ctx)?;
    let notice = tracker.take_notice();

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(tracker.days())?);
        return Ok(());
    }

    if let Some(notice) = &notice {
        print_notice(notice);
    }
    let rewards = &tracker.config().rewards;
    for group in group_by_month(tracker.days()) {
        let title = NaiveDate::from_ymd_opt(group.year, group.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_default();
        println!("{title}");
        for day in group.days {
            let bonus = if rewards.is_bonus_date(day.date) { " ★" } else { "" };
            let today = if day.date == tracker.today() { "  <- today" } else { "" };
            println!(
                "  {} {:>2} {}{}{}",
                status_mark(day.status),
                day.day_of_month,
                day.date.weekday(),
                bonus,
                today
            );
        }
    }
    Ok(())
}
