use std::io::IsTerminal;
use std::time::Duration;

use clap::Args;
use dailydose_core::{ConfirmationTimer, Decision, DayId};

use super::{open_tracker, print_notice, Context};

#[derive(Args)]
pub struct Target {
    /// Decide this day (e.g. "day-3") instead of the pending one
    #[arg(long)]
    day: Option<DayId>,
}

pub fn run(
    ctx: &Context,
    decision: Decision,
    target: Target,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = open_tracker(ctx)?;
    let notice = tracker.take_notice();

    let receipt = match target.day {
        Some(id) => tracker.decide_day(id, decision)?,
        None => tracker.decide(decision)?,
    };

    if !receipt.persisted {
        // One retry, then surface it: a closed session would lose the decision.
        if let Err(e) = tracker.flush() {
            eprintln!("warning: decision recorded for this session only, save failed: {e}");
            return Err(e.into());
        }
    }

    let outcome = &receipt.outcome;
    if ctx.json {
        let json = serde_json::json!({
            "outcome": outcome,
            "notice": notice,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    if let Some(notice) = &notice {
        print_notice(notice);
    }
    let sign = if outcome.delta >= 0 { "+" } else { "" };
    println!("{} ({}): {sign}{}", outcome.date, outcome.status, outcome.delta);
    println!("{}", outcome.message);
    println!(
        "Balance: {}  Streak: {}",
        outcome.ledger.balance, outcome.ledger.streak
    );

    if std::io::stdin().is_terminal() {
        let delay = Duration::from_millis(tracker.config().ui.confirmation_delay_ms);
        hold_confirmation(delay)?;
    }
    Ok(())
}

/// Keep the confirmation up until the delay elapses or Enter is pressed.
fn hold_confirmation(delay: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(async {
        let enter = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            let _ = std::io::stdin().read_line(&mut line);
        });
        ConfirmationTimer::close_on(delay, enter).await
    });
    // The stdin reader may still be blocked.
    runtime.shutdown_background();
    Ok(())
}
