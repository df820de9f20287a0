use super::{open_tracker, status_mark, Context};

pub fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let tracker = open_tracker(ctx)?;
    let analytics = tracker.analytics();
    let audit = tracker.audit();

    if ctx.json {
        let json = serde_json::json!({
            "analytics": analytics,
            "audit": audit,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!(
        "Taken: {}  Missed: {}",
        analytics.total_taken, analytics.total_missed
    );

    if !analytics.history.is_empty() {
        println!();
        println!("Running balance");
        for point in &analytics.history {
            println!("  {:>7}  {:>8}", point.label, point.balance);
        }
    }

    if !analytics.activity.is_empty() {
        println!();
        println!("Activity");
        for entry in &analytics.activity {
            let note = entry.note.as_deref().unwrap_or("");
            println!(
                "  {} {}  {:>+7}  {}",
                status_mark(entry.status),
                entry.date,
                entry.amount,
                note
            );
        }
    }

    println!();
    println!(
        "Recorded balance: {}  (derived from statuses: {})",
        audit.recorded, audit.derived
    );
    if !audit.is_consistent() {
        println!(
            "Difference of {} comes from bonus days or automatic penalties",
            audit.discrepancy
        );
    }
    Ok(())
}
